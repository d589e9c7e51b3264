/// Liveness probe for the hosting layer. Does not touch object storage.
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    summary = "Liveness",
    responses(
        (status = 200, description = "Service is running", body = String),
    )
)]
pub async fn healthz() -> &'static str {
    "OK"
}
