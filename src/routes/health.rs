/// Liveness probe - public
pub async fn ping() -> &'static str {
    "ok"
}
