//! GET /health — liveness. Succeeds whenever the process is serving.

pub const LIVENESS_MESSAGE: &str = "Vocabulary service is running";

pub async fn health() -> &'static str {
    LIVENESS_MESSAGE
}
