use serde::Deserialize;

/// Body of `GET /rest/system/ping`.
#[derive(Debug, Deserialize)]
pub struct PingResponse {
    #[serde(default)]
    pub ping: String,
}

impl PingResponse {
    pub fn is_pong(&self) -> bool {
        self.ping == "pong"
    }
}
