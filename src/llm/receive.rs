use super::ClientError;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Shown when the backend answered without a usable `reply`.
pub const NO_RESPONSE: &str = "Sorry, no response.";

/// Shown when the backend could not be reached or answered garbage.
pub const CONNECTION_ERROR: &str = "Error connecting to Supervisor-bot.";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SupervisorReply {
    #[serde(default)]
    pub reply: Option<String>,
    /// Set by the backend alongside a non-2xx status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SupervisorReply {
    pub fn text(&self) -> Option<&str> {
        self.reply.as_deref().filter(|reply| !reply.is_empty())
    }
}

/// Decodes a response body; the status only matters for diagnostics since
/// error responses still carry JSON.
pub fn decode_reply(status: u16, body: &str) -> Result<SupervisorReply, ClientError> {
    serde_json::from_str(body).map_err(|e| ClientError::InvalidBody {
        status,
        reason: e.to_string(),
    })
}

/// The text to show for one bot turn.
pub fn reply_text(result: &Result<SupervisorReply, ClientError>) -> String {
    match result {
        Ok(reply) => match reply.text() {
            Some(text) => text.to_string(),
            None => {
                if let Some(error) = &reply.error {
                    warn!(error = %error, "Supervisor-bot returned an error");
                }
                NO_RESPONSE.to_string()
            }
        },
        Err(e) => {
            warn!(error = %e, "Supervisor-bot request failed");
            CONNECTION_ERROR.to_string()
        }
    }
}
