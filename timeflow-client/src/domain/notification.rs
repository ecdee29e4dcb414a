use serde::Deserialize;

/// A one-way informational message pushed by the server, e.g. after a
/// manager approves or rejects a submission.
#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}
