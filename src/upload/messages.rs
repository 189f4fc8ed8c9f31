use serde::{Deserialize, Serialize};

/// Reply to a recording upload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Textual answer produced by the service
    #[serde(default)]
    pub answer: Option<String>,
    /// URL of a playable audio reply
    #[serde(default)]
    pub audio_url: Option<String>,
}

/// Reply to a book upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookUploadResponse {
    pub message: String,
    #[serde(default)]
    pub book_url: Option<String>,
}
