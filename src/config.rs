use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub recorder: RecorderConfig,
    pub capture: CaptureSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub upload_path: String,
    pub book_upload_path: String,
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5004".to_string(),
            upload_path: "/upload".to_string(),
            book_upload_path: "/upload_book".to_string(),
            timeout_secs: 60,
        }
    }
}

/// What to do once a recording upload succeeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionMode {
    /// Discard the body and reload the view
    Reload,
    /// Parse `{answer, audio_url}` and show it
    ShowResponse,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Gate recording on a successful book upload
    pub require_book: bool,
    pub completion: CompletionMode,
    pub audio_field: String,
    pub book_field: String,
    pub timer_interval_ms: u64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            require_book: false,
            completion: CompletionMode::Reload,
            audio_field: "audio_data".to_string(),
            book_field: "book".to_string(),
            timer_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    pub sample_rate: u32,
    pub channels: u16,
    pub buffer_duration_ms: u64,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
            buffer_duration_ms: 100,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[recorder]\nrequire_book = true\ncompletion = \"show_response\"\n\n[server]\nbase_url = \"http://example.test:8080\""
        )
        .unwrap();

        let cfg = Config::load(file.path().to_str().unwrap()).unwrap();

        assert!(cfg.recorder.require_book);
        assert_eq!(cfg.recorder.completion, CompletionMode::ShowResponse);
        assert_eq!(cfg.recorder.audio_field, "audio_data");
        assert_eq!(cfg.server.base_url, "http://example.test:8080");
        assert_eq!(cfg.server.upload_path, "/upload");
        assert_eq!(cfg.capture.sample_rate, 16000);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Config::load("/nonexistent/speakup-config").is_err());
    }
}
