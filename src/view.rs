use std::io::Write;
use tracing::{debug, info, warn};

/// Presentation surface updated by the controller
///
/// Stands in for the page: two controls, a timer label, the answer text, an
/// audio player, a status line, a book link, blocking alerts, and reload.
pub trait View: Send + Sync {
    fn set_record_enabled(&self, enabled: bool);

    fn set_stop_enabled(&self, enabled: bool);

    fn set_timer(&self, text: &str);

    fn show_answer(&self, answer: &str);

    fn set_audio_source(&self, url: &str);

    fn set_status(&self, status: &str);

    fn show_book_link(&self, url: &str);

    /// Blocking, user-facing error
    fn alert(&self, message: &str);

    /// Clear answer, audio player, status, and timer
    fn clear_results(&self);

    /// Discard displayed results and refresh from the server
    fn reload(&self);
}

/// Terminal rendering of the view
pub struct ConsoleView {
    base_url: String,
}

impl ConsoleView {
    /// `base_url` resolves relative audio and book links
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn resolve(&self, url: &str) -> String {
        if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            url.to_string()
        }
    }
}

impl View for ConsoleView {
    fn set_record_enabled(&self, enabled: bool) {
        debug!("record control enabled={}", enabled);
    }

    fn set_stop_enabled(&self, enabled: bool) {
        debug!("stop control enabled={}", enabled);
    }

    fn set_timer(&self, text: &str) {
        print!("\r⏺ {}", text);
        std::io::stdout().flush().ok();
    }

    fn show_answer(&self, answer: &str) {
        println!("\nAnswer: {}", answer);
    }

    fn set_audio_source(&self, url: &str) {
        println!("Audio reply: {}", self.resolve(url));
    }

    fn set_status(&self, status: &str) {
        println!("\n{}", status);
    }

    fn show_book_link(&self, url: &str) {
        println!("Book: {}", self.resolve(url));
    }

    fn alert(&self, message: &str) {
        warn!("{}", message);
        eprintln!("\n[!] {}", message);
    }

    fn clear_results(&self) {
        debug!("results cleared");
    }

    fn reload(&self) {
        info!("Upload complete, reloading");
        println!("\nUpload complete.");
    }
}
