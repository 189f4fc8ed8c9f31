use super::state::{BookOutcome, ControllerError, ControllerState, StopOutcome};
use crate::audio::{CaptureBackend, WAV_CONTENT_TYPE};
use crate::config::{CaptureSettings, CompletionMode, Config, RecorderConfig};
use crate::session::{upload_file_name, FinishedRecording, RecordingSession};
use crate::upload::{BookFile, BookUploadResponse, Recording, UploadResponse, UploadService};
use crate::view::View;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Drives the record → upload → display cycle
///
/// Every user action takes `&mut self`, so actions never interleave.
/// Invalid transitions are rejected here, not by the view's controls.
pub struct RecorderController {
    recorder: RecorderConfig,
    capture: CaptureSettings,

    /// Capture device; capturing only while `session` is `Some`
    backend: Box<dyn CaptureBackend>,
    uploader: Arc<dyn UploadService>,
    view: Arc<dyn View>,

    state: ControllerState,
    session: Option<RecordingSession>,

    /// Whether the book upload completed (book variant only)
    prerequisite_satisfied: bool,
    selected_book: Option<PathBuf>,
}

impl RecorderController {
    pub fn new(
        config: &Config,
        backend: Box<dyn CaptureBackend>,
        uploader: Arc<dyn UploadService>,
        view: Arc<dyn View>,
    ) -> Self {
        let mut controller = Self {
            recorder: config.recorder.clone(),
            capture: config.capture.clone(),
            backend,
            uploader,
            view,
            state: ControllerState::Idle,
            session: None,
            prerequisite_satisfied: false,
            selected_book: None,
        };

        controller.state = controller.resting_state();
        controller
            .view
            .set_record_enabled(controller.state == ControllerState::Idle);
        controller.view.set_stop_enabled(false);

        info!(
            "Recorder ready (backend={}, require_book={}, completion={:?})",
            controller.backend.name(),
            controller.recorder.require_book,
            controller.recorder.completion
        );

        controller
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    pub fn prerequisite_satisfied(&self) -> bool {
        self.prerequisite_satisfied
    }

    pub fn selected_book(&self) -> Option<&Path> {
        self.selected_book.as_deref()
    }

    /// Elapsed time of the active recording
    pub fn elapsed(&self) -> Option<Duration> {
        self.session.as_ref().map(|s| s.elapsed())
    }

    fn resting_state(&self) -> ControllerState {
        if self.recorder.require_book && !self.prerequisite_satisfied {
            ControllerState::PrerequisitePending
        } else {
            ControllerState::Idle
        }
    }

    /// Idle → Recording
    pub async fn start(&mut self) -> Result<(), ControllerError> {
        match self.state {
            ControllerState::Idle => {}
            ControllerState::PrerequisitePending => {
                warn!("Start rejected: no book uploaded");
                self.view.alert("Please upload a book before recording.");
                return Err(ControllerError::PrerequisiteMissing);
            }
            state @ (ControllerState::Recording | ControllerState::Uploading) => {
                warn!("Start rejected while {}", state);
                return Err(ControllerError::InvalidTransition {
                    state,
                    action: "start recording",
                });
            }
        }

        let audio_rx = match self.backend.start().await {
            Ok(rx) => rx,
            Err(e) => {
                error!("Error accessing capture device: {:#}", e);
                self.view
                    .alert(&format!("Could not access the microphone: {}", e));
                return Err(ControllerError::CaptureUnavailable(format!("{:#}", e)));
            }
        };

        let interval = Duration::from_millis(self.recorder.timer_interval_ms.max(1));
        let session = RecordingSession::begin(audio_rx, Arc::clone(&self.view), interval);

        self.view.set_timer("00:00");
        self.view.set_record_enabled(false);
        self.view.set_stop_enabled(true);

        info!("Recording started: {}", session.session_id());
        self.session = Some(session);
        self.state = ControllerState::Recording;

        Ok(())
    }

    /// Recording → Uploading → Idle
    ///
    /// A stop while not recording is a no-op. Upload failures are shown
    /// inline and returned as `StopOutcome::Failed`; nothing is retried.
    pub async fn stop(&mut self) -> StopOutcome {
        let Some(session) = self.session.take() else {
            debug!("Stop ignored: not recording");
            return StopOutcome::NotRecording;
        };

        if let Err(e) = self.backend.stop().await {
            warn!("Capture backend did not stop cleanly: {:#}", e);
        }

        let finished = session.finish().await;

        self.state = ControllerState::Uploading;
        self.view
            .set_record_enabled(self.resting_state() == ControllerState::Idle);
        self.view.set_stop_enabled(false);
        self.view.set_status("Uploading...");

        let outcome = match finished.and_then(|f| self.package(f)) {
            Ok(recording) => self.upload(recording).await,
            Err(e) => self.upload_failed(e),
        };

        self.state = self.resting_state();
        outcome
    }

    fn package(&self, finished: FinishedRecording) -> Result<Recording> {
        let bytes = finished
            .chunks
            .assemble_wav(self.capture.sample_rate, self.capture.channels)
            .with_context(|| format!("Failed to assemble {}", finished.session_id))?;

        Ok(Recording {
            field_name: self.recorder.audio_field.clone(),
            file_name: upload_file_name(finished.started_at),
            content_type: WAV_CONTENT_TYPE.to_string(),
            bytes,
        })
    }

    async fn upload(&self, recording: Recording) -> StopOutcome {
        info!(
            "Uploading {} ({} bytes)",
            recording.file_name,
            recording.bytes.len()
        );

        let body = match self.uploader.upload_recording(recording).await {
            Ok(body) => body,
            Err(e) => return self.upload_failed(e),
        };

        match self.recorder.completion {
            CompletionMode::Reload => {
                self.view.reload();
                StopOutcome::Reloaded
            }
            CompletionMode::ShowResponse => {
                match serde_json::from_str::<UploadResponse>(&body) {
                    Ok(response) => {
                        self.show_response(&response);
                        StopOutcome::Answered(response)
                    }
                    Err(e) => self.upload_failed(
                        anyhow::Error::new(e).context("Failed to parse upload response"),
                    ),
                }
            }
        }
    }

    fn show_response(&self, response: &UploadResponse) {
        self.view.set_status("Upload complete.");

        if let Some(answer) = &response.answer {
            self.view.show_answer(answer);
        }
        if let Some(url) = &response.audio_url {
            self.view.set_audio_source(url);
        }
    }

    fn upload_failed(&self, e: anyhow::Error) -> StopOutcome {
        error!("Error uploading audio: {:#}", e);
        self.view.set_status("Error uploading audio. Please try again.");
        StopOutcome::Failed(format!("{:#}", e))
    }

    /// Choose a new book; recording stays gated until it is submitted
    pub fn select_book(&mut self, path: impl Into<PathBuf>) -> Result<(), ControllerError> {
        if !self.recorder.require_book {
            return Err(ControllerError::BookUploadUnsupported);
        }

        let path = path.into();
        info!("Book selected: {}", path.display());

        self.selected_book = Some(path);
        self.prerequisite_satisfied = false;
        self.view.set_record_enabled(false);
        self.view.clear_results();

        // An active recording keeps running; it lands in the gated state at stop.
        if self.state == ControllerState::Idle {
            self.state = ControllerState::PrerequisitePending;
        }

        Ok(())
    }

    /// Upload the selected book
    pub async fn submit_book(&mut self) -> Result<BookOutcome, ControllerError> {
        if !self.recorder.require_book {
            return Err(ControllerError::BookUploadUnsupported);
        }

        let Some(path) = self.selected_book.clone() else {
            self.view.alert("Please select a book to upload.");
            return Err(ControllerError::NoBookSelected);
        };

        self.view.set_status("Uploading book...");

        match self.send_book(&path).await {
            Ok(response) => {
                info!("Book accepted: {}", response.message);
                self.prerequisite_satisfied = true;

                if self.state == ControllerState::PrerequisitePending {
                    self.state = ControllerState::Idle;
                    self.view.set_record_enabled(true);
                }

                self.view.set_status(&response.message);
                if let Some(url) = &response.book_url {
                    self.view.show_book_link(url);
                }

                Ok(BookOutcome::Accepted(response))
            }
            Err(e) => {
                error!("Error uploading book: {:#}", e);
                self.prerequisite_satisfied = false;

                if self.state == ControllerState::Idle {
                    self.state = ControllerState::PrerequisitePending;
                    self.view.set_record_enabled(false);
                }

                self.view.set_status("Error uploading book. Please try again.");
                Ok(BookOutcome::Failed(format!("{:#}", e)))
            }
        }
    }

    async fn send_book(&self, path: &Path) -> Result<BookUploadResponse> {
        let book = BookFile::open(path, self.recorder.book_field.clone()).await?;
        let body = self.uploader.upload_book(book).await?;

        serde_json::from_str(&body).context("Failed to parse book upload response")
    }
}
