use crate::capture::command::CommandRecognizer;
use crate::capture::recognizer::{RecognitionOptions, SpeechRecognizer};
use crate::config::SpeechConfig;
use crate::error::{Result, VoiceOrderError};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Platform speech-recognition capability, resolved once at startup.
#[derive(Clone)]
pub enum CaptureCapability {
    Available(Arc<dyn SpeechRecognizer>),
    Unavailable,
}

impl CaptureCapability {
    /// Resolve the capability from configuration.
    ///
    /// A configured recognizer command makes capture available; without one
    /// the platform has no speech input and the user has to type.
    pub fn detect(config: &SpeechConfig) -> Self {
        match config.recognizer_command.as_deref() {
            Some(command) => match CommandRecognizer::new(command) {
                Ok(recognizer) => Self::Available(Arc::new(recognizer)),
                Err(e) => {
                    warn!("speech recognizer unusable: {e}");
                    Self::Unavailable
                }
            },
            None => Self::Unavailable,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

impl fmt::Debug for CaptureCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available(recognizer) => write!(f, "Available({})", recognizer.name()),
            Self::Unavailable => write!(f, "Unavailable"),
        }
    }
}

/// Text produced by one completed capture session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript(String);

impl Transcript {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extra time a recognizer gets past the session timeout to stop listening
/// and release the audio input on its own.
const STOP_GRACE: Duration = Duration::from_millis(500);

/// Clears the active flag when a session ends, including on cancellation.
struct ActiveGuard<'a>(&'a AtomicBool);

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Speech capture adapter.
///
/// Owns the audio input while a session runs: a second `capture` call during
/// a session is rejected with `CaptureBusy`, never interleaved. The session
/// only ends once the recognizer has returned, so a timed-out recognizer has
/// released the input before the next session can start.
pub struct SpeechCapture {
    capability: CaptureCapability,
    options: RecognitionOptions,
    active: AtomicBool,
}

impl SpeechCapture {
    pub fn new(capability: CaptureCapability, options: RecognitionOptions, timeout: Duration) -> Self {
        Self {
            capability,
            options: options.with_timeout(timeout),
            active: AtomicBool::new(false),
        }
    }

    /// Build from speech configuration with an already-resolved capability.
    pub fn from_config(capability: CaptureCapability, config: &SpeechConfig) -> Self {
        Self::new(
            capability,
            RecognitionOptions::single_utterance(&config.language),
            Duration::from_millis(config.capture_timeout_ms),
        )
    }

    pub fn is_available(&self) -> bool {
        self.capability.is_available()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Run one capture session.
    ///
    /// Always settles: `Ok(Some(_))` with the transcript, `Ok(None)` when the
    /// session ended without speech or hit the timeout, or an error
    /// (`CapabilityUnavailable`, `CaptureBusy`, `CaptureFailed`).
    pub async fn capture(&self) -> Result<Option<Transcript>> {
        let recognizer = match &self.capability {
            CaptureCapability::Available(recognizer) => Arc::clone(recognizer),
            CaptureCapability::Unavailable => return Err(VoiceOrderError::CapabilityUnavailable),
        };

        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(VoiceOrderError::CaptureBusy);
        }
        let _guard = ActiveGuard(&self.active);

        info!(recognizer = recognizer.name(), "voice capture started");

        // Recognizers honor `options.timeout` themselves; this bounds one
        // that never returns.
        let outcome = tokio::time::timeout(
            self.options.timeout + STOP_GRACE,
            recognizer.recognize(&self.options),
        )
        .await;

        match outcome {
            Ok(Ok(Some(text))) => {
                let text = text.trim();
                if text.is_empty() {
                    debug!("voice capture ended without speech");
                    Ok(None)
                } else {
                    info!(transcript = text, "voice capture recognized speech");
                    Ok(Some(Transcript(text.to_string())))
                }
            }
            Ok(Ok(None)) => {
                debug!("voice capture ended without speech");
                Ok(None)
            }
            Ok(Err(VoiceOrderError::CaptureFailed { reason })) => {
                warn!("speech recognition error: {reason}");
                Err(VoiceOrderError::CaptureFailed { reason })
            }
            Ok(Err(e)) => {
                warn!("speech recognition error: {e}");
                Err(VoiceOrderError::CaptureFailed {
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.options.timeout.as_millis() as u64,
                    "recognizer ignored the session timeout"
                );
                Ok(None)
            }
        }
    }
}
