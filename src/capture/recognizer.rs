use crate::defaults;
use crate::error::{Result, VoiceOrderError};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Trait for platform speech recognition.
///
/// This trait allows swapping implementations (external STT tool vs mock).
/// Each call is one capture session covering a single utterance.
#[async_trait::async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Listen for one utterance.
    ///
    /// # Returns
    /// `Ok(Some(text))` on recognition, `Ok(None)` when the session ended
    /// without speech, or `CaptureFailed` on a recognition error.
    ///
    /// Once `options.timeout` has elapsed the recognizer stops listening and
    /// releases the audio input before returning `Ok(None)`.
    async fn recognize(&self, options: &RecognitionOptions) -> Result<Option<String>>;

    /// Name for logging/debugging.
    fn name(&self) -> &str;
}

#[async_trait::async_trait]
impl<T: SpeechRecognizer + ?Sized> SpeechRecognizer for Arc<T> {
    async fn recognize(&self, options: &RecognitionOptions) -> Result<Option<String>> {
        (**self).recognize(options).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Settings handed to the recognizer for each session.
///
/// Sessions are always single-utterance with final results only.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionOptions {
    pub language: String,
    pub continuous: bool,
    pub interim_results: bool,
    /// Longest a session may listen.
    pub timeout: Duration,
}

impl RecognitionOptions {
    pub fn single_utterance(language: &str) -> Self {
        Self {
            language: language.to_string(),
            continuous: false,
            interim_results: false,
            timeout: Duration::from_millis(defaults::CAPTURE_TIMEOUT_MS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self::single_utterance(defaults::LANGUAGE)
    }
}

#[derive(Debug, Clone)]
enum MockOutcome {
    Transcript(String),
    Silence,
    Failure(String),
    Hang,
}

/// Mock recognizer for testing
#[derive(Debug, Clone)]
pub struct MockRecognizer {
    outcome: MockOutcome,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockRecognizer {
    /// Create a mock that recognizes the given text.
    pub fn new(transcript: &str) -> Self {
        Self {
            outcome: MockOutcome::Transcript(transcript.to_string()),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Configure the mock to end the session without speech
    pub fn with_silence(mut self) -> Self {
        self.outcome = MockOutcome::Silence;
        self
    }

    /// Configure the mock to fail with a recognition error
    pub fn with_failure(mut self, reason: &str) -> Self {
        self.outcome = MockOutcome::Failure(reason.to_string());
        self
    }

    /// Configure the mock to never finish on its own
    pub fn with_hang(mut self) -> Self {
        self.outcome = MockOutcome::Hang;
        self
    }

    /// Wait before producing the outcome
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of sessions started on this mock (shared across clones).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SpeechRecognizer for MockRecognizer {
    async fn recognize(&self, _options: &RecognitionOptions) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.outcome {
            MockOutcome::Transcript(text) => Ok(Some(text.clone())),
            MockOutcome::Silence => Ok(None),
            MockOutcome::Failure(reason) => Err(VoiceOrderError::CaptureFailed {
                reason: reason.clone(),
            }),
            MockOutcome::Hang => std::future::pending().await,
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_recognizer_returns_transcript() {
        let recognizer = MockRecognizer::new("two lattes please");
        let result = recognizer
            .recognize(&RecognitionOptions::default())
            .await
            .unwrap();
        assert_eq!(result.as_deref(), Some("two lattes please"));
        assert_eq!(recognizer.calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_recognizer_silence() {
        let recognizer = MockRecognizer::new("ignored").with_silence();
        let result = recognizer
            .recognize(&RecognitionOptions::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_mock_recognizer_failure() {
        let recognizer = MockRecognizer::new("ignored").with_failure("audio-capture");
        match recognizer.recognize(&RecognitionOptions::default()).await {
            Err(VoiceOrderError::CaptureFailed { reason }) => assert_eq!(reason, "audio-capture"),
            other => panic!("Expected CaptureFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_recognizer_trait_is_object_safe() {
        let recognizer: Arc<dyn SpeechRecognizer> = Arc::new(MockRecognizer::new("boxed"));
        assert_eq!(recognizer.name(), "mock");
        let result = recognizer
            .recognize(&RecognitionOptions::default())
            .await
            .unwrap();
        assert_eq!(result.as_deref(), Some("boxed"));
    }

    #[test]
    fn test_single_utterance_options() {
        let options = RecognitionOptions::single_utterance("de-DE");
        assert_eq!(options.language, "de-DE");
        assert!(!options.continuous);
        assert!(!options.interim_results);
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(RecognitionOptions::default().language, "en-US");
        assert_eq!(
            options.with_timeout(Duration::from_millis(250)).timeout,
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_mock_call_counter_is_shared_across_clones() {
        let recognizer = MockRecognizer::new("x");
        let clone = recognizer.clone();
        clone.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(recognizer.calls(), 1);
    }
}
