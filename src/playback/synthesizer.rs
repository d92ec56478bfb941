use crate::config::{SpeechConfig, SynthesizerKind};
use crate::error::{Result, VoiceOrderError};
use crate::playback::espeak::EspeakSynthesizer;
use std::fmt;
use std::sync::{Arc, Mutex};

/// A synthesis voice reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// Identifier used to request this voice.
    pub name: String,
    pub language: String,
}

impl Voice {
    pub fn new(name: &str, language: &str) -> Self {
        Self {
            name: name.to_string(),
            language: language.to_string(),
        }
    }
}

/// One request to speak text.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub voice: Voice,
    pub pitch: f32,
    pub rate: f32,
}

/// Trait for platform speech synthesis.
///
/// `speak` is one-way: it returns immediately and never reports completion
/// or failure to the caller.
pub trait SpeechSynthesizer: Send + Sync {
    /// Voices currently available on the platform.
    fn voices(&self) -> Result<Vec<Voice>>;

    /// Start speaking the utterance without waiting for it to finish.
    fn speak(&self, utterance: Utterance);

    /// Name for logging/debugging.
    fn name(&self) -> &str;
}

impl<T: SpeechSynthesizer + ?Sized> SpeechSynthesizer for Arc<T> {
    fn voices(&self) -> Result<Vec<Voice>> {
        (**self).voices()
    }

    fn speak(&self, utterance: Utterance) {
        (**self).speak(utterance)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Platform speech-synthesis capability, resolved once at startup.
#[derive(Clone)]
pub enum SynthesisCapability {
    Available(Arc<dyn SpeechSynthesizer>),
    Unavailable,
}

impl SynthesisCapability {
    /// Resolve the capability from configuration.
    pub fn detect(config: &SpeechConfig) -> Self {
        match config.synthesizer {
            SynthesizerKind::EspeakNg => Self::Available(Arc::new(EspeakSynthesizer::system())),
            SynthesizerKind::None => Self::Unavailable,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

impl fmt::Debug for SynthesisCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available(synthesizer) => write!(f, "Available({})", synthesizer.name()),
            Self::Unavailable => write!(f, "Unavailable"),
        }
    }
}

/// Mock synthesizer for testing
///
/// Records every utterance instead of producing audio. Clones share the
/// recording.
#[derive(Debug, Clone, Default)]
pub struct MockSynthesizer {
    voices: Arc<Mutex<Vec<Voice>>>,
    spoken: Arc<Mutex<Vec<Utterance>>>,
    fail_voices: bool,
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the reported voice list
    pub fn with_voices(self, voices: Vec<Voice>) -> Self {
        *self.voices.lock().unwrap_or_else(|e| e.into_inner()) = voices;
        self
    }

    /// Configure the voice listing to fail
    pub fn with_voice_failure(mut self) -> Self {
        self.fail_voices = true;
        self
    }

    /// Replace the reported voice list, as when the platform loads more voices.
    pub fn set_voices(&self, voices: Vec<Voice>) {
        *self.voices.lock().unwrap_or_else(|e| e.into_inner()) = voices;
    }

    /// All utterances spoken so far.
    pub fn spoken(&self) -> Vec<Utterance> {
        self.spoken.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Texts spoken so far.
    pub fn spoken_texts(&self) -> Vec<String> {
        self.spoken().into_iter().map(|u| u.text).collect()
    }
}

impl SpeechSynthesizer for MockSynthesizer {
    fn voices(&self) -> Result<Vec<Voice>> {
        if self.fail_voices {
            return Err(VoiceOrderError::SpeechToolFailed {
                message: "mock voice listing failure".to_string(),
            });
        }
        Ok(self.voices.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn speak(&self, utterance: Utterance) {
        self.spoken
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(utterance);
    }

    fn name(&self) -> &str {
        "mock"
    }
}
