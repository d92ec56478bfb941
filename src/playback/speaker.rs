use crate::config::SpeechConfig;
use crate::playback::synthesizer::{SpeechSynthesizer, SynthesisCapability, Utterance, Voice};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Pick the voice to speak with.
///
/// An exact name match against `preferred` wins; otherwise the first voice
/// in the list. `None` only for an empty list.
pub fn select_voice(voices: &[Voice], preferred: Option<&str>) -> Option<Voice> {
    preferred
        .and_then(|name| voices.iter().find(|voice| voice.name == name))
        .or_else(|| voices.first())
        .cloned()
}

/// Speech playback adapter.
///
/// Caches the selected voice for its lifetime and re-selects whenever the
/// voice list is refreshed. Pitch and rate are fixed at construction.
pub struct SpeechPlayback {
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    preferred_voice: Option<String>,
    pitch: f32,
    rate: f32,
    selected: Mutex<Option<Voice>>,
}

impl SpeechPlayback {
    /// Create the adapter and make the initial voice selection.
    pub fn new(
        capability: SynthesisCapability,
        preferred_voice: Option<String>,
        pitch: f32,
        rate: f32,
    ) -> Self {
        let synthesizer = match capability {
            SynthesisCapability::Available(synthesizer) => Some(synthesizer),
            SynthesisCapability::Unavailable => None,
        };

        let playback = Self {
            synthesizer,
            preferred_voice,
            pitch,
            rate,
            selected: Mutex::new(None),
        };
        playback.refresh_voices();
        playback
    }

    pub fn from_config(capability: SynthesisCapability, config: &SpeechConfig) -> Self {
        Self::new(
            capability,
            config.preferred_voice.clone(),
            config.pitch,
            config.rate,
        )
    }

    /// Playback that never speaks.
    pub fn disabled() -> Self {
        Self::new(SynthesisCapability::Unavailable, None, 1.0, 1.0)
    }

    /// Ask the platform for its current voices and re-select.
    ///
    /// A failed listing counts as an empty list, which turns playback into a
    /// no-op until the next refresh.
    pub fn refresh_voices(&self) -> Option<Voice> {
        let voices = self.list_voices();
        self.update_voices(&voices)
    }

    /// Current platform voices. Re-selects from them as a side effect.
    pub fn voices(&self) -> Vec<Voice> {
        let voices = self.list_voices();
        self.update_voices(&voices);
        voices
    }

    fn list_voices(&self) -> Vec<Voice> {
        match &self.synthesizer {
            Some(synthesizer) => synthesizer.voices().unwrap_or_else(|e| {
                warn!("could not list synthesis voices: {e}");
                Vec::new()
            }),
            None => Vec::new(),
        }
    }

    /// Re-select from a voice list the platform reported.
    pub fn update_voices(&self, voices: &[Voice]) -> Option<Voice> {
        let chosen = select_voice(voices, self.preferred_voice.as_deref());
        match &chosen {
            Some(voice) => info!(voice = %voice.name, available = voices.len(), "synthesis voice selected"),
            None => debug!("no synthesis voices available, playback disabled"),
        }
        *self.selected.lock().unwrap_or_else(|e| e.into_inner()) = chosen.clone();
        chosen
    }

    /// The cached voice selection.
    pub fn selected_voice(&self) -> Option<Voice> {
        self.selected
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Speak `text` and return at once.
    ///
    /// Nothing is reported back: without a voice (or for empty text) this is
    /// a no-op.
    pub fn speak(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }

        let Some(synthesizer) = &self.synthesizer else {
            return;
        };

        let Some(voice) = self.selected_voice() else {
            debug!("skipping playback: no voice selected");
            return;
        };

        synthesizer.speak(Utterance {
            text: text.to_string(),
            voice,
            pitch: self.pitch,
            rate: self.rate,
        });
    }
}
