//! Speech playback: voice selection and one-way text-to-speech.

pub mod espeak;
pub mod speaker;
pub mod synthesizer;

pub use speaker::{SpeechPlayback, select_voice};
pub use synthesizer::{MockSynthesizer, SpeechSynthesizer, SynthesisCapability, Utterance, Voice};
