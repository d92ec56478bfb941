//! Speech capture: one-shot recognition sessions.
//!
//! A capture session yields at most one transcript. Recognizers are injected
//! through `CaptureCapability`, resolved once at startup.

pub mod command;
pub mod listener;
pub mod recognizer;

pub use listener::{CaptureCapability, SpeechCapture, Transcript};
pub use recognizer::{MockRecognizer, RecognitionOptions, SpeechRecognizer};
