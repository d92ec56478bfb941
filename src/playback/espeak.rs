//! Speech synthesis through the `espeak-ng` command.
//!
//! Voices are listed with `espeak-ng --voices`. Utterances are queued to one
//! playback worker thread that runs `espeak-ng -v <voice> -p <pitch> -s
//! <speed> <text>` for each in turn, so replies never talk over each other.

use crate::error::Result;
use crate::exec::{CommandExecutor, SystemCommandExecutor};
use crate::playback::synthesizer::{SpeechSynthesizer, Utterance, Voice};
use crossbeam_channel::Sender;
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, warn};

const PROGRAM: &str = "espeak-ng";

/// espeak-ng pitch at a relative pitch of 1.0 (range 0-99).
const BASE_PITCH: f32 = 50.0;

/// espeak-ng speed in words per minute at a relative rate of 1.0.
const BASE_SPEED_WPM: f32 = 175.0;
const MIN_SPEED_WPM: f32 = 80.0;
const MAX_SPEED_WPM: f32 = 450.0;

struct PlaybackWorker {
    queue: Sender<Vec<String>>,
    handle: JoinHandle<()>,
}

/// Dropping the synthesizer waits for queued utterances to finish.
pub struct EspeakSynthesizer<E: CommandExecutor + 'static> {
    executor: Arc<E>,
    worker: Option<PlaybackWorker>,
}

impl<E: CommandExecutor + 'static> EspeakSynthesizer<E> {
    pub fn new(executor: E) -> Self {
        let executor = Arc::new(executor);
        let worker = spawn_worker(Arc::clone(&executor));
        Self { executor, worker }
    }
}

fn spawn_worker<E: CommandExecutor + 'static>(executor: Arc<E>) -> Option<PlaybackWorker> {
    let (queue, utterances) = crossbeam_channel::unbounded::<Vec<String>>();

    let spawned = std::thread::Builder::new()
        .name("espeak".to_string())
        .spawn(move || {
            for args in utterances {
                let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
                if let Err(e) = executor.execute(PROGRAM, &arg_refs) {
                    warn!("speech playback failed: {e}");
                }
            }
        });

    match spawned {
        Ok(handle) => Some(PlaybackWorker { queue, handle }),
        Err(e) => {
            warn!("could not start speech playback worker: {e}");
            None
        }
    }
}

impl<E: CommandExecutor + 'static> Drop for EspeakSynthesizer<E> {
    fn drop(&mut self) {
        if let Some(PlaybackWorker { queue, handle }) = self.worker.take() {
            drop(queue);
            if handle.join().is_err() {
                warn!("speech playback worker panicked");
            }
        }
    }
}

impl EspeakSynthesizer<SystemCommandExecutor> {
    /// Create a synthesizer that runs the real `espeak-ng`.
    pub fn system() -> Self {
        Self::new(SystemCommandExecutor::new())
    }
}

/// Map a relative pitch (1.0 = normal) to espeak-ng's 0-99 scale.
fn espeak_pitch(pitch: f32) -> u32 {
    (pitch * BASE_PITCH).round().clamp(0.0, 99.0) as u32
}

/// Map a relative rate (1.0 = normal) to espeak-ng words per minute.
fn espeak_speed(rate: f32) -> u32 {
    (rate * BASE_SPEED_WPM)
        .round()
        .clamp(MIN_SPEED_WPM, MAX_SPEED_WPM) as u32
}

/// Build the argument list for one utterance.
pub(crate) fn speak_args(utterance: &Utterance) -> Vec<String> {
    vec![
        "-v".to_string(),
        utterance.voice.name.clone(),
        "-p".to_string(),
        espeak_pitch(utterance.pitch).to_string(),
        "-s".to_string(),
        espeak_speed(utterance.rate).to_string(),
        // Keeps text starting with '-' from being read as an option.
        "--".to_string(),
        utterance.text.clone(),
    ]
}

/// Parse `espeak-ng --voices` output.
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  af              --/M      Afrikaans          gmw/af
///  2  en-us           --/M      English_(America)  gmw/en-US            (en 3)
/// ```
///
/// The language column is what `-v` accepts, so it doubles as the voice name.
pub(crate) fn parse_voices(output: &str) -> Vec<Voice> {
    output
        .lines()
        .filter(|line| !line.trim_start().starts_with("Pty"))
        .filter_map(|line| {
            let mut columns = line.split_whitespace();
            let _priority = columns.next()?;
            let language = columns.next()?;
            Some(Voice::new(language, language))
        })
        .collect()
}

impl<E: CommandExecutor + 'static> SpeechSynthesizer for EspeakSynthesizer<E> {
    fn voices(&self) -> Result<Vec<Voice>> {
        let output = self.executor.execute(PROGRAM, &["--voices"])?;
        Ok(parse_voices(&output))
    }

    fn speak(&self, utterance: Utterance) {
        let Some(worker) = &self.worker else {
            warn!("speech playback worker is not running");
            return;
        };

        debug!(voice = %utterance.voice.name, "queueing response for speech");
        if worker.queue.send(speak_args(&utterance)).is_err() {
            warn!("speech playback worker stopped");
        }
    }

    fn name(&self) -> &str {
        PROGRAM
    }
}
