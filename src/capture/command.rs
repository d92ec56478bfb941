//! Speech recognition through an external speech-to-text command.
//!
//! The command is expected to listen for one utterance and print the
//! transcript on stdout. Empty output means no speech was heard. An argument
//! equal to `{language}` is replaced with the session language.
//!
//! A command still running when the session timeout elapses is killed and
//! reaped before `recognize` returns, so it never outlives its session.

use crate::capture::recognizer::{RecognitionOptions, SpeechRecognizer};
use crate::error::{Result, VoiceOrderError};
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, warn};

const LANGUAGE_PLACEHOLDER: &str = "{language}";

pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
}

impl CommandRecognizer {
    /// Build from a command line (`program` followed by its arguments).
    pub fn new(command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| VoiceOrderError::ConfigInvalidValue {
                key: "speech.recognizer_command".to_string(),
                message: "must name a program".to_string(),
            })?;

        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    fn resolved_args(&self, options: &RecognitionOptions) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                if arg == LANGUAGE_PLACEHOLDER {
                    options.language.clone()
                } else {
                    arg.clone()
                }
            })
            .collect()
    }

    fn spawn_error(&self, e: std::io::Error) -> VoiceOrderError {
        let source = if e.kind() == std::io::ErrorKind::NotFound {
            VoiceOrderError::SpeechToolNotFound {
                tool: self.program.clone(),
            }
        } else {
            VoiceOrderError::SpeechToolFailed {
                message: format!("Failed to execute {}: {}", self.program, e),
            }
        };
        VoiceOrderError::CaptureFailed {
            reason: source.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl SpeechRecognizer for CommandRecognizer {
    async fn recognize(&self, options: &RecognitionOptions) -> Result<Option<String>> {
        debug!(program = %self.program, "starting speech-to-text command");

        let mut child = Command::new(&self.program)
            .args(self.resolved_args(options))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let mut stdout = child.stdout.take();
        let mut stderr = child.stderr.take();

        let run = async {
            let mut out = Vec::new();
            let mut err = Vec::new();
            let read_out = async {
                match stdout.as_mut() {
                    Some(pipe) => pipe.read_to_end(&mut out).await.map(|_| ()),
                    None => Ok(()),
                }
            };
            let read_err = async {
                match stderr.as_mut() {
                    Some(pipe) => pipe.read_to_end(&mut err).await.map(|_| ()),
                    None => Ok(()),
                }
            };
            tokio::try_join!(read_out, read_err)?;
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, out, err))
        };

        let finished = tokio::time::timeout(options.timeout, run).await;

        match finished {
            Ok(Ok((status, out, err))) => {
                if !status.success() {
                    let stderr = String::from_utf8_lossy(&err);
                    return Err(VoiceOrderError::CaptureFailed {
                        reason: format!(
                            "{} failed with status {:?}: {}",
                            self.program,
                            status,
                            stderr.trim()
                        ),
                    });
                }
                let text = String::from_utf8_lossy(&out);
                let text = text.trim();
                if text.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(text.to_string()))
                }
            }
            Ok(Err(e)) => Err(VoiceOrderError::CaptureFailed {
                reason: format!("{}: {}", self.program, e),
            }),
            Err(_) => {
                // Kill and reap so the audio input is free once we return.
                if let Err(e) = child.kill().await {
                    warn!(program = %self.program, "failed to stop speech-to-text command: {e}");
                }
                debug!(
                    program = %self.program,
                    timeout_ms = options.timeout.as_millis() as u64,
                    "speech-to-text command stopped at session timeout"
                );
                Ok(None)
            }
        }
    }

    fn name(&self) -> &str {
        &self.program
    }
}
