//! Line-based interactive front end.
//!
//! Lines are dispatched without waiting for earlier actions. Orders, voice
//! capture, feedback and voice listing run as tasks, so typing, `:quit` and
//! `:logout` keep working while the backend or the microphone is slow.

use crate::cli::{INTERACTIVE_HELP, InteractiveCommand};
use crate::defaults;
use crate::error::Result;
use crate::output::format_voices;
use crate::session::{CaptureOutcome, FeedbackOutcome, OrderSession, SubmitOutcome};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;
use tracing::debug;

const REVIEW_TRANSCRIPT_HINT: &str = "Type :send to submit it, or type a corrected order.";
const FEEDBACK_PENDING_MESSAGE: &str = "Your feedback is still being sent.";

/// How the interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Quit,
    LoggedOut,
    /// Input closed; pending actions were allowed to finish.
    EndOfInput,
}

/// Drive `session` from `input` until `:quit`, `:logout` or end of input.
///
/// On `:quit` and `:logout` pending actions are abandoned; after a logout
/// any reply still in flight is discarded by the session.
pub async fn run<R>(session: Arc<OrderSession>, input: R) -> Result<Exit>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut pending: JoinSet<()> = JoinSet::new();

    let exit = loop {
        while pending.try_join_next().is_some() {}

        let Some(line) = lines.next_line().await? else {
            break Exit::EndOfInput;
        };

        match InteractiveCommand::parse(&line) {
            InteractiveCommand::Order(text) => {
                let session = Arc::clone(&session);
                pending.spawn(async move {
                    let outcome = session.submit_text(&text).await;
                    report_submit(&session, &outcome);
                });
            }
            InteractiveCommand::Send => {
                let session = Arc::clone(&session);
                pending.spawn(async move {
                    let outcome = session.submit().await;
                    report_submit(&session, &outcome);
                });
            }
            InteractiveCommand::Voice => {
                let session = Arc::clone(&session);
                pending.spawn(async move {
                    if let CaptureOutcome::Transcript(_) = session.capture_voice().await {
                        session.notify(REVIEW_TRANSCRIPT_HINT);
                    }
                });
            }
            InteractiveCommand::Feedback(text) => {
                let session = Arc::clone(&session);
                pending.spawn(async move {
                    session.set_feedback(&text);
                    if session.submit_feedback().await == FeedbackOutcome::Busy {
                        session.notify(FEEDBACK_PENDING_MESSAGE);
                    }
                });
            }
            InteractiveCommand::Voices => {
                let session = Arc::clone(&session);
                // Listing runs the synthesizer tool and blocks.
                pending.spawn_blocking(move || {
                    let voices = session.playback().voices();
                    let selected = session.playback().selected_voice();
                    let listing = format_voices(&voices, selected.as_ref());
                    eprintln!("{}", listing.trim_end());
                });
            }
            InteractiveCommand::Logout => {
                let was_submitting = session.state().is_submitting;
                session.logout().await?;
                if was_submitting {
                    session.notify(defaults::REPLY_DISCARDED_MESSAGE);
                }
                break Exit::LoggedOut;
            }
            InteractiveCommand::Quit => break Exit::Quit,
            InteractiveCommand::Help => eprintln!("{INTERACTIVE_HELP}"),
            InteractiveCommand::Empty => {}
            InteractiveCommand::Unknown(name) => {
                session.notify(&format!("Unknown command :{name}. Type :help."));
            }
        }
    };

    match exit {
        Exit::EndOfInput => while pending.join_next().await.is_some() {},
        Exit::Quit | Exit::LoggedOut => {
            if !pending.is_empty() {
                debug!(tasks = pending.len(), "abandoning pending actions");
            }
            pending.shutdown().await;
        }
    }
    Ok(exit)
}

fn report_submit(session: &OrderSession, outcome: &SubmitOutcome) {
    match outcome {
        SubmitOutcome::Ignored => session.notify(defaults::SUBMISSION_PENDING_MESSAGE),
        SubmitOutcome::Discarded => session.notify(defaults::REPLY_DISCARDED_MESSAGE),
        _ => {}
    }
}
