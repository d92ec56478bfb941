//! Shared event rendering for terminal output.
//! Used by the one-shot commands and the interactive loop.

use crate::playback::Voice;
use crate::session::SessionEvent;

const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Clear the current terminal line (replaces the listening indicator)
pub fn clear_line() {
    eprint!("\r\x1b[2K");
}

/// Backend classification shown after a reply, e.g. ` [Order Food, POSITIVE]`.
fn metadata_tag(intent: Option<&str>, sentiment: Option<&str>) -> String {
    let parts: Vec<&str> = [intent, sentiment].into_iter().flatten().collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!(" {DIM}[{}]{RESET}", parts.join(", "))
    }
}

/// Format one session event as a terminal line.
pub fn format_event(event: &SessionEvent) -> String {
    match event {
        SessionEvent::CaptureStarted => format!("{YELLOW}Listening...{RESET}"),
        SessionEvent::Transcript { text } => format!("{DIM}Heard:{RESET} {text}"),
        SessionEvent::NoSpeech => format!("{DIM}No speech detected{RESET}"),
        SessionEvent::SubmissionStarted { input } => format!("{DIM}Sending: {input}{RESET}"),
        SessionEvent::Responded {
            text,
            intent,
            sentiment,
        } => format!(
            "{BOLD}{text}{RESET}{}",
            metadata_tag(intent.as_deref(), sentiment.as_deref())
        ),
        SessionEvent::Failed { message } => format!("{RED}{message}{RESET}"),
        SessionEvent::FeedbackAcknowledged { message, success } => {
            let color = if *success { GREEN } else { RED };
            format!("{color}{message}{RESET}")
        }
        SessionEvent::Notice { message } => format!("{YELLOW}{message}{RESET}"),
        SessionEvent::LoggedOut => format!("{DIM}Signed out{RESET}"),
    }
}

/// Print one session event to stderr.
///
/// Replies go to stdout instead so they can be piped.
pub fn render_event(event: &SessionEvent) {
    let line = format_event(event);
    match event {
        SessionEvent::Responded { .. } => println!("{line}"),
        SessionEvent::CaptureStarted => eprintln!("{line}"),
        _ => {
            clear_line();
            eprintln!("{line}");
        }
    }
}

/// Render the voice list, marking the selected voice.
pub fn format_voices(voices: &[Voice], selected: Option<&Voice>) -> String {
    if voices.is_empty() {
        return "No voices available".to_string();
    }
    let mut out = String::from("Voices:\n");
    for voice in voices {
        if Some(voice) == selected {
            out.push_str(&format!("  {GREEN}●{RESET} {} ({})\n", voice.name, voice.language));
        } else {
            out.push_str(&format!("  ○ {} ({})\n", voice.name, voice.language));
        }
    }
    out
}
