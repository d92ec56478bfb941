use crate::client::OrderResponse;

/// Snapshot of the ordering form.
///
/// `last_response_text` holds either the backend reply or a submission
/// error message; the two share one display field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub input_text: String,
    pub is_submitting: bool,
    pub last_response_text: Option<String>,
    pub feedback_text: String,
}

/// Result of one `submit` call.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The backend answered; input was cleared and the reply spoken.
    Responded(OrderResponse),
    /// Submission failed with this display message; input was kept.
    Failed(String),
    /// Input was empty; nothing was sent.
    Rejected,
    /// A submission was already in flight; this trigger was dropped.
    Ignored,
    /// The reply arrived after logout and was thrown away.
    Discarded,
    /// The session has been logged out.
    Closed,
}

/// Result of one `capture_voice` call.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    /// Transcript written into the input field.
    Transcript(String),
    /// Session ended without speech. Nothing changed.
    NoSpeech,
    /// Recognition error; the display field shows this message.
    Failed(String),
    /// No speech support on this platform.
    Unavailable,
    /// A capture or submission is already running.
    Busy,
    Closed,
}

/// Result of one `submit_feedback` call. Each carries the acknowledgement
/// text to show; none of them touch the order fields.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackOutcome {
    Acknowledged(String),
    Failed(String),
    /// Feedback text was empty; nothing was sent.
    Rejected(String),
    /// A feedback submission is already in flight.
    Busy,
    Closed,
}

/// Notifications for a front end rendering the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    CaptureStarted,
    Transcript {
        text: String,
    },
    NoSpeech,
    SubmissionStarted {
        input: String,
    },
    Responded {
        text: String,
        intent: Option<String>,
        sentiment: Option<String>,
    },
    Failed {
        message: String,
    },
    FeedbackAcknowledged {
        message: String,
        success: bool,
    },
    /// Transient message that is not stored in the session state.
    Notice {
        message: String,
    },
    LoggedOut,
}
