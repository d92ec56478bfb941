use crate::auth::Authenticator;
use crate::capture::SpeechCapture;
use crate::client::OrderApi;
use crate::defaults;
use crate::error::VoiceOrderError;
use crate::playback::SpeechPlayback;
use crate::session::state::{
    CaptureOutcome, FeedbackOutcome, SessionEvent, SessionState, SubmitOutcome,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct Inner {
    state: SessionState,
    feedback_in_flight: bool,
    closed: bool,
}

/// Order session controller.
///
/// Owns the form state and sequences capture, submission and playback.
/// At most one submission, one capture and one feedback call run at a time;
/// extra triggers are dropped, never queued. The state lock is released
/// before every await.
pub struct OrderSession {
    api: Arc<dyn OrderApi>,
    capture: SpeechCapture,
    playback: SpeechPlayback,
    authenticator: Option<Arc<dyn Authenticator>>,
    event_tx: Option<crossbeam_channel::Sender<SessionEvent>>,
    inner: Mutex<Inner>,
}

impl OrderSession {
    pub fn new(api: Arc<dyn OrderApi>, capture: SpeechCapture, playback: SpeechPlayback) -> Self {
        Self {
            api,
            capture,
            playback,
            authenticator: None,
            event_tx: None,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Attach the authenticator that `logout` signs out of.
    pub fn with_authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// Publish session events to `tx`. Sends never block; a full or
    /// disconnected channel drops the event.
    pub fn with_event_sender(mut self, tx: crossbeam_channel::Sender<SessionEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(ref tx) = self.event_tx
            && tx.try_send(event).is_err()
        {
            debug!("session event dropped");
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    pub fn is_capturing(&self) -> bool {
        self.capture.is_active()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn playback(&self) -> &SpeechPlayback {
        &self.playback
    }

    /// Replace the order text, as typed by the user.
    pub fn set_input(&self, text: &str) {
        self.lock().state.input_text = text.to_string();
    }

    /// Replace the feedback text. Allowed while a submission is pending.
    pub fn set_feedback(&self, text: &str) {
        self.lock().state.feedback_text = text.to_string();
    }

    /// Publish a front-end notice on the event stream.
    pub fn notify(&self, message: &str) {
        self.emit(SessionEvent::Notice {
            message: message.to_string(),
        });
    }

    /// Submit the current input.
    ///
    /// Empty input and re-entrant calls return without touching the
    /// network. On success the input is cleared and the reply is spoken; on
    /// failure the error message replaces the displayed text and the input
    /// stays for a retry.
    pub async fn submit(&self) -> SubmitOutcome {
        self.submit_input(None).await
    }

    /// Replace the input with `text` and submit it in one step.
    ///
    /// While a submission is pending the call is `Ignored` and the pending
    /// input is left alone.
    pub async fn submit_text(&self, text: &str) -> SubmitOutcome {
        self.submit_input(Some(text)).await
    }

    async fn submit_input(&self, text: Option<&str>) -> SubmitOutcome {
        let input = {
            let mut inner = self.lock();
            if inner.closed {
                return SubmitOutcome::Closed;
            }
            if inner.state.is_submitting {
                debug!("submission already in flight, trigger ignored");
                return SubmitOutcome::Ignored;
            }
            if let Some(text) = text {
                inner.state.input_text = text.to_string();
            }
            if inner.state.input_text.trim().is_empty() {
                drop(inner);
                self.emit(SessionEvent::Notice {
                    message: defaults::EMPTY_INPUT_MESSAGE.to_string(),
                });
                return SubmitOutcome::Rejected;
            }
            inner.state.is_submitting = true;
            inner.state.input_text.clone()
        };

        self.emit(SessionEvent::SubmissionStarted {
            input: input.clone(),
        });
        let result = self.api.submit_order(&input).await;

        let mut inner = self.lock();
        inner.state.is_submitting = false;
        if inner.closed {
            info!("order reply arrived after logout, discarded");
            return SubmitOutcome::Discarded;
        }

        match result {
            Ok(response) => {
                inner.state.last_response_text = Some(response.text.clone());
                inner.state.input_text.clear();
                drop(inner);

                self.emit(SessionEvent::Responded {
                    text: response.text.clone(),
                    intent: response.intent.clone(),
                    sentiment: response.sentiment.clone(),
                });
                self.playback.speak(&response.text);
                SubmitOutcome::Responded(response)
            }
            Err(e) => {
                let message = e.user_message();
                if e.is_submission_failure() {
                    warn!("order submission failed: {e}");
                } else {
                    debug!("order not sent: {e}");
                }
                inner.state.last_response_text = Some(message.clone());
                drop(inner);

                self.emit(SessionEvent::Failed {
                    message: message.clone(),
                });
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Run one capture session and put the transcript in the input field.
    pub async fn capture_voice(&self) -> CaptureOutcome {
        {
            let inner = self.lock();
            if inner.closed {
                return CaptureOutcome::Closed;
            }
            if inner.state.is_submitting {
                drop(inner);
                self.emit(SessionEvent::Notice {
                    message: defaults::CAPTURE_BUSY_MESSAGE.to_string(),
                });
                return CaptureOutcome::Busy;
            }
        }

        if self.capture.is_available() && !self.capture.is_active() {
            self.emit(SessionEvent::CaptureStarted);
        }

        match self.capture.capture().await {
            Ok(Some(transcript)) => {
                let text = transcript.into_string();
                {
                    let mut inner = self.lock();
                    if inner.closed {
                        return CaptureOutcome::Closed;
                    }
                    inner.state.input_text = text.clone();
                }
                self.emit(SessionEvent::Transcript { text: text.clone() });
                CaptureOutcome::Transcript(text)
            }
            Ok(None) => {
                self.emit(SessionEvent::NoSpeech);
                CaptureOutcome::NoSpeech
            }
            Err(VoiceOrderError::CapabilityUnavailable) => {
                self.emit(SessionEvent::Notice {
                    message: defaults::CAPABILITY_UNAVAILABLE_MESSAGE.to_string(),
                });
                CaptureOutcome::Unavailable
            }
            Err(VoiceOrderError::CaptureBusy) => {
                self.emit(SessionEvent::Notice {
                    message: defaults::CAPTURE_BUSY_MESSAGE.to_string(),
                });
                CaptureOutcome::Busy
            }
            Err(e) => {
                debug!("capture failed: {e}");
                let message = defaults::CAPTURE_FAILED_MESSAGE.to_string();
                {
                    let mut inner = self.lock();
                    if inner.closed {
                        return CaptureOutcome::Closed;
                    }
                    inner.state.last_response_text = Some(message.clone());
                }
                self.emit(SessionEvent::Failed {
                    message: message.clone(),
                });
                CaptureOutcome::Failed(message)
            }
        }
    }

    /// Send the feedback text. Independent of the order flow: the input and
    /// displayed response are never touched.
    pub async fn submit_feedback(&self) -> FeedbackOutcome {
        let feedback = {
            let mut inner = self.lock();
            if inner.closed {
                return FeedbackOutcome::Closed;
            }
            if inner.feedback_in_flight {
                return FeedbackOutcome::Busy;
            }
            if inner.state.feedback_text.trim().is_empty() {
                drop(inner);
                let message = defaults::EMPTY_FEEDBACK_MESSAGE.to_string();
                self.emit(SessionEvent::FeedbackAcknowledged {
                    message: message.clone(),
                    success: false,
                });
                return FeedbackOutcome::Rejected(message);
            }
            inner.feedback_in_flight = true;
            inner.state.feedback_text.clone()
        };

        let result = self.api.submit_feedback(&feedback).await;

        let outcome = {
            let mut inner = self.lock();
            inner.feedback_in_flight = false;
            match result {
                Ok(()) => {
                    if !inner.closed {
                        inner.state.feedback_text.clear();
                    }
                    info!("feedback submitted");
                    FeedbackOutcome::Acknowledged(defaults::FEEDBACK_THANKS_MESSAGE.to_string())
                }
                Err(e) => {
                    warn!("feedback submission failed: {e}");
                    FeedbackOutcome::Failed(defaults::FEEDBACK_ERROR_MESSAGE.to_string())
                }
            }
        };

        match &outcome {
            FeedbackOutcome::Acknowledged(message) => {
                self.emit(SessionEvent::FeedbackAcknowledged {
                    message: message.clone(),
                    success: true,
                })
            }
            FeedbackOutcome::Failed(message) => self.emit(SessionEvent::FeedbackAcknowledged {
                message: message.clone(),
                success: false,
            }),
            _ => {}
        }
        outcome
    }

    /// End the session and sign out.
    ///
    /// An in-flight submission is left to finish; its reply is discarded.
    pub async fn logout(&self) -> crate::error::Result<()> {
        let pending = {
            let mut inner = self.lock();
            if inner.closed {
                return Ok(());
            }
            inner.closed = true;
            inner.state.is_submitting
        };
        if pending {
            debug!("logging out with a submission in flight");
        }

        self.emit(SessionEvent::LoggedOut);

        match &self.authenticator {
            Some(auth) => auth.sign_out().await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{LocalAuthenticator, SessionGate, log_in_as_guest};
    use crate::capture::{CaptureCapability, MockRecognizer, RecognitionOptions};
    use crate::client::MockOrderApi;
    use crate::config::AuthConfig;
    use crate::playback::{MockSynthesizer, SynthesisCapability, Voice};
    use std::time::Duration;
    use tokio::sync::Notify;

    struct Fixture {
        session: Arc<OrderSession>,
        api: Arc<MockOrderApi>,
        synth: MockSynthesizer,
    }

    fn fixture_with(api: MockOrderApi, recognizer: CaptureCapability) -> Fixture {
        let api = Arc::new(api);
        let synth = MockSynthesizer::new().with_voices(vec![Voice::new("en-us", "en-us")]);
        let capture = SpeechCapture::new(
            recognizer,
            RecognitionOptions::default(),
            Duration::from_millis(500),
        );
        let playback = SpeechPlayback::new(
            SynthesisCapability::Available(Arc::new(synth.clone())),
            None,
            1.0,
            1.0,
        );
        let session = OrderSession::new(Arc::clone(&api) as Arc<dyn OrderApi>, capture, playback);
        Fixture {
            session: Arc::new(session),
            api,
            synth,
        }
    }

    fn fixture(api: MockOrderApi) -> Fixture {
        fixture_with(
            api,
            CaptureCapability::Available(Arc::new(MockRecognizer::new("two teas please"))),
        )
    }

    async fn wait_until_submitting(session: &OrderSession) {
        for _ in 0..200 {
            if session.state().is_submitting {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("submission never started");
    }

    #[tokio::test]
    async fn test_empty_submit_makes_no_call_and_changes_nothing() {
        let f = fixture(MockOrderApi::new());
        f.session.set_feedback("draft");
        let before = f.session.state();

        assert_eq!(f.session.submit().await, SubmitOutcome::Rejected);
        f.session.set_input("   ");
        assert_eq!(f.session.submit().await, SubmitOutcome::Rejected);

        assert_eq!(f.api.order_calls(), 0);
        assert_eq!(f.session.state().last_response_text, before.last_response_text);
        assert_eq!(f.session.state().feedback_text, "draft");
        assert!(!f.session.state().is_submitting);
    }

    #[tokio::test]
    async fn test_success_clears_input_and_speaks_reply() {
        let f = fixture(MockOrderApi::new().with_reply("Order placed for table 5: two coffees"));
        f.session.set_input("table 5 wants two coffees");

        let outcome = f.session.submit().await;
        assert!(matches!(outcome, SubmitOutcome::Responded(_)));

        let state = f.session.state();
        assert_eq!(state.input_text, "");
        assert!(!state.is_submitting);
        assert_eq!(
            state.last_response_text.as_deref(),
            Some("Order placed for table 5: two coffees")
        );
        assert_eq!(
            f.synth.spoken_texts(),
            vec!["Order placed for table 5: two coffees"]
        );
        assert_eq!(f.api.orders(), vec!["table 5 wants two coffees"]);
    }

    #[tokio::test]
    async fn test_failure_keeps_input_and_shows_message() {
        let f = fixture(MockOrderApi::new().with_order_error(VoiceOrderError::ServerError {
            message: "db down".to_string(),
        }));
        f.session.set_input("x");

        assert_eq!(
            f.session.submit().await,
            SubmitOutcome::Failed("db down".to_string())
        );

        let state = f.session.state();
        assert_eq!(state.input_text, "x");
        assert_eq!(state.last_response_text.as_deref(), Some("db down"));
        assert!(f.synth.spoken_texts().is_empty());
    }

    #[tokio::test]
    async fn test_no_response_message() {
        let f = fixture(MockOrderApi::new().with_order_error(VoiceOrderError::NetworkUnreachable));
        f.session.set_input("one soup");

        f.session.submit().await;
        assert_eq!(
            f.session.state().last_response_text.as_deref(),
            Some(defaults::NO_RESPONSE_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_every_outcome_clears_input_only_on_success() {
        let errors = [
            VoiceOrderError::ServerError {
                message: "Internal Server Error".to_string(),
            },
            VoiceOrderError::NetworkUnreachable,
            VoiceOrderError::RequestError {
                message: "bad request".to_string(),
            },
            VoiceOrderError::MalformedResponse,
        ];
        for error in errors {
            let f = fixture(MockOrderApi::new().with_order_error(error));
            f.session.set_input("pasta");
            assert!(matches!(f.session.submit().await, SubmitOutcome::Failed(_)));
            assert_eq!(f.session.state().input_text, "pasta");
        }

        let f = fixture(MockOrderApi::new());
        f.session.set_input("pasta");
        assert!(matches!(f.session.submit().await, SubmitOutcome::Responded(_)));
        assert_eq!(f.session.state().input_text, "");
    }

    #[tokio::test]
    async fn test_resubmit_after_failure() {
        let f = fixture(
            MockOrderApi::new()
                .with_order_error(VoiceOrderError::NetworkUnreachable)
                .with_reply("ok now"),
        );
        f.session.set_input("salad");

        assert!(matches!(f.session.submit().await, SubmitOutcome::Failed(_)));
        assert!(matches!(f.session.submit().await, SubmitOutcome::Responded(_)));
        assert_eq!(f.api.orders(), vec!["salad", "salad"]);
    }

    #[tokio::test]
    async fn test_concurrent_submit_issues_one_call() {
        let release = Arc::new(Notify::new());
        let f = fixture(MockOrderApi::new().with_reply("done").with_hold(Arc::clone(&release)));
        f.session.set_input("burger");

        let first = {
            let session = Arc::clone(&f.session);
            tokio::spawn(async move { session.submit().await })
        };
        wait_until_submitting(&f.session).await;

        assert_eq!(f.session.submit().await, SubmitOutcome::Ignored);
        assert_eq!(f.session.submit().await, SubmitOutcome::Ignored);

        release.notify_one();
        assert!(matches!(first.await.unwrap(), SubmitOutcome::Responded(_)));
        assert_eq!(f.api.order_calls(), 1);
    }

    #[tokio::test]
    async fn test_feedback_editable_while_submitting() {
        let release = Arc::new(Notify::new());
        let f = fixture(MockOrderApi::new().with_hold(Arc::clone(&release)));
        f.session.set_input("fries");

        let pending = {
            let session = Arc::clone(&f.session);
            tokio::spawn(async move { session.submit().await })
        };
        wait_until_submitting(&f.session).await;

        f.session.set_feedback("great app");
        assert_eq!(
            f.session.submit_feedback().await,
            FeedbackOutcome::Acknowledged(defaults::FEEDBACK_THANKS_MESSAGE.to_string())
        );

        release.notify_one();
        pending.await.unwrap();
        assert_eq!(f.api.feedback(), vec!["great app"]);
    }

    #[tokio::test]
    async fn test_feedback_success_leaves_order_fields_alone() {
        let f = fixture(MockOrderApi::new().with_reply("Order received"));
        f.session.set_input("tea");
        f.session.submit().await;
        f.session.set_input("next order");
        f.session.set_feedback("too slow");

        let outcome = f.session.submit_feedback().await;
        assert_eq!(
            outcome,
            FeedbackOutcome::Acknowledged("Thank you for your feedback!".to_string())
        );

        let state = f.session.state();
        assert_eq!(state.feedback_text, "");
        assert_eq!(state.input_text, "next order");
        assert_eq!(state.last_response_text.as_deref(), Some("Order received"));
        assert_eq!(f.api.feedback(), vec!["too slow"]);
    }

    #[tokio::test]
    async fn test_feedback_failure_keeps_text() {
        let f = fixture(MockOrderApi::new().with_feedback_error(VoiceOrderError::NetworkUnreachable));
        f.session.set_feedback("cold food");

        assert_eq!(
            f.session.submit_feedback().await,
            FeedbackOutcome::Failed(defaults::FEEDBACK_ERROR_MESSAGE.to_string())
        );
        assert_eq!(f.session.state().feedback_text, "cold food");
        assert_eq!(f.session.state().last_response_text, None);
    }

    #[tokio::test]
    async fn test_empty_feedback_is_not_sent() {
        let f = fixture(MockOrderApi::new());
        assert_eq!(
            f.session.submit_feedback().await,
            FeedbackOutcome::Rejected("Please provide your feedback.".to_string())
        );
        assert_eq!(f.api.feedback_calls(), 0);
    }

    #[tokio::test]
    async fn test_capture_fills_input() {
        let f = fixture(MockOrderApi::new());
        f.session.set_input("old text");

        assert_eq!(
            f.session.capture_voice().await,
            CaptureOutcome::Transcript("two teas please".to_string())
        );
        assert_eq!(f.session.state().input_text, "two teas please");
        assert!(!f.session.is_capturing());
    }

    #[tokio::test]
    async fn test_capture_silence_changes_nothing() {
        let f = fixture_with(
            MockOrderApi::new(),
            CaptureCapability::Available(Arc::new(MockRecognizer::new("").with_silence())),
        );
        f.session.set_input("kept");

        assert_eq!(f.session.capture_voice().await, CaptureOutcome::NoSpeech);
        assert_eq!(f.session.state().input_text, "kept");
        assert_eq!(f.session.state().last_response_text, None);
    }

    #[tokio::test]
    async fn test_capture_failure_shows_message_keeps_input() {
        let f = fixture_with(
            MockOrderApi::new(),
            CaptureCapability::Available(Arc::new(MockRecognizer::new("").with_failure("no-speech"))),
        );
        f.session.set_input("kept");

        assert_eq!(
            f.session.capture_voice().await,
            CaptureOutcome::Failed(defaults::CAPTURE_FAILED_MESSAGE.to_string())
        );
        let state = f.session.state();
        assert_eq!(state.input_text, "kept");
        assert_eq!(
            state.last_response_text.as_deref(),
            Some("Error in voice recognition. Please try again.")
        );
    }

    #[tokio::test]
    async fn test_capture_unavailable_is_a_notice() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let f = fixture_with(MockOrderApi::new(), CaptureCapability::Unavailable);
        let session = Arc::try_unwrap(f.session)
            .ok()
            .unwrap()
            .with_event_sender(tx);

        assert_eq!(session.capture_voice().await, CaptureOutcome::Unavailable);
        assert_eq!(session.state(), SessionState::default());
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::Notice {
                message: defaults::CAPABILITY_UNAVAILABLE_MESSAGE.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_capture_refused_while_submitting() {
        let release = Arc::new(Notify::new());
        let recognizer = MockRecognizer::new("anything");
        let f = fixture_with(
            MockOrderApi::new().with_hold(Arc::clone(&release)),
            CaptureCapability::Available(Arc::new(recognizer.clone())),
        );
        f.session.set_input("wrap");

        let pending = {
            let session = Arc::clone(&f.session);
            tokio::spawn(async move { session.submit().await })
        };
        wait_until_submitting(&f.session).await;

        assert_eq!(f.session.capture_voice().await, CaptureOutcome::Busy);
        assert_eq!(recognizer.calls(), 0);

        release.notify_one();
        pending.await.unwrap();
    }

    #[tokio::test]
    async fn test_overlapping_capture_is_busy() {
        let f = fixture_with(
            MockOrderApi::new(),
            CaptureCapability::Available(Arc::new(
                MockRecognizer::new("slow words").with_delay(Duration::from_millis(100)),
            )),
        );

        let first = {
            let session = Arc::clone(&f.session);
            tokio::spawn(async move { session.capture_voice().await })
        };
        for _ in 0..100 {
            if f.session.is_capturing() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }

        assert_eq!(f.session.capture_voice().await, CaptureOutcome::Busy);
        assert_eq!(
            first.await.unwrap(),
            CaptureOutcome::Transcript("slow words".to_string())
        );
    }

    #[tokio::test]
    async fn test_reply_after_logout_is_discarded() {
        let release = Arc::new(Notify::new());
        let f = fixture(MockOrderApi::new().with_reply("late").with_hold(Arc::clone(&release)));
        f.session.set_input("dessert");

        let pending = {
            let session = Arc::clone(&f.session);
            tokio::spawn(async move { session.submit().await })
        };
        wait_until_submitting(&f.session).await;

        f.session.logout().await.unwrap();
        release.notify_one();

        assert_eq!(pending.await.unwrap(), SubmitOutcome::Discarded);
        assert_eq!(f.session.state().last_response_text, None);
        assert!(f.synth.spoken_texts().is_empty());
        assert_eq!(f.session.submit().await, SubmitOutcome::Closed);
    }

    #[tokio::test]
    async fn test_logout_signs_out() {
        let auth = Arc::new(LocalAuthenticator::from_config(&AuthConfig::default()));
        log_in_as_guest(auth.as_ref()).await.unwrap();

        let f = fixture(MockOrderApi::new());
        let (tx, rx) = crossbeam_channel::unbounded();
        let session = Arc::try_unwrap(f.session)
            .ok()
            .unwrap()
            .with_authenticator(Arc::clone(&auth) as Arc<dyn Authenticator>)
            .with_event_sender(tx);

        session.logout().await.unwrap();
        assert!(session.is_closed());
        assert!(auth.current_user().is_none());
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::LoggedOut);
    }

    #[tokio::test]
    async fn test_events_follow_the_submission() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let f = fixture(MockOrderApi::new().with_reply("Coming right up"));
        let session = Arc::try_unwrap(f.session)
            .ok()
            .unwrap()
            .with_event_sender(tx);
        session.set_input("latte");
        session.submit().await;

        let events: Vec<SessionEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                SessionEvent::SubmissionStarted {
                    input: "latte".to_string()
                },
                SessionEvent::Responded {
                    text: "Coming right up".to_string(),
                    intent: None,
                    sentiment: None,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_full_event_channel_does_not_block() {
        let (tx, _rx) = crossbeam_channel::bounded(0);
        let f = fixture(MockOrderApi::new());
        let session = Arc::try_unwrap(f.session)
            .ok()
            .unwrap()
            .with_event_sender(tx);
        session.set_input("water");

        assert!(matches!(session.submit().await, SubmitOutcome::Responded(_)));
    }

    #[tokio::test]
    async fn test_submit_text_while_pending_keeps_pending_input() {
        let release = Arc::new(Notify::new());
        let f = fixture(MockOrderApi::new().with_hold(Arc::clone(&release)));

        let first = {
            let session = Arc::clone(&f.session);
            tokio::spawn(async move { session.submit_text("one soup").await })
        };
        wait_until_submitting(&f.session).await;

        assert_eq!(f.session.submit_text("two soups").await, SubmitOutcome::Ignored);
        assert_eq!(f.session.state().input_text, "one soup");

        release.notify_one();
        assert!(matches!(first.await.unwrap(), SubmitOutcome::Responded(_)));
        assert_eq!(f.api.orders(), vec!["one soup"]);
    }

    #[tokio::test]
    async fn test_notify_publishes_notice() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let f = fixture(MockOrderApi::new());
        let session = Arc::try_unwrap(f.session)
            .ok()
            .unwrap()
            .with_event_sender(tx);

        session.notify("still working");
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::Notice {
                message: "still working".to_string()
            }
        );
    }
}
