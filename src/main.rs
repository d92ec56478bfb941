use anyhow::Result;
use clap::FromArgMatches;
use owo_colors::OwoColorize;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voice_order::auth::{
    Admission, Identity, LocalAuthenticator, admit, log_in, log_in_as_guest, sign_up,
};
use voice_order::capture::{CaptureCapability, SpeechCapture};
use voice_order::cli::{self, Cli, Commands, ConfigAction};
use voice_order::client::HttpOrderClient;
use voice_order::config::Config;
use voice_order::error::VoiceOrderError;
use voice_order::interactive;
use voice_order::output::render_event;
use voice_order::playback::{SpeechPlayback, SynthesisCapability};
use voice_order::session::{
    CaptureOutcome, FeedbackOutcome, OrderSession, SessionEvent, SubmitOutcome,
};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
    init_tracing(cli.verbose);

    match &cli.command {
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                *shell,
                &mut cli::command(),
                "voice-order",
                &mut std::io::stdout(),
            );
            return Ok(());
        }
        Some(Commands::Config { action }) => {
            return handle_config_command(action, &cli);
        }
        _ => {}
    }

    let config = load_config(&cli)?;
    let auth = Arc::new(LocalAuthenticator::from_config(&config.auth));

    if let Some(Commands::Signup { confirm }) = &cli.command {
        return handle_signup(&cli, &auth, confirm).await;
    }

    sign_in(&cli, &auth).await;
    let identity = match admit(auth.as_ref()) {
        Admission::Admitted(identity) => identity,
        Admission::Redirect(entry_point) => exit_with(&format!(
            "{} Sign in at {entry_point} with --email/--password or --guest.",
            VoiceOrderError::NotAuthenticated.user_message()
        )),
    };
    info!(user = identity.display_name(), "admitted to ordering session");

    let (event_tx, event_rx) = crossbeam_channel::unbounded::<SessionEvent>();
    let renderer = std::thread::Builder::new()
        .name("voice-order-render".to_string())
        .spawn(move || {
            for event in event_rx {
                render_event(&event);
            }
        })?;

    let session = Arc::new(build_session(&config, Arc::clone(&auth), event_tx)?);

    let succeeded = match cli.command {
        None | Some(Commands::Interactive) => run_interactive(&session, &identity).await?,
        Some(Commands::Order { text }) => run_order(&session, &text.join(" ")).await,
        Some(Commands::Listen) => run_listen(&session).await,
        Some(Commands::Feedback { text }) => run_feedback(&session, &text.join(" ")).await,
        // Handled before sign-in.
        Some(Commands::Signup { .. } | Commands::Config { .. } | Commands::Completions { .. }) => {
            true
        }
    };

    // Dropping the session closes the event channel and lets the renderer finish.
    drop(session);
    if renderer.join().is_err() {
        warn!("event renderer panicked");
    }

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}

/// Install the diagnostics subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "voice_order=info,warn",
        _ => "voice_order=debug,info",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/voice-order/config.toml)
/// 3. Built-in defaults
///
/// Environment variables and `--timeout` are applied on top, then the
/// result is validated again.
fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(&Config::default_path())?,
    };

    Ok(config.with_overrides(cli.timeout)?)
}

/// Print an error in red and exit with status 1.
fn exit_with(message: &str) -> ! {
    eprintln!("{}", message.red());
    std::process::exit(1);
}

/// Handle configuration commands.
fn handle_config_command(action: &ConfigAction, cli: &Cli) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(cli)?;
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Path => {
            let path = cli.config.clone().unwrap_or_else(Config::default_path);
            println!("{}", path.display());
        }
    }
    Ok(())
}

async fn handle_signup(cli: &Cli, auth: &LocalAuthenticator, confirm: &str) -> Result<()> {
    let (Some(email), Some(password)) = (&cli.email, &cli.password) else {
        exit_with("signup needs --email and --password");
    };

    match sign_up(auth, email, password, confirm).await {
        Ok(()) => {
            println!("{}", format!("Account created for {email}").green());
            println!(
                "{}",
                "Local accounts last for this process; add them under [auth.accounts] to keep them."
                    .dimmed()
            );
            Ok(())
        }
        Err(e) => {
            debug!("sign-up failed: {e}");
            exit_with(&e.user_message());
        }
    }
}

/// Sign in as requested on the command line. Without flags nobody is signed
/// in and the gate redirects.
async fn sign_in(cli: &Cli, auth: &LocalAuthenticator) {
    let result = if cli.guest {
        log_in_as_guest(auth).await
    } else if let (Some(email), Some(password)) = (&cli.email, &cli.password) {
        log_in(auth, email, password).await
    } else {
        return;
    };

    if let Err(e) = result {
        exit_with(&e.user_message());
    }
}

fn build_session(
    config: &Config,
    auth: Arc<LocalAuthenticator>,
    event_tx: crossbeam_channel::Sender<SessionEvent>,
) -> Result<OrderSession> {
    let api = HttpOrderClient::new(&config.api)?;

    let capture_capability = CaptureCapability::detect(&config.speech);
    let synthesis_capability = SynthesisCapability::detect(&config.speech);
    debug!(
        capture = ?capture_capability,
        synthesis = ?synthesis_capability,
        order_url = api.order_url(),
        "session capabilities resolved"
    );

    let capture = SpeechCapture::from_config(capture_capability, &config.speech);
    let playback = SpeechPlayback::from_config(synthesis_capability, &config.speech);

    Ok(OrderSession::new(Arc::new(api), capture, playback)
        .with_authenticator(auth)
        .with_event_sender(event_tx))
}

async fn run_order(session: &OrderSession, text: &str) -> bool {
    session.set_input(text);
    matches!(session.submit().await, SubmitOutcome::Responded(_))
}

async fn run_listen(session: &OrderSession) -> bool {
    match session.capture_voice().await {
        CaptureOutcome::Transcript(_) => {
            matches!(session.submit().await, SubmitOutcome::Responded(_))
        }
        _ => false,
    }
}

async fn run_feedback(session: &OrderSession, text: &str) -> bool {
    session.set_feedback(text);
    matches!(
        session.submit_feedback().await,
        FeedbackOutcome::Acknowledged(_)
    )
}

/// Line-based ordering loop on stdin.
async fn run_interactive(session: &Arc<OrderSession>, identity: &Identity) -> Result<bool> {
    eprintln!(
        "Signed in as {}. Type :help for commands.",
        identity.display_name().green()
    );

    let exit = interactive::run(Arc::clone(session), BufReader::new(tokio::io::stdin())).await?;
    debug!(?exit, "interactive session ended");
    Ok(true)
}
