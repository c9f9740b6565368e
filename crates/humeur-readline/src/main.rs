use std::borrow::Cow::{self, Borrowed, Owned};
use std::env;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::{Color, Colorize};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing::info;
use tracing_subscriber::EnvFilter;

use humeur_application::{AnalyzeOutcome, LoginFlow, SentimentFlow, SessionGuard, SubmitOutcome};
use humeur_core::credentials::Field;
use humeur_core::sentiment::{score_stars, SentimentResult, Tone};
use humeur_core::session::{SessionService, SessionState};
use humeur_infrastructure::{ClientConfig, ConfigStorage, SessionStorage, API_URL_ENV};
use humeur_interaction::{HttpSentimentApi, SentimentApi};

/// Terminal client for the sentiment analysis service.
#[derive(Parser)]
#[command(name = "humeur", about = "humeur - sentiment analysis client", long_about = None)]
struct Cli {
    /// Backend base address (overrides config file and HUMEUR_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// CLI helper for rustyline that provides completion, highlighting, and hints
/// for the slash commands of the sentiment screen.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: vec!["/logout".to_string(), "/quit".to_string()],
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

type Repl = Editor<CliHelper, DefaultHistory>;

fn read_line(editor: &mut Repl, prompt: &str) -> Result<Option<String>> {
    match editor.readline(prompt) {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// The login screen. Returns `false` when the user quit instead of logging
/// in.
async fn login_screen(editor: &mut Repl, flow: &mut LoginFlow) -> Result<bool> {
    println!();
    println!("{}", "Login".bold());

    loop {
        let Some(username) = read_line(editor, "username: ")? else {
            return Ok(false);
        };
        if username.trim() == "/quit" {
            return Ok(false);
        }
        flow.update_field(Field::Username, username);

        let Some(password) = read_line(editor, "password: ")? else {
            return Ok(false);
        };
        flow.update_field(Field::Password, password);

        // Submit control is "disabled" for the duration: the REPL blocks on
        // the request, so a second submit cannot start while one is pending.
        println!("{}", "Signing in...".dimmed());
        match flow.submit().await? {
            SubmitOutcome::Rejected => {
                if let Some(msg) = flow.field_errors().get(Field::Username) {
                    println!("{}", msg.red());
                }
                if let Some(msg) = flow.field_errors().get(Field::Password) {
                    println!("{}", msg.red());
                }
            }
            SubmitOutcome::Failed { message } => {
                println!("{}", message.red());
            }
            SubmitOutcome::LoggedIn => {
                println!("{}", "Logged in.".green());
                return Ok(true);
            }
        }
    }
}

fn render_result(result: &SentimentResult) {
    let tone = result.tone();
    let color = tone_color(tone);

    println!();
    println!("{}", "🎭 Analysis result".bold());
    println!(
        "  score:     {}  {}",
        result.score_display().color(color).bold(),
        score_stars(result.score)
    );
    println!(
        "  sentiment: {} {}",
        tone.icon(),
        result.sentiment.color(color).bold()
    );
    if let Some(confidence) = result.confidence_display() {
        println!("  {}", confidence.dimmed());
    }
    println!();
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Positive => Color::Green,
        Tone::Negative => Color::Red,
        Tone::Neutral => Color::Yellow,
        Tone::Unknown => Color::BrightBlack,
    }
}

/// The protected sentiment screen. Returns `false` when the user quit the
/// application; `true` hands control back to the session guard.
async fn sentiment_screen(editor: &mut Repl, flow: &mut SentimentFlow) -> Result<bool> {
    println!();
    println!("{}", "Sentiment analysis".bold());
    println!(
        "{}",
        "Type some text to analyze it, /logout to sign out, /quit to exit.".dimmed()
    );

    loop {
        let Some(line) = read_line(editor, "analyze> ")? else {
            return Ok(false);
        };

        match line.trim() {
            "/quit" => return Ok(false),
            "/logout" => {
                flow.logout()?;
                println!("{}", "Logged out.".green());
                return Ok(true);
            }
            _ => {}
        }

        // Input and submit stay "disabled" while the request is in flight:
        // the REPL does not prompt again until the await resolves.
        println!("{}", "Analyzing...".dimmed());
        match flow.analyze(&line).await? {
            AnalyzeOutcome::Analyzed => {
                if let Some(result) = flow.result() {
                    render_result(result);
                }
            }
            AnalyzeOutcome::Rejected { message } | AnalyzeOutcome::Failed { message } => {
                println!("{}", message.red());
            }
            AnalyzeOutcome::SessionExpired => {
                println!("{}", "session expired, please log in again".red());
                return Ok(true);
            }
            AnalyzeOutcome::AuthRejected => {
                println!("{}", "authentication failed, please log in again".red());
                return Ok(true);
            }
        }
    }
}

/// The unauthenticated placeholder with its single re-login action. Returns
/// `false` when the user quit instead.
fn unauthenticated_placeholder(editor: &mut Repl, guard: &SessionGuard) -> Result<bool> {
    println!();
    println!("{}", "🔒 Session required".bold());
    println!("You need to log in to use the sentiment analyzer.");

    let Some(line) = read_line(editor, "press Enter to log in again (/quit to exit): ")? else {
        return Ok(false);
    };
    if line.trim() == "/quit" {
        return Ok(false);
    }

    // Clear any stale stored state before going back to the entry point.
    guard.relogin()?;
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // ===== Backend and session wiring =====
    let config_storage = ConfigStorage::new()?;
    let file_config = config_storage.load_or_init()?;
    let config = ClientConfig::resolve(
        Some(file_config),
        env::var(API_URL_ENV).ok(),
        cli.api_url,
    );
    info!(base_url = %config.api_base_url, "starting humeur client");

    let api: Arc<dyn SentimentApi> = Arc::new(HttpSentimentApi::new(config.api_base_url.clone()));
    let storage = Arc::new(SessionStorage::new()?);
    let session = Arc::new(SessionService::new(storage));

    let guard = SessionGuard::new(session.clone());
    let mut login = LoginFlow::new(api.clone(), session.clone());
    let mut sentiment = SentimentFlow::new(api.clone(), session.clone());

    let mut editor: Repl = Editor::new()?;
    editor.set_helper(Some(CliHelper::new()));

    println!("{}", "humeur".bold().cyan());
    println!("{}", format!("backend: {}", config.api_base_url).dimmed());

    // The entry point forwards straight to the login screen unless a stored
    // session already exists; every pass through the loop re-runs the guard.
    // Once past the entry, losing the session lands on the placeholder, whose
    // only action is re-login.
    let mut first_visit = true;
    loop {
        let stay = match guard.check()? {
            SessionState::Unauthenticated if first_visit => {
                first_visit = false;
                login_screen(&mut editor, &mut login).await?
            }
            SessionState::Unauthenticated => {
                if unauthenticated_placeholder(&mut editor, &guard)? {
                    login_screen(&mut editor, &mut login).await?
                } else {
                    false
                }
            }
            SessionState::Authenticated { .. } => {
                first_visit = false;
                sentiment_screen(&mut editor, &mut sentiment).await?
            }
        };

        if !stay {
            break;
        }
    }

    println!("{}", "Bye.".dimmed());
    Ok(())
}
