use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use quiz_core::model::{DEFAULT_DURATION_SECS, QuestionBank, QuizSettings, TagName, parse_tag_list};
use quiz_core::time::format_mm_ss;
use services::{
    AppServices, AppServicesError, Clock, QuizLoopService, SessionError, SubmitResult, TimedQuiz,
    TimerEvent,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

mod commands;
mod render;

use commands::{Command, print_help};

const IN_MEMORY_DB: &str = "sqlite::memory:";
const WARN_AT_SECS: [u32; 3] = [60, 30, 10];

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDuration { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDuration { raw } => write!(f, "invalid --duration value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug)]
enum AppError {
    Args(ArgsError),
    Io(std::io::Error),
    Quiz(quiz_core::Error),
    Services(AppServicesError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Args(err) => fmt::Display::fmt(err, f),
            AppError::Io(err) => write!(f, "i/o error: {err}"),
            AppError::Quiz(err) => fmt::Display::fmt(err, f),
            AppError::Services(err) => write!(f, "could not open storage: {err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Args(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Quiz(err) => Some(err),
            AppError::Services(err) => Some(err),
        }
    }
}

impl From<ArgsError> for AppError {
    fn from(err: ArgsError) -> Self {
        Self::Args(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<quiz_core::Error> for AppError {
    fn from(err: quiz_core::Error) -> Self {
        Self::Quiz(err)
    }
}

impl From<AppServicesError> for AppError {
    fn from(err: AppServicesError) -> Self {
        Self::Services(err)
    }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--duration <secs>] [--db <sqlite_url>] [--bank <file.json>] [--tags <a,b>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --duration {DEFAULT_DURATION_SECS}");
    eprintln!("  --db sqlite://quiz.sqlite3   (use {IN_MEMORY_DB} to keep nothing)");
    eprintln!("  --bank <built-in cyber-awareness questions>");
    eprintln!("  --tags <all topics>");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DURATION_SECS, QUIZ_DB_URL, QUIZ_BANK, RUST_LOG");
}

/// Raw values of the `QUIZ_*` environment variables.
#[derive(Debug, Default)]
struct EnvDefaults {
    duration_secs: Option<String>,
    db_url: Option<String>,
    bank: Option<String>,
}

impl EnvDefaults {
    fn from_env() -> Self {
        Self {
            duration_secs: std::env::var("QUIZ_DURATION_SECS").ok(),
            db_url: std::env::var("QUIZ_DB_URL").ok(),
            bank: std::env::var("QUIZ_BANK").ok(),
        }
    }
}

struct Args {
    duration_secs: u32,
    db_url: String,
    bank_path: Option<PathBuf>,
    tags: Vec<TagName>,
}

impl Args {
    /// Flags take precedence over `env`, which takes precedence over defaults.
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: EnvDefaults,
    ) -> Result<Self, ArgsError> {
        let mut duration_secs = match env.duration_secs {
            Some(raw) => parse_duration(raw)?,
            None => DEFAULT_DURATION_SECS,
        };
        let mut db_url = env
            .db_url
            .map_or_else(|| "sqlite://quiz.sqlite3".into(), normalize_sqlite_url);
        let mut bank_path = env
            .bank
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let mut tags = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--duration" => {
                    duration_secs = parse_duration(require_value(args, "--duration")?)?;
                }
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--bank" => bank_path = Some(PathBuf::from(require_value(args, "--bank")?)),
                "--tags" => tags = parse_tag_list(&require_value(args, "--tags")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            duration_secs,
            db_url,
            bank_path,
            tags,
        })
    }
}

fn parse_duration(raw: String) -> Result<u32, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidDuration { raw })
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == IN_MEMORY_DB || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim();
    let path = Path::new(trimmed.strip_prefix("sqlite:").unwrap_or(trimmed));
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), AppError> {
    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}

fn load_bank(path: Option<&Path>) -> Result<QuestionBank, AppError> {
    let Some(path) = path else {
        return Ok(QuestionBank::builtin());
    };
    let json = std::fs::read_to_string(path)?;
    let bank = QuestionBank::from_json(&json).map_err(quiz_core::Error::from)?;
    log::info!("loaded {} questions from {}", bank.len(), path.display());
    Ok(bank)
}

//
// ─── INTERACTIVE LOOP ──────────────────────────────────────────────────────────
//

struct Repl {
    service: Arc<QuizLoopService>,
    quiz: TimedQuiz,
    tags: Vec<TagName>,
}

impl Repl {
    async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<TimerEvent>,
    ) -> Result<(), AppError> {
        println!("Type `help` for commands.");
        self.print_best().await;
        self.start();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    match Command::parse(&line) {
                        Ok(Command::Quit) => break,
                        Ok(command) => self.execute(command).await,
                        Err(err) => println!("{err}"),
                    }
                }
                Some(event) = events.recv() => self.on_timer(event).await,
            }
        }

        self.quiz.reset();
        Ok(())
    }

    fn start(&mut self) {
        self.quiz.start(&self.service, &self.tags);
        println!(
            "Topics: {} | {} questions | {} on the clock",
            render::tag_list(&self.tags),
            self.quiz.session().working_set().len(),
            format_mm_ss(self.service.settings().duration_secs())
        );
        self.show();
    }

    fn show(&self) {
        let session = self.quiz.session();
        print!(
            "{}",
            render::working_set(session.working_set(), &session.answers())
        );
    }

    async fn execute(&mut self, command: Command) {
        match command {
            Command::Answer { position, option } => match self.quiz.record(position, option) {
                Ok(_) => self.print_progress(),
                Err(err) => println!("{err}"),
            },
            Command::Clear { position } => match self.quiz.clear_answer(position) {
                Ok(_) => self.print_progress(),
                Err(err) => println!("{err}"),
            },
            Command::Show => self.show(),
            Command::Submit => {
                let result = self.quiz.submit(&self.service).await;
                self.report(result, true);
            }
            Command::Review => {
                let session = self.quiz.session();
                print!(
                    "{}",
                    render::answer_key(&session.answer_key(), session.working_set())
                );
            }
            Command::Filter(tags) => {
                self.tags = tags;
                self.start();
            }
            Command::Restart => self.start(),
            Command::Reset => {
                self.quiz.reset();
                println!("Quiz stopped. Type `restart` to begin again.");
            }
            Command::Time => match self.quiz.remaining_secs() {
                Some(secs) => println!("{} left", format_mm_ss(secs)),
                None => println!("No countdown running."),
            },
            Command::Progress => self.print_progress(),
            Command::Best => self.print_best().await,
            Command::Tags => {
                println!("Available: {}", render::tag_list(self.service.bank().tags()));
                println!("Selected: {}", render::tag_list(&self.tags));
            }
            Command::Help => print_help(),
            Command::Quit => {}
        }
    }

    async fn on_timer(&mut self, event: TimerEvent) {
        let result = self.quiz.handle(&self.service, event).await;
        match event {
            TimerEvent::Tick { attempt, remaining } => {
                if attempt == self.quiz.session().attempt() && WARN_AT_SECS.contains(&remaining) {
                    println!("{} left", format_mm_ss(remaining));
                }
            }
            TimerEvent::Expired { .. } => self.report(result, false),
        }
    }

    async fn print_best(&self) {
        match self.service.best_score().await {
            Ok(best) => println!("{}", render::best(best.as_ref())),
            Err(err) => println!("could not load best score: {err}"),
        }
    }

    fn print_progress(&self) {
        println!(
            "{}",
            render::progress(&self.quiz.session().progress(), self.quiz.remaining_secs())
        );
    }

    fn report(&self, result: Result<Option<SubmitResult>, SessionError>, announce_ignored: bool) {
        let session = self.quiz.session();
        match result {
            Ok(Some(result)) => {
                print!("{}", render::outcome(&result.outcome, session.working_set()));
                let started_at = session.started_at();
                if let Some(line) = render::time_taken(started_at, result.outcome.graded_at) {
                    println!("{line}");
                }
                if let Some(update) = &result.best {
                    println!("{}", render::best_update(update));
                }
            }
            Ok(None) => {
                if announce_ignored {
                    println!("Nothing to grade. Type `restart` to begin a new attempt.");
                }
            }
            Err(err) => {
                log::error!("best score not saved: {err}");
                if let Some(outcome) = session.outcome() {
                    print!("{}", render::outcome(outcome, session.working_set()));
                }
                println!("could not save best score: {err}");
            }
        }
    }
}

async fn run() -> Result<(), AppError> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv, EnvDefaults::from_env()).inspect_err(|_| print_usage())?;

    let settings = QuizSettings::new(args.duration_secs).map_err(quiz_core::Error::from)?;
    let bank = load_bank(args.bank_path.as_deref())?;
    let clock = Clock::default();

    let services = if args.db_url == IN_MEMORY_DB {
        AppServices::in_memory(clock, bank, settings)
    } else {
        // Open + migrate SQLite before the first attempt starts.
        prepare_sqlite_file(&args.db_url)?;
        AppServices::new_sqlite(&args.db_url, clock, bank, settings).await?
    };

    let (tx, events) = mpsc::unbounded_channel();
    let repl = Repl {
        service: services.quiz_loop(),
        quiz: TimedQuiz::new(tx),
        tags: args.tags,
    };
    repl.run(events).await
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
