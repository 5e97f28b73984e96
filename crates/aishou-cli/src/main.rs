mod app;
mod display;

use std::path::PathBuf;
use std::process::ExitCode;

use aishou_ai::{DEFAULT_BASE_URL, DEFAULT_MODEL, FortuneOracle, GeminiClient};
use aishou_core::dob::DobError;
use aishou_core::{AnimalSign, BloodType, DivinationTarget, DobSelector, Relationship, Zodiac};
use aishou_store::{LocalStore, SessionStore, UsageLimiter};
use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::app::{Session, SubmitError, local_today};

const STORAGE_FILE: &str = "storage.json";

#[derive(Parser)]
#[command(name = "aishou", version, about = "AI compatibility fortune telling")]
struct Cli {
    /// Gemini API key.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    #[arg(long, env = "AISHOU_MODEL", default_value = DEFAULT_MODEL, global = true)]
    model: String,

    #[arg(long, env = "AISHOU_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Directory holding the local storage file.
    #[arg(long, env = "AISHOU_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask for a compatibility reading.
    Tell(TellArgs),
    /// Show the latest reading.
    Show,
    /// Show how many readings are left today.
    Usage,
    /// Manage recently used partner names.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Manage your saved details.
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Print the usage guide.
    Manual,
}

#[derive(Subcommand)]
enum HistoryAction {
    List,
    Delete { name: String },
}

#[derive(Subcommand)]
enum ProfileAction {
    Show,
    /// Remember your details for future sessions.
    Fix(ProfileArgs),
    /// Forget saved details.
    Unfix,
}

#[derive(Args)]
struct ProfileArgs {
    #[arg(long)]
    blood: Option<BloodType>,
    #[arg(long)]
    zodiac: Option<Zodiac>,
    #[arg(long)]
    animal: Option<AnimalSign>,
    /// Date of birth as YYYY-MM-DD.
    #[arg(long, value_parser = parse_dob)]
    dob: Option<DobSelector>,
}

#[derive(Args)]
struct TellArgs {
    #[command(flatten)]
    profile: ProfileArgs,

    /// Partner's name.
    #[arg(long, conflicts_with = "recent")]
    partner: Option<String>,

    /// Use the Nth most recent partner name from history (1 = newest).
    #[arg(long)]
    recent: Option<usize>,

    #[arg(long)]
    relationship: Option<Relationship>,

    /// Read tomorrow's fortune instead of today's.
    #[arg(long)]
    tomorrow: bool,

    /// Turn "keep fixed" on or off before the reading.
    #[arg(long)]
    keep_fixed: Option<bool>,
}

fn parse_dob(s: &str) -> Result<DobSelector, DobError> {
    DobSelector::parse(s)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
    tracing::debug!("aishou v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let mut session = open_session(cli.data_dir.clone());

    match cli.command {
        Command::Tell(args) => {
            let api_key = cli
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty())
                .context("GEMINI_API_KEY is not set")?;
            let oracle = GeminiClient::new(api_key, cli.model.clone(), cli.base_url.clone());
            return tell(&mut session, &oracle, args).await;
        }
        Command::Show => match session.displayed() {
            Some(shown) => println!("{}", display::render_result(shown)),
            None => println!("No reading yet. Run `aishou tell` to get one."),
        },
        Command::Usage => println!(
            "{}",
            display::render_usage(session.remaining(), session.quota(), session.today())
        ),
        Command::History { action } => match action {
            HistoryAction::List => println!("{}", display::render_history(session.history())),
            HistoryAction::Delete { name } => {
                if !session.delete_history_name(&name)? {
                    eprintln!("{name:?} is not in the history.");
                    return Ok(ExitCode::FAILURE);
                }
                println!("{}", display::render_history(session.history()));
            }
        },
        Command::Profile { action } => match action {
            ProfileAction::Show => println!(
                "{}",
                display::render_profile(session.form(), session.keep_fixed())
            ),
            ProfileAction::Fix(args) => {
                session.set_keep_fixed(true)?;
                apply_profile(&mut session, args)?;
                println!(
                    "{}",
                    display::render_profile(session.form(), session.keep_fixed())
                );
            }
            ProfileAction::Unfix => {
                session.set_keep_fixed(false)?;
                println!("Saved details removed.");
            }
        },
        Command::Manual => println!("{}", display::MANUAL),
    }
    Ok(ExitCode::SUCCESS)
}

/// Storage problems never stop a command: an unusable data dir degrades to
/// an in-memory session.
fn open_session(data_dir: Option<PathBuf>) -> Session<LocalStore> {
    let dir = data_dir
        .or_else(|| dirs::data_dir().map(|d| d.join("aishou")))
        .unwrap_or_else(|| PathBuf::from(".aishou"));
    let backend = LocalStore::open_or_memory(dir.join(STORAGE_FILE));
    Session::load(
        SessionStore::new(backend),
        UsageLimiter::default(),
        local_today(),
    )
}

fn apply_profile(session: &mut Session<LocalStore>, args: ProfileArgs) -> anyhow::Result<()> {
    session.update_form(|form| {
        if let Some(v) = args.blood {
            form.blood_type = Some(v);
        }
        if let Some(v) = args.zodiac {
            form.zodiac = Some(v);
        }
        if let Some(v) = args.animal {
            form.animal_sign = Some(v);
        }
        if let Some(v) = args.dob {
            form.dob = v;
        }
    })?;
    Ok(())
}

async fn tell(
    session: &mut Session<LocalStore>,
    oracle: &dyn FortuneOracle,
    args: TellArgs,
) -> anyhow::Result<ExitCode> {
    if let Some(keep) = args.keep_fixed {
        session.set_keep_fixed(keep)?;
    }
    if let Some(n) = args.recent {
        let Some(name) = n
            .checked_sub(1)
            .and_then(|i| session.history().names().get(i))
            .cloned()
        else {
            bail!("history has no entry #{n}");
        };
        session.pick_history_name(&name);
    }
    apply_profile(session, args.profile)?;
    session.update_form(|form| {
        if let Some(name) = args.partner {
            form.partner_name = name;
        }
        if args.relationship.is_some() {
            form.relationship = args.relationship;
        }
        form.target = if args.tomorrow {
            DivinationTarget::Tomorrow
        } else {
            DivinationTarget::Today
        };
    })?;

    if !session.can_submit() {
        eprintln!("{}", display::QUOTA_NOTICE);
        return Ok(ExitCode::FAILURE);
    }

    let request = match session.begin_submit() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", session.error().map_or_else(|| e.to_string(), str::to_string));
            warn_unsaved(session);
            return Ok(ExitCode::FAILURE);
        }
    };

    eprintln!("Reading the stars...");
    let call = oracle.tell(&request);
    tokio::pin!(call);
    let mut warned = false;
    let outcome = loop {
        tokio::select! {
            outcome = &mut call => break outcome,
            _ = tokio::signal::ctrl_c() => {
                if warned {
                    session.abandon();
                    eprintln!("Reading abandoned.");
                    return Ok(ExitCode::from(130));
                }
                if let Some(warning) = session.leave_warning() {
                    eprintln!("{warning} Press Ctrl-C again to leave.");
                }
                warned = true;
            }
        }
    };

    match session.finish_submit(&request, outcome) {
        Ok(shown) => {
            println!("{}", display::render_result(shown));
        }
        Err(SubmitError::Store(e)) => return Err(e).context("saving the reading"),
        Err(e) => {
            eprintln!("{e}");
            warn_unsaved(session);
            return Ok(ExitCode::FAILURE);
        }
    }
    println!();
    println!(
        "Remaining today: {}/{}",
        session.remaining(),
        session.quota()
    );
    Ok(ExitCode::SUCCESS)
}

/// A partner name that never got a reading is not kept in history.
fn warn_unsaved(session: &Session<LocalStore>) {
    if let Some(warning) = session.leave_warning() {
        eprintln!("{warning}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn blocked_data_dir_still_gives_a_session() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let mut session = open_session(Some(blocker.join("aishou")));
        assert_eq!(session.remaining(), session.quota());
        assert!(session.displayed().is_none());
        session.set_keep_fixed(true).unwrap();
        assert!(session.delete_history_name("Aoi").is_ok());
    }

    #[test]
    fn cli_parses_manual_and_tell() {
        let cli = Cli::try_parse_from(["aishou", "--data-dir", "/tmp/x", "manual"]).unwrap();
        assert!(matches!(cli.command, Command::Manual));

        let cli = Cli::try_parse_from([
            "aishou", "tell", "--blood", "ab", "--partner", "Aoi", "--relationship", "friend",
            "--tomorrow",
        ])
        .unwrap();
        let Command::Tell(args) = cli.command else {
            panic!("expected tell");
        };
        assert_eq!(args.profile.blood, Some(BloodType::AB));
        assert_eq!(args.partner.as_deref(), Some("Aoi"));
        assert!(args.tomorrow);
    }

    #[test]
    fn partner_and_recent_conflict() {
        let parsed = Cli::try_parse_from(["aishou", "tell", "--partner", "Aoi", "--recent", "1"]);
        assert!(parsed.is_err());
    }
}
