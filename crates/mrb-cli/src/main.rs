use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mrb_core::{render, Step, Verdict};
use mrb_sync::Workspace;

#[derive(Parser)]
#[command(name = "mrbisect", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a timeline between two bounds and sync to the first candidate.
    /// Each bound is a yyyy-mm-ddThh:mm:ss timestamp or a commit hash.
    Start { bound1: String, bound2: String },

    /// Mark the current candidate good and advance
    Good,

    /// Mark the current candidate bad and advance
    Bad,

    /// Print state from the last known-good point onward
    Status,

    /// Print full state including resolved history
    #[command(name = "status_all")]
    StatusAll,

    /// Jump the current candidate to a specific commit hash
    #[command(name = "set_current")]
    SetCurrent { hash: String },
}

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(_) => {
            println!("{}", Cli::command().render_help());
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli.cmd) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run(cmd: Command) -> anyhow::Result<()> {
    let ws = Workspace::open(std::env::current_dir()?)?;

    match cmd {
        Command::Start { bound1, bound2 } => {
            let (start, end) = match (ws.resolve_bound(&bound1), ws.resolve_bound(&bound2)) {
                (Ok(start), Ok(end)) => (start, end),
                _ => {
                    println!("Could not find one of the start/end commit hashes");
                    println!("Try running 'repo sync'");
                    std::process::exit(1);
                }
            };
            let mut session = ws.build_timeline(start, end)?;
            let idx = session.first_pick();
            ws.store.save(&session)?;
            let entry = &session.entries[idx];
            ws.sync_to_instant(entry.timestamp, &entry.hash)?;
            println!("{}", render(&session, true));
        }
        Command::Good => apply_verdict(&ws, Verdict::Good)?,
        Command::Bad => apply_verdict(&ws, Verdict::Bad)?,
        Command::Status => {
            let session = ws.store.load()?;
            println!("{}", render(&session, false));
        }
        Command::StatusAll => {
            let session = ws.store.load()?;
            println!("{}", render(&session, true));
        }
        Command::SetCurrent { hash } => {
            let mut session = ws.store.load()?;
            match session.set_current(&hash) {
                Ok(idx) => {
                    ws.store.save(&session)?;
                    let entry = session.entries[idx].clone();
                    ws.sync_to_instant(entry.timestamp, &entry.hash)?;
                    println!("{}", render(&session, false));
                }
                Err(err) => {
                    println!("Failed: {err}");
                    std::process::exit(1);
                }
            }
        }
    }
    Ok(())
}

fn apply_verdict(ws: &Workspace, verdict: Verdict) -> anyhow::Result<()> {
    let mut session = ws.store.load()?;
    let step = session.advance(verdict)?;
    ws.store.save(&session)?;
    if let Step::Candidate(idx) = step {
        let entry = session.entries[idx].clone();
        ws.sync_to_instant(entry.timestamp, &entry.hash)?;
    }
    println!("{}", render(&session, false));
    Ok(())
}
