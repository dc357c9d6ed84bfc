use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tapcalc::calculator::{self, Action, CalculatorState, Display, StateSnapshot};
use tapcalc::config::Config;
use tapcalc::keys;
use tapcalc::session::{Session, SessionHandle};

#[derive(Parser)]
#[command(name = "tapcalc", version, about = "Key-driven calculator with a live result preview")]
struct Cli {
    /// Config file to use instead of the one in the user config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log state transitions to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print the final calculator state as JSON.
    #[arg(long, global = true)]
    state_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Read keys and commands from stdin, one line at a time (default).
    Repl,
    /// Replay a key sequence such as `12+7=` and print the final display.
    Keys { keys: String },
    /// Evaluate a single expression.
    Eval { expression: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load(path),
        None => Config::load_default(),
    }
    .context("failed to load configuration")?;

    match cli.command.unwrap_or(Command::Repl) {
        Command::Repl => repl(&config, cli.state_json),
        Command::Keys { keys } => replay(&config, &keys, cli.state_json),
        Command::Eval { expression } => eval(&config, &expression),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_display(out: &mut impl Write, display: &Display) -> io::Result<()> {
    writeln!(out, "{}", display.expression_text)?;
    writeln!(out, "= {}", display.result_text)
}

fn print_state(out: &mut impl Write, snapshot: &StateSnapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot).context("failed to serialize state")?;
    writeln!(out, "{json}")?;
    Ok(())
}

fn eval(config: &Config, expression: &str) -> Result<()> {
    let value = calculator::evaluate(expression)
        .with_context(|| format!("cannot evaluate {expression:?}"))?;
    println!("{}", config.display_options().format.format_display(value));
    Ok(())
}

fn replay(config: &Config, keys: &str, state_json: bool) -> Result<()> {
    let mut state = CalculatorState::with_options(config.display_options());
    let mut display = state.display();
    for action in keys::actions_for_keys(keys) {
        display = state.apply(action);
    }

    let mut out = io::stdout().lock();
    print_display(&mut out, &display)?;
    if state_json {
        print_state(&mut out, &state.snapshot())?;
    }
    Ok(())
}

fn repl(config: &Config, state_json: bool) -> Result<()> {
    let session = Session::spawn(config).context("failed to start calculator session")?;
    let stdin = io::stdin();
    let mut out = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }

        if let Some(expr) = line.strip_prefix("set ") {
            print_display(&mut out, &session.set_expr(expr.trim())?)?;
            continue;
        }

        let mut display = None;
        for word in line.split_whitespace() {
            match word {
                "copy" => copy_result(config, &session)?,
                "state" => print_state(&mut out, &session.snapshot()?)?,
                "hold" => display = Some(hold_clear(config, &session)?),
                _ => match word.parse::<Action>() {
                    Ok(action) => display = Some(session.apply(action)?),
                    Err(_) => {
                        for action in keys::actions_for_keys(word) {
                            display = Some(session.apply(action)?);
                        }
                    }
                },
            }
        }

        if let Some(display) = display {
            print_display(&mut out, &display)?;
        }
    }

    if state_json {
        print_state(&mut out, &session.snapshot()?)?;
    }
    session.shutdown();
    Ok(())
}

/// Press `clear`, keep it held past the long-press delay, then release.
fn hold_clear(config: &Config, session: &SessionHandle) -> Result<Display> {
    session.press_clear()?;
    thread::sleep(config.long_press() + Duration::from_millis(50));
    let fired = session.updates().recv_timeout(Duration::from_secs(1)).ok();
    let released = session.release_clear()?;
    Ok(fired.unwrap_or(released))
}

fn copy_result(config: &Config, session: &SessionHandle) -> Result<()> {
    let Some(value) = session.snapshot()?.last_result else {
        tracing::warn!("nothing to copy: no committed result");
        return Ok(());
    };

    let text = config.display_options().format.format(Some(value));
    if let Err(err) = calculator::copy_to_clipboard(&text) {
        tracing::warn!(error = %err, "clipboard copy failed");
    }
    Ok(())
}
