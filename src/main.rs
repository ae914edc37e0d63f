use anyhow::{Context, Result};
use clap::Parser;
use splitcalc::calculator::{CalculatorDisplay, CommitPayload, KEYPAD, KEYPAD_COLUMNS, Session};
use splitcalc::config::CalculatorConfig;
use splitcalc::form::{ExpenseForm, FormBinding, format_currency};
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Enter an expense amount with the calculator and commit it to a form field.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Config file (defaults to ~/.config/splitcalc/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Starting value when no form is given
    #[arg(long, default_value = "")]
    seed: String,

    /// Target field, e.g. reimbursable.me.meal.0.amount
    #[arg(long, default_value = "amount")]
    path: String,

    /// JSON expense file to read the seed from and write the result to
    #[arg(long)]
    form: Option<PathBuf>,

    /// Whitespace-separated keys to press, then confirm (e.g. "1 2 + 3 =")
    #[arg(long)]
    keys: Option<String>,
}

enum Outcome {
    Confirmed(CommitPayload),
    Cancelled,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => CalculatorConfig::from_file(path)?,
        None => CalculatorConfig::load()?,
    };

    let mut form = match &args.form {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            Some(ExpenseForm::from_reader(file)?)
        }
        None => None,
    };

    let seed = match &form {
        Some(form) => form.seed_for(&args.path),
        None => args.seed.clone(),
    };

    let mut session = Session::open(&seed, &args.path, config);

    let outcome = match &args.keys {
        Some(keys) => run_scripted(&mut session, keys)?,
        None => run_interactive(&mut session)?,
    };

    match outcome {
        Outcome::Cancelled => {
            session.cancel();
            eprintln!("Cancelled");
            Ok(())
        }
        Outcome::Confirmed(payload) => commit(&payload, &args, form.as_mut()),
    }
}

fn run_scripted(session: &mut Session, keys: &str) -> Result<Outcome> {
    for key in keys.split_whitespace() {
        session.handle_input(key);
    }
    finish(session)
}

fn run_interactive(session: &mut Session) -> Result<Outcome> {
    print_keypad();
    print_display(session);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read input")?;
        for word in line.split_whitespace() {
            match word {
                "ok" => match session.confirm() {
                    Ok(payload) => return Ok(Outcome::Confirmed(payload)),
                    Err(error) => tracing::debug!(%error, "Confirm rejected"),
                },
                "cancel" | "q" => return Ok(Outcome::Cancelled),
                key => session.handle_input(key),
            }
        }
        print_display(session);
    }

    // End of input confirms, like closing the dialog with OK
    finish(session)
}

fn finish(session: &mut Session) -> Result<Outcome> {
    match session.confirm() {
        Ok(payload) => Ok(Outcome::Confirmed(payload)),
        Err(error) => anyhow::bail!("Cannot confirm '{}': {}", session.buffer(), error),
    }
}

fn commit(payload: &CommitPayload, args: &Args, form: Option<&mut ExpenseForm>) -> Result<()> {
    if let (Some(form), Some(path)) = (form, &args.form) {
        form.apply(payload)?;
        let file =
            File::create(path).with_context(|| format!("Failed to write {}", path.display()))?;
        form.to_writer(BufWriter::new(file))?;
        eprintln!(
            "{} = {}",
            payload.path,
            format_currency(&payload.value.to_string())
        );
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer(&mut out, payload)?;
    writeln!(out)?;
    Ok(())
}

fn print_keypad() {
    for row in KEYPAD.chunks(KEYPAD_COLUMNS) {
        let labels: Vec<String> = row.iter().map(|key| format!("{:>3}", key.label())).collect();
        eprintln!("{}", labels.join(" "));
    }
    eprintln!("Type keys separated by spaces, 'ok' to confirm, 'cancel' to quit.");
}

fn print_display(session: &Session) {
    let display = CalculatorDisplay::from_session(session);
    eprintln!("[{}]", display.display_line());
    if let Some(hint) = display.hint_line() {
        eprintln!("  {hint}");
    }
}
