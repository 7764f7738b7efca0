use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use termassign::cli::Cli;
use termassign::config::{self, Config};
use termassign::model::Problem;
use termassign::parser;
use termassign::source;
use termassign::state::AppState;
use termassign::tui;

const LOG_FILE: &str = "termassign.log";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let cli = Cli::parse();

    if cli.check {
        init_stderr_logging();
    } else {
        init_file_logging(&config::data_dir())?;
    }

    let mut config = config::load(cli.config.as_deref())?;
    if let Some(ms) = cli.debounce_ms {
        config.blur_debounce_ms = ms;
    }
    let config = config.validated();

    if cli.check {
        let path = cli.file.as_deref().ok_or("--check needs a file")?;
        return check(path);
    }

    run_interactive(&config, cli.file)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("termassign=info"))
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

// The TUI owns the terminal, so interactive sessions log to a file.
fn init_file_logging(dir: &Path) -> Result<(), String> {
    fs::create_dir_all(dir)
        .map_err(|e| format!("Cannot create log directory {}: {}", dir.display(), e))?;
    let path = dir.join(LOG_FILE);
    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| format!("Cannot open log file {}: {}", path.display(), e))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn check(path: &Path) -> Result<(), String> {
    let content = source::read_document(path).map_err(|e| e.to_string())?;
    let problem = parser::parse_problem(&content)
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    print_summary(&problem);
    Ok(())
}

fn print_summary(problem: &Problem) {
    println!("Title: {}", problem.title);
    if !problem.statement.is_empty() {
        println!();
        for line in problem.statement.lines() {
            println!("  {}", line.trim());
        }
    }
    println!();
    println!("Steps: {}", problem.step_count());
    for step in &problem.steps {
        println!("  {}. {}", step.index, step.statement);
    }
}

fn run_interactive(config: &Config, initial: Option<PathBuf>) -> Result<(), String> {
    tracing::info!(
        debounce_ms = config.blur_debounce_ms,
        groups = config.palette.len(),
        "starting"
    );
    let state = AppState::new(config);
    tui::run_tui(state, initial)
}
