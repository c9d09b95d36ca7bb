/*!
# Daybook

Entry point: parses arguments, loads configuration, sets up logging, and
dispatches to the subcommand's operation.

## Usage

```text
daybook [OPTIONS] [COMMAND]

Commands:
  write      Open a writing session (the default)
  list       List entries, newest first
  show       Print one entry as plain text
  export     Write every entry to a plain-text file
  copy       Copy every entry to the clipboard
  threshold  Show or set the idle time, in minutes, before a time marker is added
  passwd     Change the lock password
  stats      Show writing statistics
  theme      Show or change the color theme

Options:
  -v, --verbose                  Enable debug logging
      --log-format <LOG_FORMAT>  Log output format [possible values: text, json]
```

## Configuration

- `DAYBOOK_DIR`: where entries and settings are stored (defaults to `~/.daybook`)
- `DAYBOOK_LOG_FORMAT`: `text` or `json`
- `RUST_LOG`: overrides the log filter
*/

use chrono::Local;
use clap::Parser;
use daybook::cli::{parse_date_arg, CliArgs, Commands};
use daybook::config::Config;
use daybook::constants;
use daybook::errors::{AppError, AppResult};
use daybook::ops;
use daybook::ops::settings::PasswordSource;
use std::io::Write;
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

fn init_logging(format: &str, verbose: bool) {
    let default_level = if verbose { "debug" } else { constants::DEFAULT_LOG_LEVEL };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", constants::TRACING_SERVICE_NAME, default_level)));

    if format == constants::LOG_FORMAT_JSON {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
}

fn main() {
    let args = CliArgs::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> AppResult<()> {
    let config = Config::load_with_log_format(args.log_format.clone())?;
    init_logging(&config.log_format, args.verbose);

    let span = info_span!(
        constants::TRACING_ROOT_SPAN_NAME,
        service_name = constants::TRACING_SERVICE_NAME
    );
    let _guard = span.enter();

    debug!("CLI arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    let now = Local::now();
    let today = now.date_naive();
    let mut stdout = std::io::stdout();

    match args.command() {
        Commands::Write { date } => {
            let spec = parse_date_arg(date.as_deref())
                .map_err(|e| AppError::Journal(format!("Invalid date format: {}", e)))?;
            info!("Starting writing session");
            ops::run_session(&config, &spec)?;
        }
        Commands::List => ops::list_entries(&config, today, &mut stdout)?,
        Commands::Show { date } => {
            let spec = parse_date_arg(date.as_deref())
                .map_err(|e| AppError::Journal(format!("Invalid date format: {}", e)))?;
            ops::show_entry(&config, &spec, today, &mut stdout)?;
        }
        Commands::Export { output } => match ops::export_entries(&config, output.as_deref(), &now)? {
            Some(path) => writeln!(stdout, "exported to {}", path.display())?,
            None => writeln!(stdout, "nothing to export")?,
        },
        Commands::Copy => {
            if ops::copy_entries(&config, &now, &mut stdout)? {
                writeln!(stdout, "copied to clipboard")?;
            } else {
                writeln!(stdout, "nothing copied")?;
            }
        }
        Commands::Threshold { minutes } => ops::show_or_set_threshold(&config, minutes, &mut stdout)?,
        Commands::Passwd { stdin } => {
            let input = std::io::stdin();
            let mut reader = input.lock();
            let source = if stdin {
                PasswordSource::Lines(&mut reader)
            } else {
                PasswordSource::Terminal
            };
            if !ops::change_password(&config, source, &mut stdout)? {
                return Err(AppError::Journal("Password was not changed".to_string()));
            }
        }
        Commands::Stats => ops::show_stats(&config, &mut stdout)?,
        Commands::Theme { action } => ops::theme(&config, action, &mut stdout)?,
    }

    Ok(())
}
