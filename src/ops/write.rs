//! The interactive writing session.
//!
//! Each line read from stdin is typed into the active entry. Lines starting
//! with `:` are commands; `::` escapes a literal leading colon. While the
//! journal is locked every line is taken as an unlock attempt. A one-second
//! tick drives idle markers and midnight rollover.

use super::open_journal;
use crate::config::Config;
use crate::constants;
use crate::day::{format_countdown, time_until_midnight};
use crate::errors::AppResult;
use crate::journal_core::{display_marker, format_date_label, DateSpecifier};
use crate::session::{Edit, Journal, SessionEvent};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

const LOCK_KEY: &str = "\x1b";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Runs a writing session on the entry for `date` until stdin closes or
/// `:quit` is entered.
pub fn run_session(config: &Config, date: &DateSpecifier) -> AppResult<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(session_loop(config, date));
    // A pending stdin read holds a blocking thread that would stall shutdown.
    runtime.shutdown_background();
    result
}

async fn session_loop(config: &Config, date: &DateSpecifier) -> AppResult<()> {
    let (_lock, mut journal) = open_journal(config)?;
    let mut out = std::io::stdout();

    let today = journal.now().date_naive();
    let key = date.resolve_key(today);
    if key != journal.active_date() {
        journal.select_date(&key)?;
    }
    journal.focus();
    write_banner(&journal, &mut out)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_millis(constants::TICK_INTERVAL_MS));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if handle_line(&mut journal, &line, &mut out)? == Flow::Quit {
                            break;
                        }
                    }
                    None => {
                        debug!("stdin closed");
                        break;
                    }
                }
            }
            _ = ticker.tick() => {
                let events = journal.tick()?;
                report_events(&events, &mut out)?;
            }
        }
    }

    info!("Writing session ended with {} keystrokes recorded", journal.total_keystrokes());
    Ok(())
}

fn write_banner(journal: &Journal, out: &mut impl Write) -> AppResult<()> {
    let today = journal.now().date_naive();
    writeln!(
        out,
        "writing in {} (:help for commands)",
        format_date_label(journal.active_date(), today)
    )?;
    let text = journal.document().to_display_text();
    if !text.is_empty() {
        writeln!(out, "{}", text)?;
    }
    out.flush()?;
    Ok(())
}

/// Handles one line of input.
pub fn handle_line(journal: &mut Journal, line: &str, out: &mut impl Write) -> AppResult<Flow> {
    if journal.is_locked() {
        if line.trim() == ":quit" {
            return Ok(Flow::Quit);
        }
        if journal.unlock(line)? {
            journal.focus();
            writeln!(out, "unlocked")?;
            write_banner(journal, out)?;
        } else {
            writeln!(out, "incorrect password")?;
        }
        return Ok(Flow::Continue);
    }

    if line == LOCK_KEY {
        lock(journal, out)?;
        return Ok(Flow::Continue);
    }

    let Some(command) = line.strip_prefix(':').filter(|rest| !rest.starts_with(':')) else {
        let text = line.strip_prefix(':').unwrap_or(line);
        let events = journal.edit(&Edit::Line(text.to_string()))?;
        report_events(&events, out)?;
        return Ok(Flow::Continue);
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "quit" | "q" => return Ok(Flow::Quit),
        "lock" => lock(journal, out)?,
        "del" => {
            let events = journal.edit(&Edit::DeleteLine)?;
            report_events(&events, out)?;
        }
        "date" => match DateSpecifier::parse(arg) {
            Ok(spec) => {
                let key = spec.resolve_key(journal.now().date_naive());
                journal.select_date(&key)?;
                write_banner(journal, out)?;
            }
            Err(e) => {
                warn!("Rejected date '{}': {}", arg, e);
                writeln!(out, "unrecognized date '{}', use YYYY-MM-DD", arg)?;
            }
        },
        "today" => {
            let today = journal.today();
            journal.select_date(&today)?;
            write_banner(journal, out)?;
        }
        "show" => writeln!(out, "{}", journal.document().to_display_text())?,
        "status" => {
            let now = journal.now();
            writeln!(
                out,
                "{} | {} | next day in {}",
                format_date_label(journal.active_date(), now.date_naive()),
                journal.status_line(),
                format_countdown(time_until_midnight(&now))
            )?;
        }
        "help" => write_help(out)?,
        other => writeln!(out, "unknown command ':{}' (:help for commands)", other)?,
    }
    out.flush()?;
    Ok(Flow::Continue)
}

fn lock(journal: &mut Journal, out: &mut impl Write) -> AppResult<()> {
    journal.lock()?;
    writeln!(out, "locked. enter password to unlock")?;
    out.flush()?;
    Ok(())
}

fn write_help(out: &mut impl Write) -> AppResult<()> {
    writeln!(out, "  any line     append it to the entry")?;
    writeln!(out, "  ::text       append a line starting with ':'")?;
    writeln!(out, "  :del         delete the last line")?;
    writeln!(out, "  :date DATE   switch to another day (today, yesterday, YYYY-MM-DD)")?;
    writeln!(out, "  :today       switch back to today")?;
    writeln!(out, "  :show        print the entry")?;
    writeln!(out, "  :status      word count and time until midnight")?;
    writeln!(out, "  :lock, ESC   lock the journal")?;
    writeln!(out, "  :quit        end the session")?;
    Ok(())
}

fn report_events(events: &[SessionEvent], out: &mut impl Write) -> AppResult<()> {
    for event in events {
        match event {
            SessionEvent::MarkerInserted { label, .. } => writeln!(out, "{}", display_marker(label))?,
            SessionEvent::DayChanged(change) => writeln!(out, "a new day: now writing in {}", change.to)?,
            SessionEvent::EntryPruned(date) => writeln!(out, "removed empty entry for {}", date)?,
        }
    }
    if !events.is_empty() {
        out.flush()?;
    }
    Ok(())
}
