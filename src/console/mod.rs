use std::sync::atomic::{AtomicU8, Ordering};

use colored::Colorize;

static VERBOSITY: AtomicU8 = AtomicU8::new(0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
    Debug,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Info => "INF",
            Level::Warn => "WRN",
            Level::Error => "ERR",
            Level::Debug => "DBG",
        }
    }
}

pub fn set_verbosity(level: u8) {
    VERBOSITY.store(level, Ordering::Relaxed);
}

pub fn verbosity() -> u8 {
    VERBOSITY.load(Ordering::Relaxed)
}

pub fn disable_colors() {
    colored::control::set_override(false);
}

// [INF] message
pub fn format_line(level: Level, message: &str) -> String {
    let tag = match level {
        Level::Info => level.tag().bold().blue(),
        Level::Warn => level.tag().bold().yellow(),
        Level::Error => level.tag().bold().red(),
        Level::Debug => level.tag().bold().magenta(),
    };
    format!("{}{}{} {}", "[".bold().white(), tag, "]".bold().white(), message)
}

pub fn info(message: &str) {
    eprintln!("{}", format_line(Level::Info, message));
}

pub fn warn(message: &str) {
    eprintln!("{}", format_line(Level::Warn, message));
}

pub fn error(message: &str) {
    eprintln!("{}", format_line(Level::Error, message));
}

pub fn debug(message: &str) {
    if verbosity() > 0 {
        eprintln!("{}", format_line(Level::Debug, message));
    }
}

/// Message plus every `source()` below it, joined with `: `.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

pub fn format_kv_line(label: &str, value: &str) -> String {
    format!(":: {:<10}: {}", label, value)
}
