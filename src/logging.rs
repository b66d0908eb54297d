// src/logging.rs

use color_eyre::eyre::Result;
use directories::ProjectDirs;
use lazy_static::lazy_static;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use time::macros::format_description;
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::{self, EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref LOG_ENV: String = format!("{}_LOGLEVEL", PROJECT_NAME.clone());
    pub static ref CONFIG_ENV: String = format!("{}_CONFIG", PROJECT_NAME.clone());
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "horizon-rs", env!("CARGO_PKG_NAME"))
}

pub fn get_data_dir() -> PathBuf {
    if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

pub fn log_file_path() -> PathBuf {
    get_data_dir().join(LOG_FILE.clone())
}

/// Initializes file-based logging using the tracing subscriber.
///
/// The terminal belongs to the TUI, so nothing is written to stdout or stderr.
pub fn initialize_logging() -> Result<()> {
    let directory = get_data_dir();
    std::fs::create_dir_all(&directory)?;
    let log_file = std::fs::File::create(log_file_path())?;

    let file_log_level = std::env::var("RUST_LOG")
        .or_else(|_| std::env::var(LOG_ENV.clone()))
        .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")));

    // "DATE TIME LEVEL MESSAGE": the log panel splits on the first two spaces.
    let timer = LocalTime::new(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"));

    let file_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_timer(timer)
        .with_target(false)
        .with_ansi(false)
        .with_filter(EnvFilter::new(file_log_level));

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}

/// Reads the last `max_lines` lines of the log file.
///
/// A missing or unreadable log yields an empty list; the panel just stays blank.
pub fn read_log_tail(max_lines: usize) -> Vec<String> {
    let Ok(file) = std::fs::File::open(log_file_path()) else {
        return Vec::new();
    };
    tail_lines(BufReader::new(file), max_lines)
}

fn tail_lines(reader: impl BufRead, max_lines: usize) -> Vec<String> {
    let mut lines: Vec<String> = reader.lines().map_while(|l| l.ok()).collect();
    let start = lines.len().saturating_sub(max_lines);
    lines.split_off(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn tail_keeps_only_last_lines() {
        let input = Cursor::new("a\nb\nc\nd\n");
        assert_eq!(tail_lines(input, 2), vec!["c".to_string(), "d".to_string()]);
    }

    #[test]
    fn tail_of_short_input_returns_everything() {
        let input = Cursor::new("only\n");
        assert_eq!(tail_lines(input, 10), vec!["only".to_string()]);
    }

    #[test]
    fn env_names_derive_from_crate_name() {
        assert_eq!(LOG_ENV.as_str(), "HORIZON_RS_SIM_LOGLEVEL");
        assert_eq!(CONFIG_ENV.as_str(), "HORIZON_RS_SIM_CONFIG");
    }
}
