//! Session logging. The terminal is owned by the UI, so records go to a file.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "EXTENSIONS_MANAGER_LOG";

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Unable to create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Unable to open log file {}", path.display()))
}

pub fn init(path: &Path) -> Result<()> {
    let file = open_log_file(path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("Unable to install log subscriber: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_log_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn log_directory_under_a_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let err = open_log_file(&blocker.join("session.log")).unwrap_err();
        assert!(err.to_string().contains("Unable to create log directory"));
    }

    #[test]
    fn init_opens_the_file_before_installing_the_subscriber() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("session.log");
        match init(&path) {
            Ok(()) => {}
            Err(err) => assert!(
                err.to_string().contains("Unable to install log subscriber"),
                "unexpected error: {err:#}"
            ),
        }
        assert!(path.exists());
    }
}
