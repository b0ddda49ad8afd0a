//! Tracing setup. The terminal belongs to the UI, so events go to
//! `<data_dir>/parsons/parsons.log`. `PARSONS_LOG` sets the filter
//! (e.g. "debug" or "parsons=trace").

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub fn log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("parsons")
        .join("parsons.log")
}

/// Open (creating parent directories) the append-only log file.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. Logging is best effort: failures are
/// reported on stderr, before the TUI takes the terminal, and the app runs
/// without a log.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("PARSONS_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let path = log_path();
    let file = match open_log_file(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("parsons: logging disabled, cannot open {}: {err}", path.display());
            return;
        }
    };

    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
    {
        eprintln!("parsons: logging disabled: {err}");
    }
}
