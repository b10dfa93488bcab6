//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "edu";
const ORGANIZATION: &str = "campus";
const APPLICATION: &str = "campus";

/// Name of the log file written by the running process.
const LATEST_LOG: &str = "latest.log";

/// Maximum number of old log files to keep.
const MAX_OLD_LOGS: usize = 25;

/// Get project directories, or None if home directory cannot be determined.
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the data directory for persistent application data.
///
/// - Linux: `$XDG_DATA_HOME/campus` or `~/.local/share/campus`
/// - macOS: `~/Library/Application Support/edu.campus.campus`
/// - Windows: `C:\Users\<User>\AppData\Roaming\campus\campus\data`
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Get the cache directory for temporary/regenerable data.
///
/// - Linux: `$XDG_CACHE_HOME/campus` or `~/.cache/campus`
/// - macOS: `~/Library/Caches/edu.campus.campus`
/// - Windows: `C:\Users\<User>\AppData\Local\campus\campus\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the path to the settings database, creating its directory.
pub fn settings_db() -> Option<PathBuf> {
    let dir = data_dir()?;
    fs::create_dir_all(&dir).ok()?;
    Some(dir.join("settings.db"))
}

/// Get the path to the latest log file, creating its directory.
pub fn log_file() -> Option<PathBuf> {
    let dir = cache_dir()?;
    fs::create_dir_all(&dir).ok()?;
    Some(dir.join(LATEST_LOG))
}

/// Rotate logs: rename latest.log to timestamped name, clean up old logs.
///
/// Call this at startup before creating the new log file.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    rotate_logs_in(&cache, chrono::Local::now().naive_local());
}

fn rotate_logs_in(cache: &Path, now: chrono::NaiveDateTime) {
    let latest = cache.join(LATEST_LOG);

    if latest.exists() {
        let archived = cache.join(format!("{}.log", now.format("%Y%m%d_%H%M%S")));
        let _ = fs::rename(&latest, &archived);
    }

    cleanup_old_logs(cache);
}

/// Remove old log files, keeping only the most recent MAX_OLD_LOGS.
fn cleanup_old_logs(cache: &Path) {
    let Ok(entries) = fs::read_dir(cache) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != LATEST_LOG
        })
        .collect();

    // Oldest first; archive names sort by timestamp
    logs.sort_by_key(|e| e.file_name());

    if logs.len() > MAX_OLD_LOGS {
        for entry in logs.iter().take(logs.len() - MAX_OLD_LOGS) {
            let _ = fs::remove_file(entry.path());
        }
    }
}
