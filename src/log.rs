//! Simple file-based logging for skin diagnostics
//!
//! Nothing is written until [`init`] has been called, so library users and
//! tests that never initialise the log pay nothing for it.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use chrono::Local;

static LOG_FILE: Mutex<Option<File>> = Mutex::new(None);

/// Initialize logging to the given file, truncating any previous content
pub fn init(path: &Path) {
    if let Ok(file) = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
    {
        if let Ok(mut guard) = LOG_FILE.lock() {
            *guard = Some(file);
        }
    }

    log("=== Veneer Log Started ===");
}

/// Stop logging and close the file
pub fn shutdown() {
    if let Ok(mut guard) = LOG_FILE.lock() {
        *guard = None;
    }
}

/// Log a message to the file
pub fn log(msg: &str) {
    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(ref mut file) = *guard {
            let ts = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let _ = writeln!(file, "[{}] {}", ts, msg);
            let _ = file.flush();
        }
    }
}

/// Log a formatted message
#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::log::log(&format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_writes_after_init() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("veneer.log");

        init(&path);
        crate::log!("[Skin] loading '{}'", "skin.xml");
        shutdown();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("=== Veneer Log Started ==="));
        assert!(content.contains("[Skin] loading 'skin.xml'"));
    }
}
