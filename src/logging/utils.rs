//! Utility functions for file names, source paths and time formatting.
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Strip directory components from a source path, for either separator.
pub(super) fn split_file_name(path: &str) -> &str {
    path.rfind(['/', '\\', '('])
        .and_then(|pos| path.get(pos + 1..))
        .unwrap_or(path)
}

/// Build `<prefix>.activelog.<YYYYMMDD>-<hhmmss>.log` in `directory`.
pub(super) fn log_file_name(directory: &Path, prefix: &str) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    directory.join(format!("{prefix}.activelog.{stamp}.log"))
}

/// Format the line timestamp: local `YYYY/MM/DD hh:mm:ss` plus the elapsed
/// microseconds since the log was opened.
pub(super) fn format_line_time(elapsed: Duration) -> String {
    format!(
        "{}.{}",
        chrono::Local::now().format("%Y/%m/%d %H:%M:%S"),
        elapsed.as_micros()
    )
}

/// Format the current local time like C's `ctime`, newline included.
pub(super) fn format_ctime() -> String {
    chrono::Local::now()
        .format("%a %b %e %H:%M:%S %Y\n")
        .to_string()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn split_file_name_strips_directories() {
        assert_eq!(split_file_name("src/logging/message.rs"), "message.rs");
        assert_eq!(split_file_name(r"C:\work\main.rs"), "main.rs");
        assert_eq!(split_file_name("main.rs"), "main.rs");
    }

    #[test]
    fn log_file_name_has_prefix_and_suffix() {
        let path = log_file_name(Path::new("/tmp/logs"), "app");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("app.activelog."));
        assert!(name.ends_with(".log"));
        // app.activelog.YYYYMMDD-hhmmss.log
        assert_eq!(name.len(), "app.activelog.".len() + 15 + ".log".len());
        assert!(path.starts_with("/tmp/logs"));
    }

    #[test]
    fn format_line_time_has_correct_format() {
        let s = format_line_time(Duration::from_micros(1234));
        assert_eq!(&s[4..5], "/", "slash at position 4");
        assert_eq!(&s[7..8], "/", "slash at position 7");
        assert_eq!(&s[10..11], " ", "space at position 10");
        assert!(s.ends_with(".1234"), "elapsed micros suffix: {s}");
    }

    #[test]
    fn format_ctime_ends_with_newline() {
        let s = format_ctime();
        assert!(s.ends_with('\n'));
        assert_eq!(s.len(), 25, "ctime format is 24 chars plus newline");
    }
}
