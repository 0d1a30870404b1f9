//! Size-rotated log file usable as a `tracing-subscriber` writer.
//!
//! When the active file would grow past its size limit it is renamed to
//! `<name>.<unix_millis>` and a fresh file is started; only the newest
//! backups are kept.

use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::MakeWriter;

/// Rotate once the active file would exceed 10 MiB.
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Backups retained after rotation.
pub const MAX_BACKUP_FILES: usize = 3;

#[derive(Debug, Default)]
struct Active {
    file: Option<File>,
    len: u64,
}

/// Thread-safe rotating log file.
///
/// The file is opened lazily on the first write, so constructing one never
/// fails. Each `write` call is appended whole; the fmt layer issues one call
/// per event, so events are never split across files.
#[derive(Debug)]
pub struct RollingFile {
    file_path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    active: Mutex<Active>,
}

impl RollingFile {
    /// Creates a writer with the default limits.
    ///
    /// # Parameters
    ///
    /// * `file_path` - Active log file; backups are created next to it
    #[must_use]
    pub fn new(file_path: PathBuf) -> Self {
        Self::with_limits(file_path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    /// Creates a writer with explicit limits.
    ///
    /// # Parameters
    ///
    /// * `file_path` - Active log file; backups are created next to it
    /// * `max_bytes` - Size at which the active file is rotated
    /// * `max_backups` - Number of rotated files kept, newest first
    #[must_use]
    pub fn with_limits(file_path: PathBuf, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            file_path,
            max_bytes,
            max_backups,
            active: Mutex::new(Active::default()),
        }
    }

    /// Path of the active log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn append(&self, buf: &[u8]) -> io::Result<()> {
        let mut active = self.active.lock();
        let incoming = u64::try_from(buf.len()).unwrap_or(u64::MAX);

        if active.file.is_none() {
            self.open(&mut active)?;
        }
        if active.len > 0 && active.len.saturating_add(incoming) > self.max_bytes {
            active.file = None;
            self.rotate()?;
            self.open(&mut active)?;
        }

        let Some(file) = active.file.as_mut() else {
            return Err(io::Error::other("log file unavailable"));
        };
        file.write_all(buf)?;
        active.len = active.len.saturating_add(incoming);
        Ok(())
    }

    fn open(&self, active: &mut Active) -> io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;
        active.len = file.metadata().map(|m| m.len()).unwrap_or(0);
        active.file = Some(file);
        Ok(())
    }

    fn rotate(&self) -> io::Result<()> {
        let Some(name) = self.file_path.file_name().and_then(|n| n.to_str()) else {
            return Err(io::Error::other("invalid log file name"));
        };
        let stamp = chrono::Utc::now().timestamp_millis();
        let backup = self.file_path.with_file_name(format!("{name}.{stamp}"));
        if self.file_path.exists() {
            fs::rename(&self.file_path, backup)?;
        }
        self.prune_backups(name)
    }

    fn prune_backups(&self, name: &str) -> io::Result<()> {
        let Some(parent) = self.file_path.parent() else {
            return Ok(());
        };
        let prefix = format!("{name}.");

        let mut backups: Vec<(i64, PathBuf)> = fs::read_dir(parent)?
            .filter_map(std::result::Result::ok)
            .filter_map(|entry| {
                let file_name = entry.file_name();
                let stamp = file_name.to_str()?.strip_prefix(&prefix)?.parse::<i64>().ok()?;
                Some((stamp, entry.path()))
            })
            .collect();

        backups.sort_unstable_by(|a, b| b.0.cmp(&a.0));
        for (_, old) in backups.iter().skip(self.max_backups) {
            let _ = fs::remove_file(old);
        }
        Ok(())
    }
}

/// Per-event writer handed out by [`RollingFile`].
#[derive(Debug)]
pub struct RollingWriter<'a> {
    target: &'a RollingFile,
}

impl Write for RollingWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.target.append(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(file) = self.target.active.lock().file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for RollingFile {
    type Writer = RollingWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RollingWriter { target: self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backups(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with("test.log."))
            .count()
    }

    #[test]
    fn appends_without_rotation_under_limit() {
        let dir = tempfile::tempdir().unwrap();
        let log = RollingFile::with_limits(dir.path().join("test.log"), 1024, 2);
        let mut writer = log.make_writer();
        writer.write_all(b"one\n").unwrap();
        log.make_writer().write_all(b"two\n").unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents, "one\ntwo\n");
        assert_eq!(backups(dir.path()), 0);
    }

    #[test]
    fn rotates_and_prunes_backups() {
        let dir = tempfile::tempdir().unwrap();
        let log = RollingFile::with_limits(dir.path().join("test.log"), 16, 2);

        for i in 0..10 {
            log.make_writer().write_all(format!("line-{i:04}\n").as_bytes()).unwrap();
            // distinct millisecond stamps
            std::thread::sleep(std::time::Duration::from_millis(2));
        }

        assert!(backups(dir.path()) <= 2);
        let active = fs::read_to_string(log.path()).unwrap();
        assert!(active.len() <= 16);
        assert!(active.ends_with("line-0009\n"));
    }

    #[test]
    fn oversized_record_still_written() {
        let dir = tempfile::tempdir().unwrap();
        let log = RollingFile::with_limits(dir.path().join("test.log"), 4, 1);
        log.make_writer().write_all(b"much longer than four bytes\n").unwrap();
        assert!(fs::read_to_string(log.path()).unwrap().starts_with("much"));
    }
}
