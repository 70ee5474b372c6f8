//! Match log sink shared by all workers

use crate::core::sync::handle_mutex_poison;
use crate::scanner::error::{ScanError, ScannerResult};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Serialises `path;digest;verdict` lines into one sink
///
/// Each record is formatted in full and written with a single `write_all`
/// under a dedicated lock, so lines from concurrent workers never
/// interleave. The lock is separate from the worker pool's queue lock.
pub struct MatchLogger {
    sink: Mutex<Box<dyn Write + Send>>,
    destination: Option<PathBuf>,
}

impl MatchLogger {
    /// Open (create) the match log file
    ///
    /// The file is truncated unless `append` is set.
    pub fn open(path: &Path, append: bool) -> ScannerResult<Self> {
        let mut options = OpenOptions::new();
        options.create(true);
        if append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }

        let file = options.open(path).map_err(|source| ScanError::LogSink {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!(
            "Match log opened at {} ({})",
            path.display(),
            if append { "append" } else { "truncate" }
        );

        Ok(Self {
            sink: Mutex::new(Box::new(BufWriter::new(file))),
            destination: Some(path.to_path_buf()),
        })
    }

    /// Log matches into an arbitrary writer
    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            sink: Mutex::new(Box::new(writer)),
            destination: None,
        }
    }

    /// File the log is written to, if it is file backed
    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    /// Append one match line
    pub fn record(&self, path: &Path, digest: &str, verdict: &str) -> ScannerResult<()> {
        let line = format_match_line(path, digest, verdict);
        let mut sink = handle_mutex_poison(self.sink.lock(), |message| ScanError::LogWrite {
            message,
        })?;
        sink.write_all(&line)
            .map_err(|e| ScanError::LogWrite {
                message: e.to_string(),
            })
    }

    /// Flush buffered lines to the sink
    pub fn flush(&self) -> ScannerResult<()> {
        let mut sink = handle_mutex_poison(self.sink.lock(), |message| ScanError::LogWrite {
            message,
        })?;
        sink.flush().map_err(|e| ScanError::LogWrite {
            message: e.to_string(),
        })
    }
}

impl std::fmt::Debug for MatchLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchLogger")
            .field("destination", &self.destination)
            .finish()
    }
}

/// `<path>;<digest>;<verdict>\n`
///
/// On Unix the path bytes are written as they are, so names that are not
/// valid UTF-8 still match the file on disk. Elsewhere the path is converted
/// lossily.
pub fn format_match_line(path: &Path, digest: &str, verdict: &str) -> Vec<u8> {
    let path_bytes = path_bytes(path);
    let mut line = Vec::with_capacity(path_bytes.len() + digest.len() + verdict.len() + 3);
    line.extend_from_slice(&path_bytes);
    line.push(b';');
    line.extend_from_slice(digest.as_bytes());
    line.push(b';');
    line.extend_from_slice(verdict.as_bytes());
    line.push(b'\n');
    line
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> std::borrow::Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    std::borrow::Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> std::borrow::Cow<'_, [u8]> {
    std::borrow::Cow::Owned(path.to_string_lossy().into_owned().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        // Deliberately writes one byte at a time to expose interleaving
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            match buf.first() {
                Some(byte) => {
                    self.0.lock().unwrap().push(*byte);
                    thread::yield_now();
                    Ok(1)
                }
                None => Ok(0),
            }
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_format_match_line() {
        assert_eq!(
            format_match_line(Path::new("/scan/a.exe"), "abc", "Trojan.Test"),
            b"/scan/a.exe;abc;Trojan.Test\n".to_vec()
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_is_logged_verbatim() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"/scan/\xffbad.bin"));
        assert_eq!(
            format_match_line(path, "abc", "Worm.Raw"),
            b"/scan/\xffbad.bin;abc;Worm.Raw\n".to_vec()
        );

        let buffer = SharedBuffer::default();
        let logger = MatchLogger::from_writer(buffer.clone());
        logger.record(path, "abc", "Worm.Raw").unwrap();
        assert_eq!(
            buffer.0.lock().unwrap().as_slice(),
            b"/scan/\xffbad.bin;abc;Worm.Raw\n"
        );
    }

    #[test]
    fn test_concurrent_records_never_interleave() {
        let buffer = SharedBuffer::default();
        let logger = Arc::new(MatchLogger::from_writer(buffer.clone()));

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let logger = Arc::clone(&logger);
                thread::spawn(move || {
                    for item in 0..25 {
                        let path = PathBuf::from(format!("/scan/w{}/file{}.bin", worker, item));
                        logger
                            .record(&path, "0123456789abcdef", &format!("Verdict.{}", worker))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let content = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 200);
        for line in lines {
            let fields: Vec<&str> = line.split(';').collect();
            assert_eq!(fields.len(), 3, "corrupted line: {}", line);
            let worker = fields[0]
                .strip_prefix("/scan/w")
                .and_then(|rest| rest.split('/').next())
                .expect("path prefix intact");
            assert_eq!(fields[1], "0123456789abcdef");
            assert_eq!(fields[2], format!("Verdict.{}", worker));
        }
    }

    #[test]
    fn test_write_failure_is_reported() {
        let logger = MatchLogger::from_writer(FailingWriter);

        let result = logger.record(Path::new("/x"), "abc", "v");
        assert!(matches!(result, Err(ScanError::LogWrite { .. })));
    }

    #[test]
    fn test_open_truncates_by_default_and_appends_on_request() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matches.log");
        std::fs::write(&path, "stale;line;here\n").unwrap();

        let logger = MatchLogger::open(&path, false).unwrap();
        logger.record(Path::new("/a"), "1", "first").unwrap();
        logger.flush().unwrap();
        drop(logger);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "/a;1;first\n");

        let logger = MatchLogger::open(&path, true).unwrap();
        assert_eq!(logger.destination(), Some(path.as_path()));
        logger.record(Path::new("/b"), "2", "second").unwrap();
        logger.flush().unwrap();
        drop(logger);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "/a;1;first\n/b;2;second\n"
        );
    }

    #[test]
    fn test_open_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/matches.log");

        let result = MatchLogger::open(&path, false);
        assert!(matches!(result, Err(ScanError::LogSink { .. })));
    }
}
