// ABOUTME: tracing subscriber setup for both subcommands.
// ABOUTME: Optional stderr layer for the invoking channel plus a size-rotated log file.

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Size at which the log file is rotated.
pub const DEFAULT_LOG_MAX_BYTES: u64 = 100_000;
/// Rotated files kept next to the active one.
pub const DEFAULT_LOG_BACKUPS: usize = 10;

/// Size-based rotation of the durable log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRotation {
    pub max_bytes: u64,
    /// Number of `<file>.N` backups.
    pub backups: usize,
}

impl Default for LogRotation {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_LOG_MAX_BYTES,
            backups: DEFAULT_LOG_BACKUPS,
        }
    }
}

/// Where log records go and how much detail they carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// 0 = info, 1 = debug, 2+ = trace.
    pub verbosity: u8,
    /// Write records to stderr, the channel that invoked the process.
    pub terminal: bool,
    /// Drop `<` and `>` from terminal records. The svn client renders hook
    /// output as markup.
    pub strip_angles: bool,
    /// Durable local log.
    pub log_file: Option<PathBuf>,
    pub rotation: LogRotation,
}

impl LogSettings {
    /// stderr only, used before the configuration is known.
    pub fn terminal_only(verbosity: u8) -> Self {
        Self {
            verbosity,
            terminal: true,
            strip_angles: false,
            log_file: None,
            rotation: LogRotation::default(),
        }
    }
}

pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Wraps a [`MakeWriter`] so every writer it hands out drops angle brackets.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripAngles<M>(pub M);

impl<'a, M: MakeWriter<'a>> MakeWriter<'a> for StripAngles<M> {
    type Writer = AngleFreeWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        AngleFreeWriter(self.0.make_writer())
    }
}

/// Writer that removes `<` and `>` before forwarding.
#[derive(Debug)]
pub struct AngleFreeWriter<W>(pub W);

impl<W: Write> Write for AngleFreeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let kept: Vec<u8> = buf
            .iter()
            .copied()
            .filter(|b| !matches!(b, b'<' | b'>'))
            .collect();
        self.0.write_all(&kept)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

/// Rotating log file shared by all events.
///
/// Each writer flushes when dropped, so a record is on disk once its event
/// has been formatted.
pub struct RollingLog(Mutex<BasicRollingFileAppender>);

impl RollingLog {
    pub fn open(path: &Path, rotation: LogRotation) -> io::Result<Self> {
        let condition = RollingConditionBasic::new().max_size(rotation.max_bytes);
        BasicRollingFileAppender::new(path, condition, rotation.backups)
            .map(|appender| Self(Mutex::new(appender)))
    }
}

impl<'a> MakeWriter<'a> for RollingLog {
    type Writer = RollingLogWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RollingLogWriter(self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

pub struct RollingLogWriter<'a>(MutexGuard<'a, BasicRollingFileAppender>);

impl Write for RollingLogWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl Drop for RollingLogWriter<'_> {
    fn drop(&mut self) {
        let _ = self.0.flush();
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(settings: &LogSettings) {
    let filter = EnvFilter::new(level_for(settings.verbosity));

    let terminal = settings.terminal.then(|| {
        let writer = if settings.strip_angles {
            BoxMakeWriter::new(StripAngles(io::stderr))
        } else {
            BoxMakeWriter::new(io::stderr)
        };
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_target(false)
            .without_time()
    });

    let file = settings.log_file.as_ref().and_then(|path| {
        match RollingLog::open(path, settings.rotation) {
            Ok(log) => Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(log)
                    .with_ansi(false)
                    .with_target(false),
            ),
            Err(e) => {
                eprintln!("Warning: cannot open log file {}: {}", path.display(), e);
                None
            }
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(terminal)
        .with(file)
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// In-memory sink usable as a `MakeWriter`.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_for(0), "info");
        assert_eq!(level_for(1), "debug");
        assert_eq!(level_for(2), "trace");
        assert_eq!(level_for(9), "trace");
    }

    #[test]
    fn angle_free_writer_drops_brackets_only() {
        let mut writer = AngleFreeWriter(Vec::new());
        let line = b"svn log failed: <?xml version=\"1.0\"?><log>\n";

        assert_eq!(writer.write(line).unwrap(), line.len());
        assert_eq!(writer.0, b"svn log failed: ?xml version=\"1.0\"?log\n");
    }

    #[test]
    fn stripped_layer_removes_markup_from_events() {
        let sink = Captured::default();
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .with_writer(StripAngles(sink.clone()))
                .with_ansi(false)
                .without_time(),
        );

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!("build failed: <target name=\"deploy\"/>");
        });

        let output = sink.contents();
        assert!(output.contains("build failed: target name=\"deploy\"/"));
        assert!(!output.contains('<') && !output.contains('>'));
    }

    #[test]
    fn rolling_log_rotates_by_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("post-commit.log");
        let log = RollingLog::open(
            &path,
            LogRotation {
                max_bytes: 10,
                backups: 2,
            },
        )
        .unwrap();

        for line in ["first record\n", "second record\n", "third record\n", "fourth record\n"] {
            log.make_writer().write_all(line.as_bytes()).unwrap();
        }

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fourth record\n");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("post-commit.log.1")).unwrap(),
            "third record\n"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("post-commit.log.2")).unwrap(),
            "second record\n"
        );
        assert!(!dir.path().join("post-commit.log.3").exists());
    }
}
