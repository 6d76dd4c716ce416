//! Rolling file logger with a circular buffer of recent lines.
//!
//! One file per day (`{app}-YYYY-MM-DD.log`), the newest [`MAX_LOG_FILES`]
//! kept. `log` records are bridged into the same `tracing` subscriber, so
//! either facade ends up in the file.

use chrono::{Local, NaiveDate};
use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tracing_subscriber::fmt::MakeWriter;

pub const MAX_LOG_FILES: usize = 7;
pub const BUFFER_LINES: usize = 500;

static WRITER: OnceLock<RollingWriter> = OnceLock::new();

struct Inner {
    dir: PathBuf,
    app_name: String,
    date: Option<NaiveDate>,
    file: Option<File>,
    recent: VecDeque<String>,
    capacity: usize,
    pending: Vec<u8>,
}

/// Writer handed to the fmt layer; clones share one file and buffer
#[derive(Clone)]
pub struct RollingWriter {
    inner: Arc<Mutex<Inner>>,
}

impl RollingWriter {
    pub fn new(dir: impl Into<PathBuf>, app_name: &str) -> io::Result<Self> {
        Self::with_capacity(dir, app_name, BUFFER_LINES)
    }

    pub fn with_capacity(dir: impl Into<PathBuf>, app_name: &str, capacity: usize) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                dir,
                app_name: app_name.to_string(),
                date: None,
                file: None,
                recent: VecDeque::with_capacity(capacity),
                capacity,
                pending: Vec::new(),
            })),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Lines written so far, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        self.lock().recent.iter().cloned().collect()
    }

    pub fn current_file(&self) -> Option<PathBuf> {
        let inner = self.lock();
        inner
            .date
            .map(|d| inner.dir.join(log_file_name(&inner.app_name, d)))
    }
}

impl Inner {
    fn ensure_file(&mut self, today: NaiveDate) -> io::Result<&mut File> {
        if self.date != Some(today) || self.file.is_none() {
            let path = self.dir.join(log_file_name(&self.app_name, today));
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            self.file = Some(file);
            self.date = Some(today);
            if let Err(e) = prune_old_logs(&self.dir, &self.app_name, MAX_LOG_FILES) {
                eprintln!("rolling-logger: prune failed: {}", e);
            }
        }
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file unavailable"))
    }

    fn remember(&mut self, buf: &[u8]) {
        self.pending.extend_from_slice(buf);
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&line[..line.len() - 1]).into_owned();
            if self.recent.len() == self.capacity {
                self.recent.pop_front();
            }
            if self.capacity > 0 {
                self.recent.push_back(text);
            }
        }
    }
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self.lock();
        let today = Local::now().date_naive();
        inner.ensure_file(today)?.write_all(buf)?;
        inner.remember(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.lock().file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for RollingWriter {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

pub fn log_file_name(app_name: &str, date: NaiveDate) -> String {
    format!("{}-{}.log", app_name, date.format("%Y-%m-%d"))
}

/// Delete all but the newest `keep` daily files for `app_name`.
/// Returns how many were removed.
pub fn prune_old_logs(dir: &Path, app_name: &str, keep: usize) -> io::Result<usize> {
    let prefix = format!("{}-", app_name);
    let mut dated: Vec<(NaiveDate, PathBuf)> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            let stamp = name.strip_prefix(&prefix)?.strip_suffix(".log")?;
            let date = NaiveDate::parse_from_str(stamp, "%Y-%m-%d").ok()?;
            Some((date, entry.path()))
        })
        .collect();

    if dated.len() <= keep {
        return Ok(0);
    }
    dated.sort_by(|a, b| b.0.cmp(&a.0));
    let mut removed = 0;
    for (_, path) in dated.into_iter().skip(keep) {
        fs::remove_file(path)?;
        removed += 1;
    }
    Ok(removed)
}

/// Install the global subscriber writing to `log_dir`
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), String> {
    let writer = RollingWriter::new(log_dir.as_ref(), app_name).map_err(|e| e.to_string())?;

    tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .try_init()
        .map_err(|e| e.to_string())?;

    WRITER
        .set(writer)
        .map_err(|_| "logger already initialized".to_string())?;
    tracing::info!("logger initialized in {}", log_dir.as_ref().display());
    Ok(())
}

fn ensure_initialized() -> Result<(), String> {
    WRITER
        .get()
        .map(|_| ())
        .ok_or_else(|| "logger not initialized".to_string())
}

pub fn info(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::info!("{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::warn!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::error!("{}", msg);
    Ok(())
}

/// Recent lines from the global logger, empty before `init_logger`
pub fn recent_lines() -> Vec<String> {
    WRITER.get().map(|w| w.recent_lines()).unwrap_or_default()
}
