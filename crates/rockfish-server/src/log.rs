//! Activity log — batches per-call headers and rotates CSV files by
//! time policy.
//!
//! One instance per process, constructed by the composition root and
//! shared via `Arc`. A single mutex guards the queue and the log-file
//! state; a background tokio task flushes every five seconds while the
//! log is started.

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use rockfish_core::config::{data_dir, LogPolicy};
use rockfish_core::header::RequestHeader;

/// Interval between flush attempts.
const FLUSH_INTERVAL: Duration = Duration::from_secs(5);

struct LogInner {
    queue: Vec<RequestHeader>,
    policy: LogPolicy,
    /// Directory override; None resolves the default data directory.
    root: Option<PathBuf>,
}

struct FlushTimer {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

pub struct ActivityLog {
    inner: Mutex<LogInner>,
    timer: Mutex<Option<FlushTimer>>,
}

impl ActivityLog {
    pub fn new(policy: LogPolicy) -> Self {
        Self {
            inner: Mutex::new(LogInner {
                queue: Vec::new(),
                policy,
                root: None,
            }),
            timer: Mutex::new(None),
        }
    }

    /// Log into a specific directory instead of the default data dir.
    pub fn with_root(policy: LogPolicy, root: PathBuf) -> Self {
        let log = Self::new(policy);
        log.inner.lock().unwrap().root = Some(root);
        log
    }

    pub fn policy(&self) -> LogPolicy {
        self.inner.lock().unwrap().policy
    }

    /// Number of headers waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.inner.lock().unwrap().queue.len()
    }

    /// Append a completed call header. Silently dropped when the policy
    /// is `Disabled`.
    pub fn enqueue(&self, header: RequestHeader) {
        let mut inner = self.inner.lock().unwrap();
        if inner.policy == LogPolicy::Disabled {
            return;
        }
        inner.queue.push(header);
    }

    /// Start the periodic flush task. Returns false (and does nothing)
    /// when the policy is `Disabled` or the task is already running.
    pub fn start(self: &std::sync::Arc<Self>) -> bool {
        if self.policy() == LogPolicy::Disabled {
            return false;
        }
        let mut timer = self.timer.lock().unwrap();
        if timer.is_some() {
            return false;
        }

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let log = self.clone();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(FLUSH_INTERVAL);
            interval.tick().await; // first tick completes immediately
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        log.flush();
                    }
                    _ = stop_rx.changed() => break,
                }
            }
        });
        *timer = Some(FlushTimer { stop_tx, task });
        true
    }

    /// Stop and join the flush task. Safe to call when not started.
    pub async fn stop(&self) {
        let timer = self.timer.lock().unwrap().take();
        if let Some(FlushTimer { stop_tx, task }) = timer {
            let _ = stop_tx.send(true);
            let _ = task.await;
        }
    }

    /// Change the rotation policy at runtime, toggling the flush task.
    pub async fn set_policy(self: &std::sync::Arc<Self>, policy: LogPolicy) {
        self.inner.lock().unwrap().policy = policy;
        if policy == LogPolicy::Disabled {
            self.stop().await;
        } else {
            self.start();
        }
    }

    /// Drain the queue to the active log file.
    ///
    /// Returns true when rows were written and the queue cleared. On any
    /// I/O failure the flush is abandoned and the queue left intact for
    /// the next tick.
    pub fn flush(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.queue.is_empty() {
            return false;
        }
        let Some(path) = log_path(inner.policy, inner.root.clone(), Local::now().date_naive())
        else {
            return false;
        };

        let exists = path.exists();
        let mut text = String::new();
        if !exists {
            text.push_str(RequestHeader::CSV_HEADING);
            text.push('\n');
        }
        for header in &inner.queue {
            text.push_str(&header.to_csv_row());
            text.push('\n');
        }

        let result = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .and_then(|mut file| {
                use std::io::Write;
                file.write_all(text.as_bytes())
            });

        match result {
            Ok(()) => {
                inner.queue.clear();
                true
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "activity log flush failed");
                false
            }
        }
    }
}

/// Full path of the active log file, or None when logging is off or the
/// log directory cannot be created.
fn log_path(policy: LogPolicy, root: Option<PathBuf>, today: NaiveDate) -> Option<PathBuf> {
    let stamp = rotation_stamp(policy, today)?;
    let dir = root.unwrap_or_else(|| {
        data_dir()
            .join(env!("CARGO_PKG_VERSION"))
            .join("logs")
    });
    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing::warn!(dir = %dir.display(), error = %e, "cannot create log directory");
        return None;
    }
    Some(dir.join(format!("{stamp}.csv")))
}

/// File-name date stamp for the rotation period containing `date`.
fn rotation_stamp(policy: LogPolicy, date: NaiveDate) -> Option<String> {
    match policy {
        LogPolicy::Disabled => None,
        LogPolicy::Daily => Some(date.format("%Y%m%d").to_string()),
        LogPolicy::Weekly => {
            // Roll back to the most recent Sunday.
            let back = date.weekday().num_days_from_sunday() as i64;
            let sunday = date - chrono::Duration::days(back);
            Some(sunday.format("%Y%m%d").to_string())
        }
        LogPolicy::Monthly => Some(format!("{:04}{:02}01", date.year(), date.month())),
    }
}
