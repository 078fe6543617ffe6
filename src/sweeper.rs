// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The background task deleting log files that grew too large or too old.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;
use jiff::Span;
use jiff::Zoned;
use jiff::civil::Date;

use crate::Error;
use crate::clock::Clock;
use crate::config::DATE_FORMAT;
use crate::config::LOG_FILE_EXTENSION;
use crate::config::SharedConfig;
use crate::queue::QueueSender;
use crate::record::Record;
use crate::record::Severity;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

/// Default pause between start up and the first sweep.
pub const DEFAULT_SWEEP_DELAY: Duration = Duration::from_secs(60);
/// Default pause between two sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

// `<base_name>_YYYY-MM-DD.log`: the date is the 10 bytes ending 4 bytes (`.log`) before
// the end of the name.
const DATE_LEN: usize = 10;
const DATE_END_OFFSET: usize = LOG_FILE_EXTENSION.len();

/// Why a file was selected for deletion.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DeletionReason {
    /// The file is larger than the size ceiling.
    Size,
    /// The date in the file name is older than the age ceiling.
    Age,
}

impl DeletionReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            DeletionReason::Size => "size",
            DeletionReason::Age => "age",
        }
    }
}

impl fmt::Display for DeletionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file selected by a sweep.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deletion {
    pub path: PathBuf,
    pub reason: DeletionReason,
}

/// What one sweep did.
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Files removed.
    pub deleted: Vec<Deletion>,
    /// Files selected for deletion that could not be removed.
    pub failed: Vec<Deletion>,
}

/// Scans the log directory and deletes files violating the size or age ceiling.
///
/// The size ceiling is checked first; the age ceiling only applies to files the size
/// check did not select, so every deletion has exactly one reason. Only names containing
/// `.log` are ever deleted, and only regular files are considered.
///
/// Each deletion is announced through the queue before the file is removed, so it shows
/// up in the log itself. A failed removal is announced as well. Announcements are `INFO`
/// records, not `EMER` ones: deleting an expired file is routine maintenance.
#[derive(Debug)]
pub struct Sweeper {
    config: SharedConfig,
    queue: QueueSender,
    trap: Arc<dyn Trap>,
    clock: Clock,
    remove: fn(&Path) -> io::Result<()>,
}

impl Sweeper {
    /// Create a sweeper announcing its deletions through `queue`.
    pub fn new(config: SharedConfig, queue: QueueSender) -> Sweeper {
        Sweeper {
            config,
            queue,
            trap: Arc::new(DefaultTrap::default()),
            clock: Clock::DefaultClock,
            remove: remove_file,
        }
    }

    /// Set the trap receiving directory listing failures. Defaults to [`DefaultTrap`].
    pub fn with_trap(mut self, trap: Arc<dyn Trap>) -> Self {
        self.trap = trap;
        self
    }

    #[cfg(test)]
    fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[cfg(test)]
    fn with_remove(mut self, remove: fn(&Path) -> io::Result<()>) -> Self {
        self.remove = remove;
        self
    }

    /// Run one sweep over the configured directory.
    pub fn sweep(&self) -> SweepReport {
        let mut report = SweepReport::default();

        let config = self.config.load();
        let dir = config.log_dir();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                self.trap.trap(
                    &Error::new("failed to read log directory")
                        .with_context("directory", dir.display())
                        .with_source(err),
                );
                return report;
            }
        };

        let max_size = config.max_size_bytes();
        let cutoff = config
            .max_age()
            .and_then(|days| age_cutoff(&self.clock.now(), days));

        for entry in entries.flatten() {
            // The writer only creates files; never touch directories or symlinks.
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }

            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            let Some(reason) = evaluate(name, metadata.len(), max_size, cutoff.as_ref()) else {
                continue;
            };
            if !name.contains(LOG_FILE_EXTENSION) {
                continue;
            }

            let path = dir.join(name);
            match reason {
                DeletionReason::Size => self.announce(format_args!(
                    "log file [{}] is larger than [{}] KB, deleting it",
                    path.display(),
                    config.max_size_kb()
                )),
                DeletionReason::Age => self.announce(format_args!(
                    "log file [{}] is older than [{}] days, deleting it",
                    path.display(),
                    config.max_age_days()
                )),
            }

            let deletion = Deletion { path, reason };
            match (self.remove)(&deletion.path) {
                Ok(()) => report.deleted.push(deletion),
                Err(err) => {
                    self.announce(format_args!(
                        "failed to delete log file [{}]: {err}",
                        deletion.path.display()
                    ));
                    report.failed.push(deletion);
                }
            }
        }

        report
    }

    fn announce(&self, args: fmt::Arguments<'_>) {
        // the writer is gone only when the logger is shutting down
        let _ = self.queue.push(Record::new(Severity::Info, args));
    }

    /// Sweep after `delay`, then every `interval`, until `shutdown` disconnects.
    pub(crate) fn run(self, delay: Duration, interval: Duration, shutdown: Receiver<()>) {
        let mut wait = delay;
        loop {
            crossbeam_channel::select! {
                recv(shutdown) -> _ => break,
                default(wait) => {
                    self.sweep();
                    wait = interval;
                }
            }
        }
    }
}

fn remove_file(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

fn evaluate(
    name: &str,
    size: u64,
    max_size: Option<u64>,
    cutoff: Option<&Zoned>,
) -> Option<DeletionReason> {
    if max_size.is_some_and(|max| size > max) {
        return Some(DeletionReason::Size);
    }

    let cutoff = cutoff?;
    let date = date_from_file_name(name)?;
    let day_start = date.to_zoned(cutoff.time_zone().clone()).ok()?;
    (day_start < *cutoff).then_some(DeletionReason::Age)
}

fn age_cutoff(now: &Zoned, max_age_days: i64) -> Option<Zoned> {
    let span = Span::new().try_days(max_age_days).ok()?;
    now.checked_sub(span).ok()
}

fn date_from_file_name(name: &str) -> Option<Date> {
    let len = name.len();
    if len <= DATE_LEN + DATE_END_OFFSET {
        return None;
    }
    let date = name.get(len - DATE_END_OFFSET - DATE_LEN..len - DATE_END_OFFSET)?;
    // strptime accepts signed and short years; only `DDDD-DD-DD` is a file date
    let shaped = date.bytes().enumerate().all(|(i, b)| match i {
        4 | 7 => b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !shaped {
        return None;
    }
    Date::strptime(DATE_FORMAT, date).ok()
}
