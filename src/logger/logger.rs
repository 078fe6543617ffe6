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

use std::fmt;
use std::io;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::OnceLock;
use std::thread::JoinHandle;

use crossbeam_channel::Sender;

use super::LoggerBuilder;
use crate::config::Config;
use crate::config::SharedConfig;
use crate::queue::QueueSender;
use crate::record::Record;
use crate::record::Severity;
use crate::writer::WriterTask;

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Return the default logger, starting one with the default settings on first use.
///
/// The default logger is never dropped; records still queued when the process exits are lost.
pub fn default_logger() -> &'static Logger {
    DEFAULT_LOGGER.get_or_init(|| LoggerBuilder::new().build())
}

/// Set the default logger to the given logger.
///
/// This must be called before the first use of [`default_logger`], including through the
/// crate level functions such as [`emit`](crate::emit).
///
/// # Errors
///
/// Return the logger back if the default logger has already been set.
///
/// # Examples
///
/// ```
/// use dailylog::Config;
/// use dailylog::Logger;
///
/// let logger = Logger::builder()
///     .config(Config::default().with_base_name("app"))
///     .build();
/// if dailylog::set_default_logger(logger).is_err() {
///     eprintln!("default logger was already set");
/// }
/// ```
pub fn set_default_logger(logger: Logger) -> Result<(), Logger> {
    DEFAULT_LOGGER.set(logger)
}

/// A running logging pipeline: a queue, a writer thread and a sweeper thread.
///
/// Dropping the logger stops the sweeper, then lets the writer drain what is still queued
/// and waits for both threads to exit.
#[derive(Debug)]
pub struct Logger {
    queue: QueueSender,
    config: SharedConfig,
    workers: Option<Workers>,
}

#[derive(Debug)]
pub(super) struct Workers {
    pub(super) writer_tasks: Sender<WriterTask>,
    pub(super) writer: JoinHandle<()>,
    pub(super) sweeper_shutdown: Sender<()>,
    pub(super) sweeper: JoinHandle<()>,
}

impl Logger {
    /// Create a [`LoggerBuilder`].
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub(super) fn new(queue: QueueSender, config: SharedConfig, workers: Workers) -> Logger {
        Logger {
            queue,
            config,
            workers: Some(workers),
        }
    }

    /// Render a record now and queue it, blocking while the queue is full.
    ///
    /// The record is echoed to standard output first when the console echo is on.
    pub fn log(&self, severity: Severity, args: fmt::Arguments<'_>) {
        let record = Record::new(severity, args);
        if self.config.load().console_echo() {
            let _ = writeln!(io::stdout(), "{record}");
        }
        // the writer only goes away while this logger is being dropped
        let _ = self.queue.push(record);
    }

    /// Log with a raw severity index. Indexes outside `0..=7` produce an empty tag.
    pub fn emit(&self, severity: i32, args: fmt::Arguments<'_>) {
        self.log(Severity::from_index(severity), args);
    }

    /// Overwrite the directory, base name and retention thresholds.
    ///
    /// The writer picks the change up on its next drain, the sweeper on its next sweep.
    pub fn configure(
        &self,
        directory: impl Into<PathBuf>,
        base_name: impl Into<String>,
        max_size_kb: i64,
        max_age_days: i64,
    ) {
        self.config
            .configure(directory, base_name, max_size_kb, max_age_days);
    }

    /// Toggle echoing every record to standard output when it is created.
    pub fn set_console_echo(&self, console_echo: bool) {
        self.config.set_console_echo(console_echo);
    }

    /// The current configuration snapshot.
    pub fn config(&self) -> Arc<Config> {
        self.config.load()
    }

    /// Number of records waiting for the writer.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Ask the writer to drain now and wait until it is done.
    ///
    /// Return the number of lines that drain wrote. Records queued before the call are
    /// written by the time it returns, either by this drain or by an earlier tick.
    pub fn flush(&self) -> usize {
        let Some(workers) = &self.workers else {
            return 0;
        };

        let (done, written) = crossbeam_channel::bounded(1);
        if workers.writer_tasks.send(WriterTask::Flush(done)).is_err() {
            return 0;
        }
        written.recv().unwrap_or(0)
    }

    fn shutdown(&mut self) {
        if let Some(workers) = self.workers.take() {
            let Workers {
                writer_tasks,
                writer,
                sweeper_shutdown,
                sweeper,
            } = workers;

            // the sweeper may still be queueing records; stop it before the final drain
            drop(sweeper_shutdown);
            let _ = sweeper.join();

            drop(writer_tasks);
            let _ = writer.join();
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;

    fn build(dir: &std::path::Path) -> Logger {
        Logger::builder()
            .config(Config::default().with_directory(dir).with_base_name("unit"))
            .write_interval(Duration::from_secs(3600))
            .sweep_delay(Duration::from_secs(3600))
            .build()
    }

    fn read_lines(dir: &std::path::Path) -> Vec<String> {
        let file = fs::read_dir(dir).unwrap().next().unwrap().unwrap().path();
        fs::read_to_string(file)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_flush_writes_queued_records() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let logger = build(temp_dir.path());

        logger.log(Severity::Warning, format_args!("disk at {}%", 91));
        logger.emit(99, format_args!("no tag"));
        assert_eq!(logger.pending(), 2);
        assert_eq!(logger.flush(), 2);
        assert_eq!(logger.pending(), 0);

        let lines = read_lines(temp_dir.path());
        assert!(lines[0].ends_with(" [WARN] disk at 91%"), "{}", lines[0]);
        assert!(lines[1].ends_with(" [] no tag"), "{}", lines[1]);
    }

    #[test]
    fn test_drop_performs_final_drain() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let logger = build(temp_dir.path());

        for i in 0..10 {
            logger.emit(6, format_args!("record {i}"));
        }
        drop(logger);

        let lines = read_lines(temp_dir.path());
        assert_eq!(lines.len(), 10);
        assert!(lines[9].ends_with(" [DEBG] record 9"), "{}", lines[9]);
    }

    #[test]
    fn test_configure_and_console_echo_update_snapshot() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let logger = build(temp_dir.path());

        logger.set_console_echo(true);
        logger.configure(temp_dir.path().join("other"), "next", 1, 2);

        let config = logger.config();
        assert_eq!(config.directory(), temp_dir.path().join("other"));
        assert_eq!(config.base_name(), "next");
        assert_eq!(config.max_size_kb(), 1);
        assert_eq!(config.max_age_days(), 2);
        assert!(config.console_echo());
    }
}
