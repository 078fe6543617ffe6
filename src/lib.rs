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

//! Dailylog writes log records to one file per calendar day, asynchronously, and deletes
//! old or oversized log files in the background.
//!
//! # Overview
//!
//! Producers render a record immediately and push it onto a bounded queue. A writer thread
//! wakes up every second and appends everything queued to
//! `<directory>/<base_name>_<YYYY-MM-DD>.log`. A sweeper thread periodically deletes log
//! files larger than the size ceiling or dated older than the age ceiling.
//!
//! Each line looks like:
//!
//! ```text
//! 2024-08-10 17:12:52.123 [INFO] user alice logged in
//! ```
//!
//! When the queue is full, producers block until the writer catches up; records are never
//! dropped to make room.
//!
//! # Examples
//!
//! Log through the process-wide default logger:
//!
//! ```no_run
//! dailylog::configure("/var/log/myapp", "myapp", 100 * 1024, 30);
//!
//! dailylog::emit!(5, "listening on {}", "0.0.0.0:8080");
//! dailylog::warn!("cache miss ratio {:.2}", 0.42);
//! ```
//!
//! Run an independent pipeline:
//!
//! ```
//! use dailylog::Config;
//! use dailylog::Logger;
//!
//! let logger = Logger::builder()
//!     .config(Config::default().with_directory(std::env::temp_dir()).with_base_name("doc"))
//!     .build();
//! logger.emit(5, format_args!("hello"));
//! // dropping the logger writes whatever is still queued
//! drop(logger);
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

use std::fmt;
use std::path::PathBuf;

#[cfg(feature = "bridge-log")]
pub mod bridge;
pub mod config;
pub mod error;
pub mod queue;
pub mod record;
pub mod sweeper;
pub mod trap;
pub mod writer;

mod clock;
mod logger;
mod macros;

pub use self::config::Config;
pub use self::config::SharedConfig;
pub use self::error::Error;
pub use self::logger::Logger;
pub use self::logger::LoggerBuilder;
pub use self::logger::default_logger;
pub use self::logger::set_default_logger;
pub use self::record::Record;
pub use self::record::Severity;
pub use self::sweeper::DeletionReason;
pub use self::sweeper::SweepReport;
pub use self::sweeper::Sweeper;
pub use self::trap::DefaultTrap;
pub use self::trap::Trap;
pub use self::writer::Writer;

/// Overwrite the default logger's directory, base name and retention thresholds.
///
/// No validation is done: an empty directory means the current directory, and a
/// non-positive threshold disables the matching retention policy. The writer uses the new
/// values on its next drain and the sweeper on its next sweep.
pub fn configure(
    directory: impl Into<PathBuf>,
    base_name: impl Into<String>,
    max_size_kb: i64,
    max_age_days: i64,
) {
    default_logger().configure(directory, base_name, max_size_kb, max_age_days);
}

/// Log through the default logger with a raw severity index.
///
/// Indexes `0..=7` map to `EMER`, `ALRT`, `CRIT`, `EROR`, `WARN`, `INFO`, `DEBG` and `TRAC`;
/// any other index yields an empty tag. Blocks while the queue is full.
///
/// See also the [`emit!`] macro.
pub fn emit(severity: i32, args: fmt::Arguments<'_>) {
    default_logger().emit(severity, args);
}

/// Toggle echoing every record of the default logger to standard output.
pub fn set_console_echo(console_echo: bool) {
    default_logger().set_console_echo(console_echo);
}

/// Write everything queued on the default logger now, returning the number of lines
/// written by that drain.
pub fn flush() -> usize {
    default_logger().flush()
}

/// Log a message tagged `EMER` through the default logger.
pub fn emer(args: fmt::Arguments<'_>) {
    default_logger().log(Severity::Emergency, args);
}

/// Log a message tagged `ALRT` through the default logger.
pub fn alert(args: fmt::Arguments<'_>) {
    default_logger().log(Severity::Alert, args);
}

/// Log a message tagged `CRIT` through the default logger.
pub fn crit(args: fmt::Arguments<'_>) {
    default_logger().log(Severity::Critical, args);
}

/// Log a message tagged `EROR` through the default logger.
pub fn error(args: fmt::Arguments<'_>) {
    default_logger().log(Severity::Error, args);
}

/// Log a message tagged `WARN` through the default logger.
pub fn warn(args: fmt::Arguments<'_>) {
    default_logger().log(Severity::Warning, args);
}

/// Log a message tagged `INFO` through the default logger.
pub fn info(args: fmt::Arguments<'_>) {
    default_logger().log(Severity::Info, args);
}

/// Log a message tagged `DEBG` through the default logger.
pub fn debug(args: fmt::Arguments<'_>) {
    default_logger().log(Severity::Debug, args);
}

/// Log a message tagged `TRAC` through the default logger.
pub fn trace(args: fmt::Arguments<'_>) {
    default_logger().log(Severity::Trace, args);
}
