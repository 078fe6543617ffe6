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

//! Log record and severity.

use std::fmt;
use std::fmt::Write;

use jiff::RoundMode;
use jiff::Unit;
use jiff::Zoned;
use jiff::ZonedRound;

const FORMAT_ERROR_MARKER: &str = "<formatting error>";

/// The severity of a record, selected by an index from `0` (most severe) to `7`.
///
/// Any other index is accepted and maps to [`Severity::Unknown`], which renders an empty
/// tag instead of being rejected.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Severity {
    /// `EMER`: the system is unusable (disk failure, memory corruption, network down).
    Emergency,
    /// `ALRT`: a system-level fault such as an unreachable database or a broken config file.
    Alert,
    /// `CRIT`: a system-level hazard such as a permission or access failure.
    Critical,
    /// `EROR`: a user-level error.
    Error,
    /// `WARN`: a user-level warning.
    Warning,
    /// `INFO`: a user-level notable event.
    Info,
    /// `DEBG`: user-level debugging output.
    Debug,
    /// `TRAC`: user-level verbose output.
    Trace,
    /// An index outside `0..=7`.
    Unknown(i32),
}

impl Severity {
    /// Map an index to a severity.
    pub const fn from_index(index: i32) -> Severity {
        match index {
            0 => Severity::Emergency,
            1 => Severity::Alert,
            2 => Severity::Critical,
            3 => Severity::Error,
            4 => Severity::Warning,
            5 => Severity::Info,
            6 => Severity::Debug,
            7 => Severity::Trace,
            other => Severity::Unknown(other),
        }
    }

    /// The index this severity was selected with.
    pub const fn index(self) -> i32 {
        match self {
            Severity::Emergency => 0,
            Severity::Alert => 1,
            Severity::Critical => 2,
            Severity::Error => 3,
            Severity::Warning => 4,
            Severity::Info => 5,
            Severity::Debug => 6,
            Severity::Trace => 7,
            Severity::Unknown(index) => index,
        }
    }

    /// The four letter tag written between brackets, empty for [`Severity::Unknown`].
    pub const fn tag(self) -> &'static str {
        match self {
            Severity::Emergency => "EMER",
            Severity::Alert => "ALRT",
            Severity::Critical => "CRIT",
            Severity::Error => "EROR",
            Severity::Warning => "WARN",
            Severity::Info => "INFO",
            Severity::Debug => "DEBG",
            Severity::Trace => "TRAC",
            Severity::Unknown(_) => "",
        }
    }

    /// All known severities, most severe first.
    pub const fn all() -> [Severity; 8] {
        [
            Severity::Emergency,
            Severity::Alert,
            Severity::Critical,
            Severity::Error,
            Severity::Warning,
            Severity::Info,
            Severity::Debug,
            Severity::Trace,
        ]
    }
}

impl From<i32> for Severity {
    fn from(index: i32) -> Self {
        Severity::from_index(index)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A log record: when it happened, how severe it is, and the rendered message.
///
/// A record is never modified after creation. It is moved into the queue and written
/// exactly once.
#[derive(Debug)]
pub struct Record {
    timestamp: Zoned,
    severity: Severity,
    message: String,
}

impl Record {
    /// Create a record stamped with the current local time.
    ///
    /// The message is rendered immediately. If a formatted value fails to render, the
    /// text produced so far is kept and a `<formatting error>` marker is appended.
    pub fn new(severity: Severity, args: fmt::Arguments<'_>) -> Record {
        let now = Zoned::now();
        let timestamp = now
            .round(
                ZonedRound::new()
                    .smallest(Unit::Millisecond)
                    .mode(RoundMode::Trunc),
            )
            .unwrap_or(now);

        Record {
            timestamp,
            severity,
            message: render(args),
        }
    }

    /// Create a record with an explicit timestamp and an already rendered message.
    pub fn with_timestamp(
        timestamp: Zoned,
        severity: Severity,
        message: impl Into<String>,
    ) -> Record {
        Record {
            timestamp,
            severity,
            message: message.into(),
        }
    }

    /// The observed time.
    pub fn timestamp(&self) -> &Zoned {
        &self.timestamp
    }

    /// The severity of the record.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The rendered message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Render the record as one line of a log file, including the trailing newline.
    pub fn to_line(&self) -> String {
        let mut line = self.to_string();
        line.push('\n');
        line
    }
}

/// `YYYY-MM-DD HH:MM:SS.mmm [TAG] message`
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = self.timestamp.subsec_nanosecond() / 1_000_000;
        write!(
            f,
            "{}.{millis:03} [{}] {}",
            self.timestamp.strftime("%Y-%m-%d %H:%M:%S"),
            self.severity.tag(),
            self.message
        )
    }
}

fn render(args: fmt::Arguments<'_>) -> String {
    if let Some(message) = args.as_str() {
        return message.to_owned();
    }

    let mut message = String::new();
    if message.write_fmt(args).is_err() {
        message.push_str(FORMAT_ERROR_MARKER);
    }
    message
}
