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

//! The background task appending queued records to the day's log file.

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;

use crate::Error;
use crate::clock::Clock;
use crate::config::SharedConfig;
use crate::queue::QueueReceiver;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

/// Default pause between two drains.
pub const DEFAULT_WRITE_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub(crate) enum WriterTask {
    /// Drain now and report how many lines were written.
    Flush(Sender<usize>),
}

/// Drains the queue into `<directory>/<base_name>_<YYYY-MM-DD>.log`.
///
/// Each drain is one burst: the file is opened in append mode, every record queued when
/// the burst started is written and flushed line by line, and the file is closed again.
/// The file name is computed from the current date at the start of every burst, so a
/// new day starts a new file without any explicit rollover.
///
/// Failures are handed to the trap and never stop the writer. Records whose line could
/// not be written are lost.
#[derive(Debug)]
pub struct Writer {
    config: SharedConfig,
    queue: QueueReceiver,
    trap: Arc<dyn Trap>,
    clock: Clock,
}

impl Writer {
    /// Create a writer consuming `queue` and reading its destination from `config`.
    pub fn new(config: SharedConfig, queue: QueueReceiver) -> Writer {
        Writer {
            config,
            queue,
            trap: Arc::new(DefaultTrap::default()),
            clock: Clock::DefaultClock,
        }
    }

    /// Set the trap receiving I/O failures. Defaults to [`DefaultTrap`].
    pub fn with_trap(mut self, trap: Arc<dyn Trap>) -> Self {
        self.trap = trap;
        self
    }

    #[cfg(test)]
    fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Number of records waiting to be written.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Write every record queued at the time of the call, returning the number of lines
    /// written.
    pub fn drain(&self) -> usize {
        let pending = self.queue.len();
        if pending == 0 {
            return 0;
        }

        let config = self.config.load();
        let dir = config.log_dir();
        if let Err(err) = fs::create_dir_all(dir) {
            self.trap.trap(
                &Error::new("failed to create log directory")
                    .with_context("directory", dir.display())
                    .with_source(err),
            );
        }

        let path = config.file_path(&self.clock.now());
        let mut file = match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => file,
            Err(err) => {
                let dropped = self.queue.pop_up_to(pending).count();
                self.trap.trap(
                    &Error::new("failed to open log file")
                        .with_context("path", path.display())
                        .with_context("dropped", dropped)
                        .with_source(err),
                );
                return 0;
            }
        };

        let mut written = 0;
        for record in self.queue.pop_up_to(pending) {
            match write_line(&mut file, &record.to_line()) {
                Ok(()) => written += 1,
                Err(err) => self.trap.trap(&err.with_context("path", path.display())),
            }
        }
        written
    }

    /// Drain on every tick until `tasks` disconnects, then drain one last time.
    pub(crate) fn run(self, interval: Duration, tasks: Receiver<WriterTask>) {
        let ticker = crossbeam_channel::tick(interval);
        loop {
            crossbeam_channel::select! {
                recv(ticker) -> _ => {
                    self.drain();
                }
                recv(tasks) -> task => match task {
                    Ok(WriterTask::Flush(done)) => {
                        let written = self.drain();
                        let _ = done.send(written);
                    }
                    Err(_) => {
                        self.drain();
                        break;
                    }
                },
            }
        }
    }
}

fn write_line(file: &mut File, line: &str) -> Result<(), Error> {
    file.write_all(line.as_bytes())
        .map_err(|err| Error::new("failed to write log record").with_source(err))?;
    file.flush()
        .map_err(|err| Error::new("failed to flush log file").with_source(err))
}
