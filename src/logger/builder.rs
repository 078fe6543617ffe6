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

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::Logger;
use super::logger::Workers;
use super::set_default_logger;
use crate::Error;
use crate::config::Config;
use crate::config::SharedConfig;
use crate::queue;
use crate::sweeper::DEFAULT_SWEEP_DELAY;
use crate::sweeper::DEFAULT_SWEEP_INTERVAL;
use crate::sweeper::Sweeper;
use crate::trap::DefaultTrap;
use crate::trap::Trap;
use crate::writer::DEFAULT_WRITE_INTERVAL;
use crate::writer::Writer;

/// A builder for starting a [`Logger`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use dailylog::Config;
/// use dailylog::Logger;
///
/// let dir = std::env::temp_dir().join("dailylog-doc-builder");
/// let logger = Logger::builder()
///     .config(Config::default().with_directory(&dir).with_base_name("app"))
///     .queue_capacity(1000)
///     .write_interval(Duration::from_millis(200))
///     .build();
///
/// logger.emit(5, format_args!("service started on port {}", 8080));
/// logger.flush();
/// ```
#[must_use = "call `build` to start the logger"]
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
    queue_capacity: usize,
    write_interval: Duration,
    sweep_delay: Duration,
    sweep_interval: Duration,
    trap: Box<dyn Trap>,
    thread_name: String,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerBuilder {
    /// Create a builder with the default settings.
    pub fn new() -> Self {
        LoggerBuilder {
            config: Config::default(),
            queue_capacity: queue::DEFAULT_CAPACITY,
            write_interval: DEFAULT_WRITE_INTERVAL,
            sweep_delay: DEFAULT_SWEEP_DELAY,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            trap: Box::new(DefaultTrap::default()),
            thread_name: "dailylog".to_string(),
        }
    }

    /// Set the initial configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set how many records may wait before producers block. Default to 100.
    pub fn queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    /// Set the pause between two drains. Default to one second.
    pub fn write_interval(mut self, write_interval: Duration) -> Self {
        self.write_interval = write_interval;
        self
    }

    /// Set the pause before the first sweep. Default to one minute.
    pub fn sweep_delay(mut self, sweep_delay: Duration) -> Self {
        self.sweep_delay = sweep_delay;
        self
    }

    /// Set the pause between two sweeps. Default to one hour.
    pub fn sweep_interval(mut self, sweep_interval: Duration) -> Self {
        self.sweep_interval = sweep_interval;
        self
    }

    /// Set the trap receiving the writer's and the sweeper's errors.
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Set the prefix of the background thread names.
    ///
    /// The writer runs as `<name>-writer` and the sweeper as `<name>-sweeper`.
    pub fn thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }

    /// Start the writer and the sweeper threads.
    ///
    /// # Errors
    ///
    /// Return an error if a background thread cannot be spawned.
    pub fn try_build(self) -> Result<Logger, Error> {
        let Self {
            config,
            queue_capacity,
            write_interval,
            sweep_delay,
            sweep_interval,
            trap,
            thread_name,
        } = self;

        let config = SharedConfig::new(config);
        let trap: Arc<dyn Trap> = Arc::from(trap);
        let (queue, receiver) = queue::bounded(queue_capacity);

        let (writer_tasks, tasks) = crossbeam_channel::unbounded();
        let writer = Writer::new(config.clone(), receiver).with_trap(trap.clone());
        let writer = thread::Builder::new()
            .name(format!("{thread_name}-writer"))
            .spawn(move || writer.run(write_interval, tasks))
            .map_err(|err| Error::new("failed to spawn writer thread").with_source(err))?;

        let (sweeper_shutdown, shutdown) = crossbeam_channel::bounded(0);
        let sweeper = Sweeper::new(config.clone(), queue.clone()).with_trap(trap);
        let sweeper = thread::Builder::new()
            .name(format!("{thread_name}-sweeper"))
            .spawn(move || sweeper.run(sweep_delay, sweep_interval, shutdown))
            .map_err(|err| Error::new("failed to spawn sweeper thread").with_source(err))?;

        let workers = Workers {
            writer_tasks,
            writer,
            sweeper_shutdown,
            sweeper,
        };
        Ok(Logger::new(queue, config, workers))
    }

    /// Start the writer and the sweeper threads.
    ///
    /// # Panics
    ///
    /// Panic if a background thread cannot be spawned.
    pub fn build(self) -> Logger {
        self.try_build()
            .expect("LoggerBuilder::build failed to start the background threads")
    }

    /// Build the logger and install it as the default logger.
    ///
    /// # Errors
    ///
    /// Return the built logger back if the default logger has already been set.
    pub fn try_apply(self) -> Result<(), Logger> {
        set_default_logger(self.build())
    }

    /// Build the logger and install it as the default logger.
    ///
    /// # Panics
    ///
    /// Panic if the default logger has already been set.
    pub fn apply(self) {
        self.try_apply()
            .expect("LoggerBuilder::apply must be called before the default logger initialized");
    }
}
