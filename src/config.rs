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

//! Where log files live, how they are named, and when they are deleted.

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use arc_swap::ArcSwap;
use jiff::Zoned;

/// Default prefix of log file names.
pub const DEFAULT_BASE_NAME: &str = "dailylog";
/// Default size ceiling of a log file, 100 MiB.
pub const DEFAULT_MAX_SIZE_KB: i64 = 100 * 1024;
/// Default age ceiling of a log file.
pub const DEFAULT_MAX_AGE_DAYS: i64 = 30;

/// Every log file name ends with this; the sweeper refuses to delete names without it.
pub(crate) const LOG_FILE_EXTENSION: &str = ".log";
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// A snapshot of the logger configuration.
///
/// # Examples
///
/// ```
/// use dailylog::Config;
///
/// let config = Config::default()
///     .with_directory("logs")
///     .with_base_name("app")
///     .with_max_size_kb(1024)
///     .with_max_age_days(3);
/// assert_eq!(config.base_name(), "app");
/// assert_eq!(config.max_size_bytes(), Some(1024 * 1024));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    directory: PathBuf,
    base_name: String,
    max_size_kb: i64,
    max_age_days: i64,
    console_echo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directory: PathBuf::new(),
            base_name: DEFAULT_BASE_NAME.to_string(),
            max_size_kb: DEFAULT_MAX_SIZE_KB,
            max_age_days: DEFAULT_MAX_AGE_DAYS,
            console_echo: false,
        }
    }
}

impl Config {
    /// Sets the directory of log files. An empty path means the current directory.
    #[must_use]
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Sets the prefix of log file names.
    #[must_use]
    pub fn with_base_name(mut self, base_name: impl Into<String>) -> Self {
        self.base_name = base_name.into();
        self
    }

    /// Sets the size ceiling in KiB. Zero or negative disables size based deletion.
    #[must_use]
    pub fn with_max_size_kb(mut self, max_size_kb: i64) -> Self {
        self.max_size_kb = max_size_kb;
        self
    }

    /// Sets the age ceiling in days. Zero or negative disables age based deletion.
    #[must_use]
    pub fn with_max_age_days(mut self, max_age_days: i64) -> Self {
        self.max_age_days = max_age_days;
        self
    }

    /// Sets whether records are printed to standard output when created.
    #[must_use]
    pub fn with_console_echo(mut self, console_echo: bool) -> Self {
        self.console_echo = console_echo;
        self
    }

    /// The directory as configured, possibly empty.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The directory to create, list and write into.
    pub fn log_dir(&self) -> &Path {
        if self.directory.as_os_str().is_empty() {
            Path::new(".")
        } else {
            &self.directory
        }
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn max_size_kb(&self) -> i64 {
        self.max_size_kb
    }

    pub fn max_age_days(&self) -> i64 {
        self.max_age_days
    }

    pub fn console_echo(&self) -> bool {
        self.console_echo
    }

    /// The size ceiling in bytes, `None` when disabled.
    pub fn max_size_bytes(&self) -> Option<u64> {
        u64::try_from(self.max_size_kb)
            .ok()
            .filter(|kb| *kb > 0)
            .map(|kb| kb.saturating_mul(1024))
    }

    /// The age ceiling in days, `None` when disabled.
    pub fn max_age(&self) -> Option<i64> {
        (self.max_age_days > 0).then_some(self.max_age_days)
    }

    /// `<base_name>_<YYYY-MM-DD>.log` for the day of `now`.
    pub fn file_name(&self, now: &Zoned) -> String {
        format!(
            "{}_{}{LOG_FILE_EXTENSION}",
            self.base_name,
            now.strftime(DATE_FORMAT)
        )
    }

    /// The full path of the log file for the day of `now`.
    pub fn file_path(&self, now: &Zoned) -> PathBuf {
        self.log_dir().join(self.file_name(now))
    }
}

/// A configuration shared by the facade, the writer and the sweeper.
///
/// Readers load an immutable snapshot for each cycle; writers swap in a whole new
/// [`Config`], so a reader never observes a half-applied update.
#[derive(Clone, Debug)]
pub struct SharedConfig(Arc<ArcSwap<Config>>);

impl Default for SharedConfig {
    fn default() -> Self {
        SharedConfig::new(Config::default())
    }
}

impl SharedConfig {
    /// Create a shared handle starting from `config`.
    pub fn new(config: Config) -> Self {
        SharedConfig(Arc::new(ArcSwap::from_pointee(config)))
    }

    /// The current snapshot.
    pub fn load(&self) -> Arc<Config> {
        self.0.load_full()
    }

    /// Replace the whole configuration.
    pub fn store(&self, config: Config) {
        self.0.store(Arc::new(config));
    }

    /// Overwrite the directory, base name and both retention thresholds, keeping the
    /// console echo setting.
    pub fn configure(
        &self,
        directory: impl Into<PathBuf>,
        base_name: impl Into<String>,
        max_size_kb: i64,
        max_age_days: i64,
    ) {
        let directory = directory.into();
        let base_name = base_name.into();
        self.0.rcu(|current| {
            Config::clone(current)
                .with_directory(directory.clone())
                .with_base_name(base_name.clone())
                .with_max_size_kb(max_size_kb)
                .with_max_age_days(max_age_days)
        });
    }

    /// Toggle printing records to standard output.
    pub fn set_console_echo(&self, console_echo: bool) {
        self.0.rcu(|current| Config::clone(current).with_console_echo(console_echo));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.directory(), Path::new(""));
        assert_eq!(config.log_dir(), Path::new("."));
        assert_eq!(config.base_name(), "dailylog");
        assert_eq!(config.max_size_bytes(), Some(100 * 1024 * 1024));
        assert_eq!(config.max_age(), Some(30));
        assert!(!config.console_echo());
    }

    #[test]
    fn test_non_positive_thresholds_disable_policies() {
        for value in [0, -1, i64::MIN] {
            let config = Config::default()
                .with_max_size_kb(value)
                .with_max_age_days(value);
            assert_eq!(config.max_size_bytes(), None);
            assert_eq!(config.max_age(), None);
        }
    }

    #[test]
    fn test_file_name() {
        let now: Zoned = "2024-08-10T23:59:59+08:00[+08:00]".parse().unwrap();
        let config = Config::default()
            .with_directory("logs")
            .with_base_name("logtest");
        assert_eq!(config.file_name(&now), "logtest_2024-08-10.log");
        assert_eq!(
            config.file_path(&now),
            Path::new("logs").join("logtest_2024-08-10.log")
        );
    }

    #[test]
    fn test_configure_keeps_console_echo() {
        let shared = SharedConfig::new(Config::default().with_console_echo(true));
        let before = shared.load();

        shared.configure("./log", "logtest", 1024, 3);

        let after = shared.load();
        assert_eq!(after.directory(), Path::new("./log"));
        assert_eq!(after.base_name(), "logtest");
        assert_eq!(after.max_size_kb(), 1024);
        assert_eq!(after.max_age_days(), 3);
        assert!(after.console_echo());

        // snapshots taken earlier are unaffected
        assert_eq!(before.base_name(), "dailylog");

        shared.set_console_echo(false);
        assert!(!shared.load().console_echo());
        assert_eq!(shared.load().base_name(), "logtest");
    }

    #[test]
    fn test_clones_share_state() {
        let shared = SharedConfig::default();
        let other = shared.clone();
        other.store(Config::default().with_base_name("other"));
        assert_eq!(shared.load().base_name(), "other");
    }
}
