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

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use dailylog::Config;
use dailylog::DeletionReason;
use dailylog::SharedConfig;
use dailylog::Sweeper;
use dailylog::queue;
use dailylog::queue::QueueReceiver;
use rand::RngCore;
use tempfile::TempDir;

fn today() -> String {
    jiff::Zoned::now().strftime("%Y-%m-%d").to_string()
}

fn create_file(dir: &Path, name: &str, size: usize) -> PathBuf {
    let mut content = vec![0u8; size];
    rand::rng().fill_bytes(&mut content);
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn sweeper(config: &SharedConfig) -> (Sweeper, QueueReceiver) {
    let (sender, receiver) = queue::bounded(queue::DEFAULT_CAPACITY);
    (Sweeper::new(config.clone(), sender), receiver)
}

fn messages(receiver: &QueueReceiver) -> Vec<String> {
    receiver
        .pop_up_to(receiver.len())
        .map(|record| {
            assert_eq!(record.severity().tag(), "INFO");
            record.message().to_string()
        })
        .collect()
}

#[test]
fn test_oversized_file_is_deleted() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let dir = temp_dir.path();
    let config = SharedConfig::new(
        Config::default()
            .with_directory(dir)
            .with_max_size_kb(1)
            .with_max_age_days(0),
    );
    let (sweeper, receiver) = sweeper(&config);

    let large = create_file(dir, &format!("app_{}.log", today()), 2048);
    let small = create_file(dir, "app_2000-01-01.log", 512);

    let report = sweeper.sweep();
    assert_eq!(report.deleted.len(), 1);
    assert_eq!(report.deleted[0].path, large);
    assert_eq!(report.deleted[0].reason, DeletionReason::Size);
    assert!(!large.exists());
    assert!(small.exists());

    let messages = messages(&receiver);
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("is larger than [1] KB"), "{messages:?}");
}

#[test]
fn test_expired_file_is_deleted_and_unparseable_names_are_kept() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let dir = temp_dir.path();
    let config = SharedConfig::new(
        Config::default()
            .with_directory(dir)
            .with_max_age_days(3),
    );
    let (sweeper, receiver) = sweeper(&config);

    let expired = create_file(dir, "app_2000-01-01.log", 16);
    let current = create_file(dir, &format!("app_{}.log", today()), 16);
    let garbled = create_file(dir, "app_2000-13-45.log", 16);
    let short = create_file(dir, "x.log", 16);

    let report = sweeper.sweep();
    assert_eq!(report.deleted.len(), 1);
    assert_eq!(report.deleted[0].path, expired);
    assert_eq!(report.deleted[0].reason, DeletionReason::Age);
    assert!(!expired.exists());
    assert!(current.exists());
    assert!(garbled.exists());
    assert!(short.exists());

    let messages = messages(&receiver);
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("is older than [3] days"), "{messages:?}");
}

#[test]
fn test_file_matching_both_policies_is_reported_once_as_size() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let dir = temp_dir.path();
    let config = SharedConfig::new(
        Config::default()
            .with_directory(dir)
            .with_max_size_kb(1)
            .with_max_age_days(3),
    );
    let (sweeper, receiver) = sweeper(&config);

    let both = create_file(dir, "app_2000-01-01.log", 4096);

    let report = sweeper.sweep();
    assert_eq!(report.deleted.len(), 1);
    assert_eq!(report.deleted[0].reason, DeletionReason::Size);
    assert!(!both.exists());

    let messages = messages(&receiver);
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("is larger than"), "{messages:?}");
}

#[test]
fn test_files_without_log_marker_are_never_deleted() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let dir = temp_dir.path();
    let config = SharedConfig::new(
        Config::default()
            .with_directory(dir)
            .with_max_size_kb(1)
            .with_max_age_days(3),
    );
    let (sweeper, receiver) = sweeper(&config);

    let dump = create_file(dir, "dump_2000-01-01.txt", 4096);
    let data = create_file(dir, "data_2000-01-01.bin", 16);

    let report = sweeper.sweep();
    assert!(report.deleted.is_empty());
    assert!(report.failed.is_empty());
    assert!(dump.exists());
    assert!(data.exists());
    assert!(receiver.is_empty());
}

#[test]
fn test_new_thresholds_apply_on_next_sweep() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let dir = temp_dir.path();
    let config = SharedConfig::new(
        Config::default()
            .with_directory(dir)
            .with_max_size_kb(0)
            .with_max_age_days(0),
    );
    let (sweeper, receiver) = sweeper(&config);

    let large = create_file(dir, "app_2000-01-01.log", 2048);
    assert!(sweeper.sweep().deleted.is_empty());
    assert!(large.exists());

    config.configure(dir, "app", 1, 0);
    let report = sweeper.sweep();
    assert_eq!(report.deleted.len(), 1);
    assert!(!large.exists());
    assert_eq!(messages(&receiver).len(), 1);
}
