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

//! The bounded FIFO between producers and the writer.

use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;

use crate::record::Record;

/// Default number of records the queue holds before producers block.
pub const DEFAULT_CAPACITY: usize = 100;

/// Create a bounded queue holding at most `capacity` records.
///
/// A capacity of zero is raised to one: the writer only pops records that are already
/// queued, so a rendezvous channel would never drain.
///
/// # Examples
///
/// ```
/// use dailylog::Record;
/// use dailylog::Severity;
///
/// let (sender, receiver) = dailylog::queue::bounded(2);
/// sender.push(Record::new(Severity::Info, format_args!("first"))).unwrap();
/// sender.push(Record::new(Severity::Info, format_args!("second"))).unwrap();
///
/// let messages = receiver
///     .pop_up_to(receiver.len())
///     .map(|r| r.message().to_string())
///     .collect::<Vec<_>>();
/// assert_eq!(messages, ["first", "second"]);
/// ```
pub fn bounded(capacity: usize) -> (QueueSender, QueueReceiver) {
    let (sender, receiver) = crossbeam_channel::bounded(capacity.max(1));
    (QueueSender { sender }, QueueReceiver { receiver })
}

/// The producing side of the queue. Cheap to clone; every producer holds one.
#[derive(Clone, Debug)]
pub struct QueueSender {
    sender: Sender<Record>,
}

impl QueueSender {
    /// Push a record, blocking while the queue is full.
    ///
    /// # Errors
    ///
    /// Return the record back if the receiving side has been dropped.
    pub fn push(&self, record: Record) -> Result<(), Record> {
        self.sender.send(record).map_err(|err| err.into_inner())
    }

    /// Number of records waiting.
    pub fn len(&self) -> usize {
        self.sender.len()
    }

    /// Whether no record is waiting.
    pub fn is_empty(&self) -> bool {
        self.sender.is_empty()
    }
}

/// The consuming side of the queue, owned by the writer.
#[derive(Debug)]
pub struct QueueReceiver {
    receiver: Receiver<Record>,
}

impl QueueReceiver {
    /// Number of records waiting.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Whether no record is waiting.
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Pop the oldest record without blocking.
    pub fn try_pop(&self) -> Option<Record> {
        self.receiver.try_recv().ok()
    }

    /// Pop at most `n` records in FIFO order, stopping early when the queue runs empty.
    pub fn pop_up_to(&self, n: usize) -> impl Iterator<Item = Record> + '_ {
        self.receiver.try_iter().take(n)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::record::Severity;

    fn record(message: &str) -> Record {
        Record::new(Severity::Info, format_args!("{message}"))
    }

    #[test]
    fn test_fifo_order() {
        let (sender, receiver) = bounded(DEFAULT_CAPACITY);
        for i in 0..10 {
            sender.push(record(&format!("{i}"))).unwrap();
        }
        assert_eq!(receiver.len(), 10);

        let first = receiver.pop_up_to(4).map(|r| r.message().to_string());
        assert_eq!(first.collect::<Vec<_>>(), ["0", "1", "2", "3"]);

        let rest = receiver.pop_up_to(100).map(|r| r.message().to_string());
        assert_eq!(rest.collect::<Vec<_>>(), ["4", "5", "6", "7", "8", "9"]);
        assert!(receiver.is_empty());
        assert!(receiver.try_pop().is_none());
    }

    #[test]
    fn test_push_blocks_when_full() {
        let (sender, receiver) = bounded(1);
        sender.push(record("first")).unwrap();

        let producer = thread::spawn(move || sender.push(record("second")));
        thread::sleep(Duration::from_millis(50));
        assert!(!producer.is_finished());
        assert_eq!(receiver.len(), 1);

        assert_eq!(receiver.try_pop().unwrap().message(), "first");
        producer.join().unwrap().unwrap();
        assert_eq!(receiver.try_pop().unwrap().message(), "second");
    }

    #[test]
    fn test_zero_capacity_still_buffers() {
        let (sender, receiver) = bounded(0);
        sender.push(record("kept")).unwrap();
        assert_eq!(receiver.len(), 1);
    }

    #[test]
    fn test_push_after_receiver_dropped() {
        let (sender, receiver) = bounded(1);
        drop(receiver);
        let record = sender.push(record("lost")).unwrap_err();
        assert_eq!(record.message(), "lost");
    }
}
