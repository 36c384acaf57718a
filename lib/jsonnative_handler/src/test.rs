use std::{sync::Arc, thread::ThreadId};

use lazy_static::lazy_static;
use parking_lot::Mutex;

use crate::{Counter, Handler, Log, Storage};

struct Record {
    thread: ThreadId,
    level: log::Level,
    target: String,
    message: String,
}

/// Keeps every record emitted by any test thread.
struct Capture {
    records: Mutex<Vec<Record>>,
}

impl log::Log for Capture {
    fn enabled(&self, _: &log::Metadata) -> bool { true }

    fn log(&self, record: &log::Record) {
        self.records.lock().push(Record {
            thread: std::thread::current().id(),
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        });
    }

    fn flush(&self) {}
}

lazy_static! {
    static ref CAPTURE: Capture = Capture { records: Mutex::new(Vec::new()) };
}

/// Returns `(level, target, message)` of the records `run` emitted on the
/// current thread.
fn logged_by(run: impl FnOnce()) -> Vec<(log::Level, String, String)> {
    if log::set_logger(&*CAPTURE).is_ok() {
        log::set_max_level(log::LevelFilter::Trace);
    }

    let thread = std::thread::current().id();

    run();

    CAPTURE
        .records
        .lock()
        .iter()
        .filter(|record| record.thread == thread)
        .map(|record| {
            (record.level, record.target.clone(), record.message.clone())
        })
        .collect()
}

#[test]
fn storage_keeps_order() {
    let storage = Storage::<String>::new();

    storage.receive("first");
    storage.receive("second".to_string());

    assert_eq!(*storage.as_vec(), vec!["first", "second"]);
    assert_eq!(storage.read().len(), 2);
}

#[test]
fn counter_counts() {
    let counter = Counter::default();

    Handler::<u8>::receive(&counter, 1);
    Handler::<&str>::receive(&counter, "two");

    assert_eq!(counter.count(), 2);
}

#[test]
fn log_emits_one_record() {
    let handler = Log::new(log::Level::Error).with_target("diagnostics");

    assert_eq!(handler.level(), log::Level::Error);
    assert_eq!(handler.target(), "diagnostics");

    let records = logged_by(|| handler.receive("a hook failed"));

    assert_eq!(records, vec![(
        log::Level::Error,
        "diagnostics".to_string(),
        "a hook failed".to_string()
    )]);
}

#[test]
fn log_defaults_to_warnings() {
    let records = logged_by(|| Log::default().receive(42_u32));

    assert_eq!(records, vec![(
        log::Level::Warn,
        "jsonnative".to_string(),
        "42".to_string()
    )]);
}

#[test]
fn handlers_shared_across_threads() {
    let storage = Arc::new(Storage::<usize>::new());
    let handler: Arc<dyn Handler<usize>> = storage.clone();

    let threads = (0..4)
        .map(|index| {
            let handler = Arc::clone(&handler);
            std::thread::spawn(move || handler.receive(index))
        })
        .collect::<Vec<_>>();

    for thread in threads {
        thread.join().unwrap();
    }

    let mut received = storage.as_vec().clone();
    received.sort_unstable();

    assert_eq!(received, vec![0, 1, 2, 3]);
}
