// tests/support/mocks/util.rs
use academy_core::application::ports::util::CodeGenerator;
use academy_core::domain::activation::CodeValue;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

/// Hands out queued codes first, then `TEST-0001`, `TEST-0002`, ...
#[derive(Debug, Default)]
pub struct QueuedCodeGenerator {
    queue: Mutex<VecDeque<String>>,
    counter: AtomicU32,
}

impl QueuedCodeGenerator {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: Mutex::new(codes.into_iter().map(Into::into).collect()),
            counter: AtomicU32::new(0),
        }
    }
}

impl CodeGenerator for QueuedCodeGenerator {
    fn generate(&self) -> CodeValue {
        if let Some(code) = self.queue.lock().unwrap().pop_front() {
            return CodeValue::from_trusted(code);
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        CodeValue::from_trusted(format!("TEST-{n:04}"))
    }
}
