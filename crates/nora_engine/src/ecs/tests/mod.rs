//! Scheduler integration tests
//!
//! Components here record their calls into a shared log so tests can assert
//! on exact dispatch order.

mod mutation_during_tick;

use std::cell::RefCell;
use std::rc::Rc;

use super::{Component, ComponentError, Context};

pub(super) type CallLog = Rc<RefCell<Vec<String>>>;

pub(super) fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub(super) fn entries(log: &CallLog) -> Vec<String> {
    log.borrow().clone()
}

/// Logs `<label>.start` and `<label>.update`
pub(super) struct Recorder {
    pub label: &'static str,
    pub log: CallLog,
}

impl Recorder {
    pub fn new(label: &'static str, log: &CallLog) -> Self {
        Self { label, log: Rc::clone(log) }
    }

    fn record(&self, hook: &str) {
        self.log.borrow_mut().push(format!("{}.{}", self.label, hook));
    }
}

impl Component for Recorder {
    fn start(&mut self, _ctx: &mut Context<'_>) -> Result<(), ComponentError> {
        self.record("start");
        Ok(())
    }

    fn update(&mut self, _ctx: &mut Context<'_>) -> Result<(), ComponentError> {
        self.record("update");
        Ok(())
    }
}
