//! Stub backend shared by the unit and integration tests.
//!
//! `StubConnection` answers the three call shapes from maps. Its counters
//! live behind an `Arc` so tests can observe them after the connection has
//! moved into a loader, and `restart_server` invalidates every handle
//! prepared so far, the way a dropped database session would.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use dbsource_core::prelude::*;

#[derive(Debug, Default)]
pub struct Counters {
    pub prepared: AtomicUsize,
    pub closed: AtomicUsize,
    pub executed: AtomicUsize,
    pub resolve_calls: AtomicUsize,
    pub load_calls: AtomicUsize,
    pub check_calls: AtomicUsize,
    pub reentries: AtomicUsize,
    generation: AtomicU64,
    in_flight: AtomicBool,
}

impl Counters {
    pub fn prepared(&self) -> usize {
        self.prepared.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    /// Every `execute`, including failed ones.
    pub fn executed(&self) -> usize {
        self.executed.load(Ordering::SeqCst)
    }

    /// Calls the backend answered.
    pub fn backend_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
            + self.load_calls.load(Ordering::SeqCst)
            + self.check_calls.load(Ordering::SeqCst)
    }

    pub fn reentries(&self) -> usize {
        self.reentries.load(Ordering::SeqCst)
    }

    /// Invalidate all handles prepared before now.
    pub fn restart_server(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct StubHandle {
    pub descriptor: String,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct StubConnection {
    locators: HashMap<String, String>,
    bodies: HashMap<String, String>,
    timestamps: HashMap<String, i64>,
    failing: HashSet<String>,
    fail_prepare: bool,
    fail_close: bool,
    latency: Option<Duration>,
    counters: Arc<Counters>,
}

impl StubConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn template(mut self, name: &str, locator: &str, body: &str) -> Self {
        self.locators.insert(name.into(), locator.into());
        self.bodies.insert(locator.into(), body.into());
        self
    }

    pub fn timestamp(mut self, locator: &str, millis: i64) -> Self {
        self.timestamps.insert(locator.into(), millis);
        self
    }

    pub fn fail_on(mut self, input: &str) -> Self {
        self.failing.insert(input.into());
        self
    }

    pub fn fail_prepare(mut self) -> Self {
        self.fail_prepare = true;
        self
    }

    pub fn fail_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn counters(&self) -> Arc<Counters> {
        Arc::clone(&self.counters)
    }

    fn run(&self, input: &str, output: OutParam) -> Result<OutValue, BackendError> {
        if self.failing.contains(input) {
            return Err(io::Error::other(format!("ORA-20001: backend rejected '{input}'")).into());
        }
        Ok(match output {
            OutParam::Text => {
                self.counters.resolve_calls.fetch_add(1, Ordering::SeqCst);
                OutValue::Text(self.locators.get(input).cloned())
            }
            OutParam::Characters => {
                self.counters.load_calls.fetch_add(1, Ordering::SeqCst);
                OutValue::Characters(self.bodies.get(input).cloned().map(SourceReader::from_string))
            }
            OutParam::Integer => {
                self.counters.check_calls.fetch_add(1, Ordering::SeqCst);
                OutValue::Integer(self.timestamps.get(input).copied())
            }
        })
    }
}

impl Connection for StubConnection {
    type Handle = StubHandle;

    fn prepare_call(&mut self, descriptor: &CallDescriptor) -> Result<StubHandle, BackendError> {
        if self.fail_prepare {
            return Err(io::Error::other("prepare failed").into());
        }
        self.counters.prepared.fetch_add(1, Ordering::SeqCst);
        Ok(StubHandle {
            descriptor: descriptor.as_str().to_string(),
            generation: self.counters.generation.load(Ordering::SeqCst),
        })
    }

    fn execute(
        &mut self,
        handle: &mut StubHandle,
        input: &str,
        output: OutParam,
    ) -> Result<OutValue, BackendError> {
        self.counters.executed.fetch_add(1, Ordering::SeqCst);
        if self.counters.in_flight.swap(true, Ordering::SeqCst) {
            self.counters.reentries.fetch_add(1, Ordering::SeqCst);
            return Err(io::Error::other("connection re-entered during a call").into());
        }
        if let Some(latency) = self.latency {
            thread::sleep(latency);
        }

        let result = if handle.generation != self.counters.generation.load(Ordering::SeqCst) {
            Err(io::Error::other("prepared statement does not exist").into())
        } else {
            self.run(input, output)
        };

        self.counters.in_flight.store(false, Ordering::SeqCst);
        result
    }

    fn close_call(&mut self, _handle: StubHandle) -> Result<(), BackendError> {
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(io::Error::other("connection closed").into());
        }
        Ok(())
    }
}

pub fn calls(check: Option<&str>) -> LoaderCalls {
    LoaderCalls::new(
        "SELECT template_api.find_template($1)",
        "SELECT template_api.load_template($1)",
        check,
    )
    .expect("valid calls")
}

pub fn locator(s: &str) -> Locator {
    Locator::new(s).expect("non-empty locator")
}
