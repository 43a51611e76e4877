//! Recording sink for tests and dry runs

use super::{ControllerSink, ControllerSnapshot};
use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::sync::Arc;

/// Mock sink recording every published snapshot
#[derive(Clone)]
pub struct MockSink {
    inner: Arc<Mutex<MockSinkInner>>,
}

struct MockSinkInner {
    published: Vec<ControllerSnapshot>,
    detached: bool,
    fail_publish: bool,
}

impl MockSink {
    pub fn new() -> Self {
        MockSink {
            inner: Arc::new(Mutex::new(MockSinkInner {
                published: Vec::new(),
                detached: false,
                fail_publish: false,
            })),
        }
    }

    /// A sink whose publish calls fail, for fatal-path tests
    pub fn failing() -> Self {
        let sink = Self::new();
        sink.inner.lock().fail_publish = true;
        sink
    }

    /// All snapshots published so far
    pub fn published(&self) -> Vec<ControllerSnapshot> {
        self.inner.lock().published.clone()
    }

    /// Most recently published snapshot
    pub fn last(&self) -> Option<ControllerSnapshot> {
        self.inner.lock().published.last().copied()
    }

    pub fn detached(&self) -> bool {
        self.inner.lock().detached
    }
}

impl ControllerSink for MockSink {
    fn publish(&mut self, snapshot: &ControllerSnapshot) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.fail_publish {
            return Err(Error::DevicePublish("mock sink failure".to_string()));
        }
        inner.published.push(*snapshot);
        Ok(())
    }

    fn detach(&mut self) -> Result<()> {
        self.inner.lock().detached = true;
        Ok(())
    }
}

impl Default for MockSink {
    fn default() -> Self {
        Self::new()
    }
}
