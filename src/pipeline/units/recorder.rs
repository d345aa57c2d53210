use crate::pipeline::unit::Unit;
use crate::pipeline::value::{Batch, Value};
use std::sync::{Arc, Mutex, MutexGuard};

/// Sink unit storing every input it is given. Emits nothing.
///
/// The recorded batches are read through a [`RecorderHandle`], which stays
/// usable after the recorder has been moved into a graph.
#[derive(Debug, Default)]
pub struct Recorder {
    batches: Arc<Mutex<Vec<Batch>>>,
}

impl Recorder {
    /// Create a recorder and a handle onto its storage.
    pub fn new() -> (Self, RecorderHandle) {
        let recorder = Self::default();
        let handle = recorder.handle();
        (recorder, handle)
    }

    pub fn handle(&self) -> RecorderHandle {
        RecorderHandle {
            batches: Arc::clone(&self.batches),
        }
    }
}

impl Unit for Recorder {
    fn process(&mut self, inputs: &[Value], _outputs: &mut Vec<Value>) -> anyhow::Result<()> {
        lock(&self.batches).push(Batch::from(inputs.to_vec()));
        Ok(())
    }
}

/// Shared read access to a [`Recorder`]'s storage.
#[derive(Debug, Clone)]
pub struct RecorderHandle {
    batches: Arc<Mutex<Vec<Batch>>>,
}

impl RecorderHandle {
    /// Copy of every recorded input, oldest first.
    pub fn batches(&self) -> Vec<Batch> {
        lock(&self.batches).clone()
    }

    /// Every recorded value, flattened.
    pub fn values(&self) -> Vec<Value> {
        lock(&self.batches)
            .iter()
            .flat_map(|batch| batch.iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.batches).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.batches).is_empty()
    }

    pub fn clear(&self) {
        lock(&self.batches).clear();
    }
}

// A panic while holding the lock leaves the vector intact.
fn lock(batches: &Mutex<Vec<Batch>>) -> MutexGuard<'_, Vec<Batch>> {
    batches.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
