use crate::pipeline::unit::Unit;
use crate::pipeline::value::{Batch, Value};
use std::collections::VecDeque;

/// Source unit that emits one queued batch per execution, then empty output.
///
/// `set_up` rewinds to the first batch, so a graph can be run again after
/// being dismantled.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    batches: Vec<Batch>,
    pending: VecDeque<Batch>,
}

impl Sequence {
    pub fn new(batches: Vec<Batch>) -> Self {
        Self {
            pending: batches.iter().cloned().collect(),
            batches,
        }
    }

    /// Batches not yet emitted.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl Unit for Sequence {
    fn set_up(&mut self) -> anyhow::Result<()> {
        self.pending = self.batches.iter().cloned().collect();
        Ok(())
    }

    fn process(&mut self, _inputs: &[Value], outputs: &mut Vec<Value>) -> anyhow::Result<()> {
        if let Some(batch) = self.pending.pop_front() {
            outputs.extend(batch.into_inner());
        }
        Ok(())
    }
}
