//! Processing units, the work wrapped by plain nodes.
//!
//! The engine never inspects what a unit does. It only calls the three
//! lifecycle hooks below, and it owns every unit in the graph arena so that
//! a unit is identified by its `UnitId` no matter how many nodes wrap it.

use crate::pipeline::value::Value;

/// Trait for pluggable processing units.
#[cfg_attr(test, mockall::automock)]
pub trait Unit: Send {
    /// Called once per distinct unit by the setting-up visitor.
    fn set_up(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called for every fetched input batch. `inputs` is the merged input of
    /// all predecessors that had data; results are appended to `outputs`.
    fn process(&mut self, inputs: &[Value], outputs: &mut Vec<Value>) -> anyhow::Result<()>;

    /// Called once per distinct unit by the dismantling visitor.
    /// Units need not be idempotent here; the visitor deduplicates.
    fn dismantle(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Arena slot holding a unit and its display name.
pub struct UnitSlot {
    pub name: String,
    pub unit: Box<dyn Unit>,
}

impl UnitSlot {
    pub fn new(name: impl Into<String>, unit: Box<dyn Unit>) -> Self {
        Self {
            name: name.into(),
            unit,
        }
    }
}

impl std::fmt::Debug for UnitSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitSlot").field("name", &self.name).finish()
    }
}
