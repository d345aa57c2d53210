//! Mock construction helpers

use dataflow_rs::{Unit, Value};
use mockall::mock;

mock! {
    pub LifecycleUnit {}

    impl Unit for LifecycleUnit {
        fn set_up(&mut self) -> anyhow::Result<()>;
        fn process(&mut self, inputs: &[Value], outputs: &mut Vec<Value>) -> anyhow::Result<()>;
        fn dismantle(&mut self) -> anyhow::Result<()>;
    }
}

/// A unit expecting exactly one `set_up` and one `dismantle`, and any number
/// of `process` calls that copy input to output.
pub fn lifecycle_once() -> MockLifecycleUnit {
    let mut unit = MockLifecycleUnit::new();
    unit.expect_set_up().times(1).returning(|| Ok(()));
    unit.expect_dismantle().times(1).returning(|| Ok(()));
    unit.expect_process().returning(|inputs, outputs| {
        outputs.extend_from_slice(inputs);
        Ok(())
    });
    unit
}
