use crate::pipeline::unit::Unit;
use crate::pipeline::value::Value;

/// Copies every input value to the output unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Unit for Passthrough {
    fn process(&mut self, inputs: &[Value], outputs: &mut Vec<Value>) -> anyhow::Result<()> {
        outputs.extend_from_slice(inputs);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copies_input() {
        let mut unit = Passthrough;
        let mut out = vec![Value::Null];
        unit.process(&[Value::Int(1), Value::from("x")], &mut out).unwrap();
        assert_eq!(out, vec![Value::Null, Value::Int(1), Value::from("x")]);
    }
}
