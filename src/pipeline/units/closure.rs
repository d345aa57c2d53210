use crate::pipeline::unit::Unit;
use crate::pipeline::value::Value;

/// Unit whose `process` step is a closure. Set-up and dismantling are no-ops.
pub struct FnUnit<F> {
    f: F,
}

impl<F> FnUnit<F>
where
    F: FnMut(&[Value], &mut Vec<Value>) -> anyhow::Result<()> + Send,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Unit for FnUnit<F>
where
    F: FnMut(&[Value], &mut Vec<Value>) -> anyhow::Result<()> + Send,
{
    fn process(&mut self, inputs: &[Value], outputs: &mut Vec<Value>) -> anyhow::Result<()> {
        (self.f)(inputs, outputs)
    }
}

impl<F> std::fmt::Debug for FnUnit<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnUnit").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_keeps_state() {
        let mut calls = 0;
        let mut unit = FnUnit::new(move |_: &[Value], out: &mut Vec<Value>| {
            calls += 1;
            out.push(Value::Int(calls));
            Ok(())
        });

        let mut out = Vec::new();
        unit.process(&[], &mut out).unwrap();
        unit.process(&[], &mut out).unwrap();
        assert_eq!(out, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_closure_error_is_returned() {
        let mut unit = FnUnit::new(|_: &[Value], _: &mut Vec<Value>| anyhow::bail!("rejected"));
        let err = unit.process(&[], &mut Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "rejected");
    }
}
