//! Generic plumbing units.
//!
//! These carry no business logic. They exist to wire graphs together, feed
//! them and observe what comes out:
//!
//! - [`Passthrough`]: copies its input to its output.
//! - [`FnUnit`]: wraps a closure as the `process` step.
//! - [`Sequence`]: a source emitting a fixed list of batches.
//! - [`Recorder`]: a sink storing every input it sees behind a shared handle.

mod closure;
mod passthrough;
mod recorder;
mod sequence;

pub use closure::FnUnit;
pub use passthrough::Passthrough;
pub use recorder::{Recorder, RecorderHandle};
pub use sequence::Sequence;
