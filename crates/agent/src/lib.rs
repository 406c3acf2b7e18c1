//! The Cogwork agent loop.
//!
//! An [`Agent`] drives an iterative cycle over a model gateway and a tool
//! catalog:
//!
//! 1. **Prompt** — instructions + recent conversation + advertised tools +
//!    the current input
//! 2. **Generate** — call the backend with the enabled tool descriptors
//! 3. **If tool calls**: dispatch them in order, feed the formatted results
//!    back as the next iteration's input
//! 4. **If text**: record the assistant turn and return the answer
//!
//! The cycle ends with a final text answer or, once the iteration bound is
//! reached without one, with [`MaxIterationsExceeded`]. Gateway failures
//! abort the run immediately; individual tool failures never do.
//!
//! [`MaxIterationsExceeded`]: cogwork_core::Error::MaxIterationsExceeded

pub mod agent;
pub mod augmented;

pub use agent::Agent;
pub use augmented::AugmentedGateway;

#[cfg(test)]
pub(crate) mod test_helpers;
