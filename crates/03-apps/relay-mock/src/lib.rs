//! Message relay test double and the message-log consumers driven by it.
//!
//! The relay stands in for a socket-like integration that delivers messages
//! from outside the scheduler. The consumers append every message to a list
//! held in scheduler state and record each `(current, next)` transition so
//! tests can check which state a handler actually saw.

mod consumers;
mod relay;

pub use consumers::{BridgedMessageLog, Messages, StaleMessageLog, StateTransition, TransitionLog};
pub use relay::RelayMock;
