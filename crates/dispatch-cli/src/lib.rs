//! Library side of the `ticket-dispatch` binary.

pub mod input;
pub mod logging;
