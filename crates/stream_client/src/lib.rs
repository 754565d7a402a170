//! # Stream Client
//!
//! Consumer-side counterpart of the broadcaster: a non-blocking, buffering,
//! fault-tolerant reader for the newline-delimited control stream.
//!
//! The reader is deliberately synchronous over a non-blocking socket: it is
//! called once per iteration of the consumer's own loop (a render/physics
//! tick) and must complete in bounded time without hosting an async runtime.
//! `poll()` never fails the caller: when no new data has arrived, when a line
//! is malformed, or when the connection is gone, it returns the most recently
//! decoded message (fail-static), or the zero-speed default before any
//! message has ever been received.

mod error;
mod reader;

pub use error::ClientError;
pub use reader::StreamReader;
