//! Audio I/O boundary types
//!
//! Decoding lives outside this crate; analysis consumes an already-decoded
//! mono sample buffer.

pub mod sample_buffer;
