//! XML Reader Module
//!
//! - SliceReader: zero-copy pull parser over a byte slice
//! - Events: XML event types produced by the reader

pub mod events;
pub mod slice;
