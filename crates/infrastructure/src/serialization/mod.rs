//! JSON helpers for files the client writes to disk.
//!
//! Output is pretty-printed with 2-space indentation and a trailing newline;
//! key order follows the source type (use `BTreeMap` for sorted keys).

mod json;

pub use json::{SerializationError, from_json_bytes, to_json_stable, to_json_stable_bytes};
