//! Codecs for channel messages.
//!
//! - `json`: the JSON wire format, one message per value or per line

pub mod json;

pub use json::{from_json, from_line, to_json, to_line, CodecError};
