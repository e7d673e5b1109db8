//! Purpose: Reference-counted JSON value model plus the parser that builds it.
//! Exports: `core` (value store, errors, number formatting) and `json` (parser, options, interop).
//! Role: Library crate; there is no binary or presentation layer.
//! Invariants: Value handles are single-threaded (`Rc`-backed); trees never cross threads.
//! Invariants: Parsing yields a complete tree or a positional error, never a partial tree.
pub mod core;
pub mod json;

pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::value::{FromValue, Kind, Value};
pub use crate::json::options::ParseOptions;
pub use crate::json::parse::{Parser, parse_json, parse_json_with};
