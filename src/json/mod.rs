//! Purpose: JSON text boundary that turns raw input into `Value` trees.
//! Exports: `parse` (recursive-descent parser), `options`, `convert` (serde_json interop).
//! Role: Single seam for decoding so callers never hand-assemble trees from text.
//! Invariants: All decoding goes through `parse::Parser`; options are explicit, no global state.

pub mod convert;
pub mod options;
pub mod parse;
