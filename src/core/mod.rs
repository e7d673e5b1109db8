// Core modules implementing the value store, parse errors, and number rendering.
pub mod error;
pub mod format;
pub mod value;
