//! Purpose: Parser configuration knobs.
//! Exports: `ParseOptions`.
//! Role: Explicit, copyable settings handed to `Parser`; no global or environment lookup.
//! Invariants: Defaults reproduce the permissive parser (trailing content ignored, NaN strings on).

/// Default nesting limit; matches serde_json's recursion limit.
pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParseOptions {
    /// Maximum container nesting before the parse fails with `ErrorKind::DepthLimit`.
    pub max_depth: usize,
    /// Ignore content after the top-level value.
    pub allow_trailing: bool,
    /// Treat the quoted tokens `"nan"` and `"-nan"` as NaN numbers.
    pub nan_strings: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_trailing: true,
            nan_strings: true,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_allow_trailing(mut self, allow_trailing: bool) -> Self {
        self.allow_trailing = allow_trailing;
        self
    }

    pub fn with_nan_strings(mut self, nan_strings: bool) -> Self {
        self.nan_strings = nan_strings;
        self
    }
}
