//! Resource limits applied while decoding.

/// Maximum depth of embedded objects below the top-level entity.
pub const MAX_NESTING_DEPTH: usize = 64;
