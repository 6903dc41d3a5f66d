//! Decoding options and the state threaded through one decode.

use crate::error::DecodeError;
use crate::limits::MAX_NESTING_DEPTH;
use crate::registry::TypeRegistry;

/// Options for decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum depth of embedded objects below the top-level entity.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self { max_depth: MAX_NESTING_DEPTH }
    }
}

impl DecodeOptions {
    /// Creates default decoding options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// The registry, limits and current depth of one decode.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'r> {
    registry: &'r TypeRegistry,
    max_depth: usize,
    depth: usize,
}

impl<'r> DecodeContext<'r> {
    pub fn new(registry: &'r TypeRegistry, options: DecodeOptions) -> Self {
        Self {
            registry,
            max_depth: options.max_depth,
            depth: 0,
        }
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Embedding depth; 0 for the top-level entity.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Context for an object embedded one level deeper.
    pub(crate) fn nested(&self) -> Result<Self, DecodeError> {
        if self.depth >= self.max_depth {
            return Err(DecodeError::NestingTooDeep { max: self.max_depth });
        }
        Ok(Self { depth: self.depth + 1, ..*self })
    }
}
