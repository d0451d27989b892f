//! Tensor dimension sizes and symbol generation.

use std::borrow::Cow;
use std::fmt;

/// Size of a single tensor dimension.
///
/// A dimension is either a static extent that is known at compile time, or a
/// named symbol that stands for an extent that is unknown until the graph
/// runs. Symbols give unknown dimensions an identity: two symbolic dimensions
/// are equal only if they carry the same symbol, meaning they are the same
/// unknown extent. Distinct unknown dimensions never compare equal.
#[derive(Clone, Eq, Hash, PartialEq)]
pub enum Dimension {
    /// A dimension with a size that is known statically.
    Fixed(usize),

    /// A dimension whose size is determined at runtime. The symbol identifies
    /// when different values share a size.
    Symbolic(String),
}

impl Dimension {
    /// Return the size of this dimension if it is statically known.
    pub fn fixed(&self) -> Option<usize> {
        match self {
            Self::Fixed(size) => Some(*size),
            Self::Symbolic(_) => None,
        }
    }

    /// Return the symbol name if this dimension is symbolic.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Self::Fixed(_) => None,
            Self::Symbolic(name) => Some(name),
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }
}

impl From<usize> for Dimension {
    fn from(val: usize) -> Dimension {
        Dimension::Fixed(val)
    }
}

impl From<String> for Dimension {
    fn from(name: String) -> Dimension {
        Dimension::Symbolic(name)
    }
}

impl<'a> From<&'a str> for Dimension {
    fn from(name: &'a str) -> Dimension {
        Dimension::Symbolic(name.into())
    }
}

impl fmt::Debug for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(size) => write!(f, "{}", size),
            Self::Symbolic(name) => write!(f, "\"{}\"", name),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(size) => write!(f, "{}", size),
            Self::Symbolic(name) => write!(f, "{}", name),
        }
    }
}

/// Generates fresh symbolic dimensions.
///
/// Shape rules use this when an output dimension is unknown and cannot be
/// expressed as one of the input dimensions. The generated names are
/// `{prefix}_{n}` with `n` counting up from 1, so two generators with the same
/// prefix produce the same sequence. The inference driver creates one
/// generator per operator invocation, using the operator's name and ID as the
/// prefix, which keeps repeated inference of the same operator deterministic.
pub struct SymbolGen {
    prefix: Cow<'static, str>,
    next_symbol_id: u32,
}

impl Default for SymbolGen {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolGen {
    pub fn new() -> Self {
        Self::with_prefix("unknown".into())
    }

    pub fn with_prefix(prefix: Cow<'static, str>) -> Self {
        Self {
            prefix,
            next_symbol_id: 0,
        }
    }

    /// Generate a new symbolic dimension.
    pub fn gen_dim(&mut self) -> Dimension {
        self.next_symbol_id += 1;
        Dimension::Symbolic(format!("{}_{}", self.prefix, self.next_symbol_id))
    }
}
