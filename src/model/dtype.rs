//! Element type descriptors.

use std::fmt;

/// Semantic element type of an attribute or dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DType {
    /// Boolean.
    Bool,
    /// Signed integer of the given byte width.
    Int(usize),
    /// Unsigned integer of the given byte width.
    UInt(usize),
    /// Floating point of the given byte width.
    Float(usize),
    /// Text. `None` length means variable-length.
    String {
        /// Fixed byte length, if any.
        len: Option<usize>,
        /// UTF-8 (true) or ASCII (false).
        unicode: bool,
    },
    /// Anything else, described by the backend.
    Other(String),
}

impl DType {
    /// Whether values of this type can be converted to `f64`.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DType::Bool | DType::Int(_) | DType::UInt(_) | DType::Float(_)
        )
    }

    /// Whether this is a text type.
    pub fn is_string(&self) -> bool {
        matches!(self, DType::String { .. })
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::Bool => write!(f, "bool"),
            DType::Int(bytes) => write!(f, "int{}", bytes * 8),
            DType::UInt(bytes) => write!(f, "uint{}", bytes * 8),
            DType::Float(bytes) => write!(f, "float{}", bytes * 8),
            DType::String { len: Some(n), .. } => write!(f, "|S{}", n),
            DType::String { len: None, .. } => write!(f, "str"),
            DType::Other(desc) => write!(f, "{}", desc),
        }
    }
}
