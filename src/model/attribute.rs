//! Attributes: small named metadata values attached to items.

use std::fmt;

use super::DType;

/// Materialized attribute payload, flattened in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Booleans.
    Bool(Vec<bool>),
    /// Signed integers.
    Int(Vec<i64>),
    /// Unsigned integers.
    UInt(Vec<u64>),
    /// Floating point values.
    Float(Vec<f64>),
    /// Strings.
    Text(Vec<String>),
    /// Value the backend could not decode; holds a description instead.
    Opaque(String),
}

impl AttrValue {
    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            AttrValue::Bool(v) => v.len(),
            AttrValue::Int(v) => v.len(),
            AttrValue::UInt(v) => v.len(),
            AttrValue::Float(v) => v.len(),
            AttrValue::Text(v) => v.len(),
            AttrValue::Opaque(_) => 1,
        }
    }

    /// Whether there are no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type derived from the runtime value, used when the container
    /// supplies no descriptor of its own.
    pub fn runtime_dtype(&self) -> DType {
        match self {
            AttrValue::Bool(_) => DType::Bool,
            AttrValue::Int(_) => DType::Int(8),
            AttrValue::UInt(_) => DType::UInt(8),
            AttrValue::Float(_) => DType::Float(8),
            AttrValue::Text(_) => DType::String {
                len: None,
                unicode: true,
            },
            AttrValue::Opaque(_) => DType::Other("opaque".to_string()),
        }
    }

    /// The single string, if this is one string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(v) if v.len() == 1 => Some(&v[0]),
            _ => None,
        }
    }

    /// The single value as `f64`, if this is one number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Int(v) if v.len() == 1 => Some(v[0] as f64),
            AttrValue::UInt(v) if v.len() == 1 => Some(v[0] as f64),
            AttrValue::Float(v) if v.len() == 1 => Some(v[0]),
            _ => None,
        }
    }
}

fn write_list<T: fmt::Debug>(f: &mut fmt::Formatter<'_>, v: &[T]) -> fmt::Result {
    if v.len() == 1 {
        write!(f, "{:?}", v[0])
    } else {
        write!(f, "{:?}", v)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(v) => write_list(f, v),
            AttrValue::Int(v) => write_list(f, v),
            AttrValue::UInt(v) => write_list(f, v),
            AttrValue::Float(v) => write_list(f, v),
            AttrValue::Text(v) => write_list(f, v),
            AttrValue::Opaque(desc) => write!(f, "<{}>", desc),
        }
    }
}

/// A named value attached to an item.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Attribute name. Not required to be unique on an item.
    pub name: String,
    /// Extents; empty for scalars.
    pub shape: Vec<usize>,
    /// Element type.
    pub dtype: DType,
    /// Eagerly read value.
    pub data: AttrValue,
}

impl Attribute {
    /// Create an attribute with an explicit descriptor.
    pub fn new(name: impl Into<String>, shape: Vec<usize>, dtype: DType, data: AttrValue) -> Self {
        Self {
            name: name.into(),
            shape,
            dtype,
            data,
        }
    }

    /// Create an attribute from a plain value without a descriptor.
    ///
    /// Shape is the value's length and dtype its runtime type; a single
    /// string counts as its character length, the way a plain text value
    /// reports its size.
    pub fn from_value(name: impl Into<String>, data: AttrValue) -> Self {
        let len = match data.as_str() {
            Some(s) => s.chars().count(),
            None => data.len(),
        };
        let dtype = data.runtime_dtype();
        Self::new(name, vec![len], dtype, data)
    }

    /// Whether the value is a scalar.
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.data)
    }
}
