//! Typed, read-only access to an operator's operands and attributes.

use crate::attrs::{Attr, AttrError, Attrs};
use crate::types::TensorType;

/// Read-only view of an operator instance's operand types and attributes.
///
/// Shape rules read their inputs through this type rather than directly from
/// the operator, so they don't depend on how attributes are stored. Accessors
/// are pure projections. They check that a value has the expected type, but
/// do not validate it. Operator-specific adaptors (eg.
/// [`TransposeAdaptor`](crate::ops::TransposeAdaptor)) wrap this to expose
/// each attribute the operator defines.
#[derive(Clone, Copy)]
pub struct OpAdaptor<'a> {
    inputs: &'a [TensorType],
    attrs: &'a Attrs,
}

impl<'a> OpAdaptor<'a> {
    pub fn new(inputs: &'a [TensorType], attrs: &'a Attrs) -> Self {
        OpAdaptor { inputs, attrs }
    }

    /// Types of all operands, in order.
    pub fn inputs(&self) -> &'a [TensorType] {
        self.inputs
    }

    /// Get the type of the `index`th operand, if present.
    pub fn input(&self, index: usize) -> Option<&'a TensorType> {
        self.inputs.get(index)
    }

    pub fn attrs(&self) -> &'a Attrs {
        self.attrs
    }

    /// Get an optional integer attribute.
    pub fn get_int(&self, name: &str) -> Result<Option<i64>, AttrError> {
        match self.attrs.get(name) {
            None => Ok(None),
            Some(Attr::Int(val)) => Ok(Some(*val)),
            Some(other) => Err(wrong_type(name, "int", other)),
        }
    }

    /// Get an optional integer attribute, or `default` if it is not set.
    pub fn get_int_or(&self, name: &str, default: i64) -> Result<i64, AttrError> {
        self.get_int(name).map(|val| val.unwrap_or(default))
    }

    /// Get an optional integer list attribute.
    pub fn get_ints(&self, name: &str) -> Result<Option<&'a [i64]>, AttrError> {
        match self.attrs.get(name) {
            None => Ok(None),
            Some(Attr::Ints(vals)) => Ok(Some(vals.as_slice())),
            Some(other) => Err(wrong_type(name, "ints", other)),
        }
    }

    /// Get a required integer list attribute.
    pub fn require_ints(&self, name: &str) -> Result<&'a [i64], AttrError> {
        self.get_ints(name)?.ok_or_else(|| AttrError::Missing {
            name: name.to_string(),
        })
    }
}

fn wrong_type(name: &str, expected: &'static str, actual: &Attr) -> AttrError {
    AttrError::WrongType {
        name: name.to_string(),
        expected,
        actual: actual.type_name(),
    }
}
