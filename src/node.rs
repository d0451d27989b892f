use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::attrs::Attrs;
use crate::types::TensorType;

/// Identity of an [`OperatorNode`] instance.
///
/// IDs are allocated from a process-wide counter when a node is created, so
/// no two live nodes share an ID, even if they have the same name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn next() -> NodeId {
        static NEXT_ID: AtomicU32 = AtomicU32::new(0);
        NodeId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Return the underlying u32 value of the ID.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An operator instance whose output types are inferred.
///
/// This holds what the inference driver needs to know about an operator: its
/// type tag, which selects the shape rule, its attributes and a slot for the
/// type of each of its results. A slot is `None` until a type has been
/// inferred for it.
///
/// Operand types are not stored here. They are the result types of whichever
/// instances produce the operands, and are passed to the driver separately.
///
/// Cloning a node creates a new instance with a new [`NodeId`].
#[derive(Debug)]
pub struct OperatorNode {
    id: NodeId,
    name: Option<String>,
    op_type: String,
    attrs: Attrs,
    outputs: Box<[Option<TensorType>]>,
}

impl OperatorNode {
    pub fn new(op_type: &str, name: Option<&str>, attrs: Attrs, num_outputs: usize) -> Self {
        OperatorNode {
            id: NodeId::next(),
            name: name.map(|s| s.to_owned()),
            op_type: op_type.to_owned(),
            attrs,
            outputs: vec![None; num_outputs].into(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Return the name to use for this operator in errors and diagnostics.
    ///
    /// This is the operator's name if it has one, or its type otherwise.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.op_type)
    }

    pub fn op_type(&self) -> &str {
        &self.op_type
    }

    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    pub fn attrs_mut(&mut self) -> &mut Attrs {
        &mut self.attrs
    }

    /// Types of the operator's results, or `None` for results whose type has
    /// not been inferred.
    pub fn outputs(&self) -> &[Option<TensorType>] {
        &self.outputs
    }

    pub fn output(&self, index: usize) -> Option<&TensorType> {
        self.outputs.get(index)?.as_ref()
    }

    /// Replace the types of all results.
    ///
    /// `types` must have one entry per result slot.
    pub(crate) fn set_outputs(&mut self, types: impl IntoIterator<Item = TensorType>) {
        for (slot, ty) in self.outputs.iter_mut().zip(types) {
            *slot = Some(ty);
        }
    }
}

impl Clone for OperatorNode {
    fn clone(&self) -> Self {
        OperatorNode {
            id: NodeId::next(),
            name: self.name.clone(),
            op_type: self.op_type.clone(),
            attrs: self.attrs.clone(),
            outputs: self.outputs.clone(),
        }
    }
}
