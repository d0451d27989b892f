//! Shape inference and verification for tensor computation graphs.
//!
//! # About shape inference
//!
//! Operators in a tensor graph produce results whose shapes depend on the
//! shapes of their operands and on their attributes. Shape inference computes
//! the type of each operator's results, so that later passes (optimization,
//! memory planning, code generation) know the shape of every value without
//! running the graph. Some sizes, such as the batch size of a model's input,
//! are not known until the graph runs. These are represented as named
//! symbols, which are propagated through operators so that it is still known
//! when two values share the same unknown size.
//!
//! Before an operator's result types are inferred, it is _verified_: its
//! attributes are checked against its operands, and structurally invalid
//! operators are rejected with a reason that identifies the offending
//! attribute element.
//!
//! As an example, transposing a value of type `("batch", 3, 5)` with
//! `perm = [0, 2, 1]` produces `("batch", 5, 3)`. If `perm` is not set, the
//! dimensions are reversed and the operator is updated to record the reversed
//! order. `perm = [0, 3, 1]` is rejected, because 3 is not a dimension of the
//! input.
//!
//! # Crate overview
//!
//! - [`InferShapes`] is implemented by each shape rule. It has a method to
//!   verify an operator and a method to compute its output types.
//! - [`OpAdaptor`] gives rules read-only access to an operator's operand types
//!   and attributes.
//! - [`ShapeRegistry`] maps operator types to rules. The rules for built-in
//!   operators are in the [`ops`] module.
//! - [`ShapeInference`] is the driver which verifies an operator, runs its
//!   rule and installs the results on an [`OperatorNode`].
//!
//! ```
//! use shape_infer::{Attrs, DataType, Dimension, OperatorNode, ShapeInference, TensorType};
//!
//! let driver = ShapeInference::with_all_ops();
//! let input = TensorType::new(
//!     DataType::Float,
//!     vec![Dimension::from("batch"), Dimension::from(3), Dimension::from(5)],
//! );
//! let mut node = OperatorNode::new("Transpose", Some("transpose"), Attrs::new(), 1);
//! driver.infer(&mut node, &[input]).unwrap();
//!
//! let output = node.output(0).unwrap();
//! assert_eq!(output.to_string(), "tensor<5x3x?xf32>");
//! ```
//!
//! # Environment variables
//!
//! [`InferOptions::from_env`] reads these variables:
//!
//! - `SHAPE_INFER_VERIFY` - Enable or disable verification (eg. `1` or `0`)
//! - `SHAPE_INFER_DIAGNOSTICS` - Report inference outcomes to stderr. One of
//!   `off`, `warn` or `info`.

mod adaptor;
mod attrs;
mod diagnostics;
mod dim;
mod driver;
mod env;
mod infer_shapes;
mod node;
mod options;
mod registry;
mod types;

#[cfg(feature = "serde")]
mod impl_serialize;

pub mod ops;

pub use adaptor::OpAdaptor;
pub use attrs::{Attr, AttrError, Attrs};
pub use diagnostics::DiagnosticLevel;
pub use dim::{Dimension, SymbolGen};
pub use driver::{InferError, InferJob, InferOutcome, ShapeInference};
pub use infer_shapes::{
    DefaultAttr, InferShapes, InferShapesError, InferredShapes, ShapeOutcome, VerifyError,
    check_unique_axes, resolve_axes, resolve_index,
};
pub use node::{NodeId, OperatorNode};
pub use options::InferOptions;
pub use registry::ShapeRegistry;
pub use types::{DataType, Dims, TensorType};
