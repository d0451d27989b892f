//! Shape rules for various ONNX operators.
//!
//! Each rule implements [`InferShapes`](crate::InferShapes). Operators with
//! attributes have an adaptor type (eg. [`TransposeAdaptor`]) which gives
//! typed access to them.
//!
//! See the [ONNX operator reference](https://onnx.ai/onnx/operators/index.html)
//! for operator details.

mod binary;
mod layout;
mod reduce;
mod unary;

pub use binary::BinaryOp;
pub use layout::{Transpose, TransposeAdaptor, Unsqueeze, UnsqueezeAdaptor};
pub use reduce::{ReduceAdaptor, ReductionOp};
pub use unary::UnaryOp;
