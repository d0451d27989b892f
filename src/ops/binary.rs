use std::iter::repeat_n;

use crate::adaptor::OpAdaptor;
use crate::dim::{Dimension, SymbolGen};
use crate::infer_shapes::{InferShapes, InferShapesError, InferredShapes, ShapeOutcome};
use crate::types::Dims;

/// Shape inference for binary elementwise operators.
///
/// These operators take two inputs and return an output whose shape is the
/// result of broadcasting the two input shapes together following ONNX's
/// [broadcasting rules](https://onnx.ai/onnx/repo-docs/Broadcasting.html).
/// Both inputs must have the same element type.
///
/// Used for operators such as `Add`, `Sub`, `Mul`, `Div` and `Pow`.
#[derive(Default)]
pub struct BinaryOp;

impl InferShapes for BinaryOp {
    fn infer_shapes(
        &self,
        op: &OpAdaptor,
        sym_gen: &mut SymbolGen,
    ) -> Result<ShapeOutcome, InferShapesError> {
        let [a, b] = op.inputs() else {
            return Err(InferShapesError::IncorrectInputCount);
        };

        if a.dtype() != b.dtype() {
            return Err(InferShapesError::IncompatibleTypes);
        }

        let (Some(a_dims), Some(b_dims)) = (a.dims(), b.dims()) else {
            return Ok(ShapeOutcome::Deferred);
        };

        let a_pad = b_dims.len().saturating_sub(a_dims.len());
        let b_pad = a_dims.len().saturating_sub(b_dims.len());
        let one = Dimension::Fixed(1);

        let a_iter = repeat_n(&one, a_pad).chain(a_dims);
        let b_iter = repeat_n(&one, b_pad).chain(b_dims);

        let mut out_dims = Dims::with_capacity(a_pad + a_dims.len());
        for (a, b) in a_iter.zip(b_iter) {
            let dim = match (a, b) {
                (a, b) if a == b => a.clone(),

                // If either size is 1, it will be broadcast against the other
                // size.
                (Dimension::Fixed(1), b) => b.clone(),
                (a, Dimension::Fixed(1)) => a.clone(),

                // If both sizes are fixed and different, we know execution
                // will fail.
                (Dimension::Fixed(_), Dimension::Fixed(_)) => {
                    return Err(InferShapesError::IncompatibleShapes);
                }

                // Execution can only succeed if the symbolic dim has the same
                // size as the fixed one.
                (Dimension::Symbolic(_), Dimension::Fixed(size))
                | (Dimension::Fixed(size), Dimension::Symbolic(_)) => Dimension::Fixed(*size),

                // Two different unknown sizes. The result is whichever is not
                // 1, which can't be expressed as either input dim.
                (Dimension::Symbolic(_), Dimension::Symbolic(_)) => sym_gen.gen_dim(),
            };
            out_dims.push(dim);
        }

        Ok(ShapeOutcome::Computed(InferredShapes::single(
            a.with_dims(out_dims),
        )))
    }
}
