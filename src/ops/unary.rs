use crate::adaptor::OpAdaptor;
use crate::dim::SymbolGen;
use crate::infer_shapes::{InferShapes, InferShapesError, InferredShapes, ShapeOutcome};

/// Shape inference for unary elementwise operators.
///
/// The output has the same type as the input. Unlike most rules this one
/// does not need to know the input's rank. An unranked input produces an
/// unranked output.
///
/// Used for operators such as `Identity`, `Relu`, `Neg`, `Sigmoid`, `Tanh`,
/// `Exp` and `Sqrt`.
#[derive(Default)]
pub struct UnaryOp;

impl InferShapes for UnaryOp {
    fn infer_shapes(
        &self,
        op: &OpAdaptor,
        _sym_gen: &mut SymbolGen,
    ) -> Result<ShapeOutcome, InferShapesError> {
        let [data] = op.inputs() else {
            return Err(InferShapesError::IncorrectInputCount);
        };
        Ok(ShapeOutcome::Computed(InferredShapes::single(data.clone())))
    }

    fn requires_ranked_inputs(&self) -> bool {
        false
    }
}
