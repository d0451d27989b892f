use smallvec::SmallVec;

use crate::adaptor::OpAdaptor;
use crate::attrs::AttrError;
use crate::dim::{Dimension, SymbolGen};
use crate::infer_shapes::{
    InferShapes, InferShapesError, InferredShapes, ShapeOutcome, VerifyError, resolve_axes,
};
use crate::types::{Dims, TensorType};

/// Attributes and operands of a reduction operator.
pub struct ReduceAdaptor<'a> {
    op: OpAdaptor<'a>,
}

impl<'a> ReduceAdaptor<'a> {
    pub fn new(op: &OpAdaptor<'a>) -> Self {
        ReduceAdaptor { op: *op }
    }

    pub fn data(&self) -> Option<&'a TensorType> {
        self.op.input(0)
    }

    /// Axes to reduce over. If not set, all axes are reduced.
    pub fn axes(&self) -> Result<Option<&'a [i64]>, AttrError> {
        self.op.get_ints("axes")
    }

    /// True if reduced dimensions are kept as size-1 dimensions. Defaults to
    /// true.
    pub fn keep_dims(&self) -> Result<bool, AttrError> {
        self.op.get_int_or("keepdims", 1).map(|val| val != 0)
    }
}

/// Shape inference for reduction operators.
///
/// Used for operators such as `ReduceSum`, `ReduceMean`, `ReduceMax`,
/// `ReduceMin` and `ReduceProd`. Axes which are listed more than once are
/// reduced once.
#[derive(Default)]
pub struct ReductionOp;

impl InferShapes for ReductionOp {
    fn verify(&self, op: &OpAdaptor) -> Result<(), VerifyError> {
        let op = ReduceAdaptor::new(op);
        op.keep_dims()?;
        let axes = op.axes()?;
        if let Some(ndim) = op.data().and_then(|data| data.ndim())
            && let Some(axes) = axes
        {
            resolve_axes("axes", ndim, axes)?;
        }
        Ok(())
    }

    fn infer_shapes(
        &self,
        op: &OpAdaptor,
        _sym_gen: &mut SymbolGen,
    ) -> Result<ShapeOutcome, InferShapesError> {
        let op = ReduceAdaptor::new(op);
        let Some(data) = op.data() else {
            return Err(InferShapesError::IncorrectInputCount);
        };
        let Some(dims) = data.dims() else {
            return Ok(ShapeOutcome::Deferred);
        };

        let ndim = dims.len();
        let mut axes: SmallVec<[usize; 4]> = match op.axes()? {
            Some(axes) => resolve_axes("axes", ndim, axes)?,
            None => (0..ndim).collect(),
        };
        axes.sort_unstable();
        axes.dedup();

        let keep_dims = op.keep_dims()?;
        let mut out_dims = Dims::new();
        for (i, dim) in dims.iter().enumerate() {
            if !axes.contains(&i) {
                out_dims.push(dim.clone());
            } else if keep_dims {
                out_dims.push(Dimension::Fixed(1));
            }
        }

        Ok(ShapeOutcome::Computed(InferredShapes::single(
            data.with_dims(out_dims),
        )))
    }
}
