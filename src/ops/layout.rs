use std::borrow::Cow;

use smallvec::SmallVec;

use crate::adaptor::OpAdaptor;
use crate::attrs::{Attr, AttrError};
use crate::dim::{Dimension, SymbolGen};
use crate::infer_shapes::{
    InferShapes, InferShapesError, InferredShapes, ShapeOutcome, VerifyError, check_unique_axes,
    resolve_axes,
};
use crate::types::{Dims, TensorType};

/// Attributes and operands of a [`Transpose`] operator.
pub struct TransposeAdaptor<'a> {
    op: OpAdaptor<'a>,
}

impl<'a> TransposeAdaptor<'a> {
    pub fn new(op: &OpAdaptor<'a>) -> Self {
        TransposeAdaptor { op: *op }
    }

    /// The tensor to transpose.
    pub fn data(&self) -> Option<&'a TensorType> {
        self.op.input(0)
    }

    /// The order of the output dimensions, or `None` if not set.
    pub fn perm(&self) -> Result<Option<&'a [i64]>, AttrError> {
        self.op.get_ints("perm")
    }
}

/// Return the permutation used when `perm` is not set, which reverses the
/// order of dimensions.
fn default_perm(ndim: usize) -> Vec<i64> {
    (0..ndim as i64).rev().collect()
}

/// Resolve a permutation against an input with `ndim` dims.
///
/// Each element is resolved by [`resolve_axes`], so negative values count
/// back from the last dimension. Elements are only checked to be in range.
/// Repeated elements are accepted.
fn resolve_perm(ndim: usize, perm: &[i64]) -> Result<SmallVec<[usize; 4]>, VerifyError> {
    if perm.len() != ndim {
        return Err(VerifyError::IncorrectLength {
            attr: "perm",
            expected: ndim,
            actual: perm.len(),
        });
    }
    resolve_axes("perm", ndim, perm)
}

/// Transpose operator.
///
/// Output dimension `i` is input dimension `perm[i]`. If `perm` is not set,
/// the dimensions are reversed and the reversed order is persisted as the
/// operator's `perm` attribute.
///
/// Note that `perm` is not required to be a permutation. Verification only
/// checks that it has one element per input dimension and that each element
/// is in range. A `perm` which repeats an axis reads that input dimension
/// into several output dimensions.
///
/// See <https://onnx.ai/onnx/operators/onnx__Transpose.html>.
#[derive(Default)]
pub struct Transpose;

impl InferShapes for Transpose {
    fn verify(&self, op: &OpAdaptor) -> Result<(), VerifyError> {
        let op = TransposeAdaptor::new(op);
        let Some(ndim) = op.data().and_then(|data| data.ndim()) else {
            return Ok(());
        };
        let Some(perm) = op.perm()? else {
            return Ok(());
        };
        resolve_perm(ndim, perm)?;
        Ok(())
    }

    fn infer_shapes(
        &self,
        op: &OpAdaptor,
        _sym_gen: &mut SymbolGen,
    ) -> Result<ShapeOutcome, InferShapesError> {
        if op.inputs().len() != 1 {
            return Err(InferShapesError::IncorrectInputCount);
        }
        let op = TransposeAdaptor::new(op);
        let Some(data) = op.data() else {
            return Err(InferShapesError::IncorrectInputCount);
        };
        let Some(dims) = data.dims() else {
            return Ok(ShapeOutcome::Deferred);
        };

        let (perm, synthesized) = match op.perm()? {
            Some(perm) => (Cow::Borrowed(perm), false),
            None => (Cow::Owned(default_perm(dims.len())), true),
        };

        let out_dims: Dims = resolve_perm(dims.len(), &perm)?
            .into_iter()
            .map(|axis| dims[axis].clone())
            .collect();

        let mut result = InferredShapes::single(data.with_dims(out_dims));
        if synthesized {
            result = result.with_default("perm", Attr::Ints(perm.into_owned()));
        }
        Ok(ShapeOutcome::Computed(result))
    }
}

/// Attributes and operands of an [`Unsqueeze`] operator.
pub struct UnsqueezeAdaptor<'a> {
    data: Option<&'a TensorType>,
    axes: &'a [i64],
}

impl<'a> UnsqueezeAdaptor<'a> {
    /// Read the operator's attributes.
    ///
    /// Fails if the required `axes` attribute is not set.
    pub fn new(op: &OpAdaptor<'a>) -> Result<Self, AttrError> {
        Ok(UnsqueezeAdaptor {
            data: op.input(0),
            axes: op.require_ints("axes")?,
        })
    }

    pub fn data(&self) -> Option<&'a TensorType> {
        self.data
    }

    /// Positions in the output at which to insert size-1 dimensions.
    pub fn axes(&self) -> &'a [i64] {
        self.axes
    }
}

/// Resolve `axes` against the output rank of an unsqueeze.
fn resolve_unsqueeze_axes(ndim: usize, axes: &[i64]) -> Result<SmallVec<[usize; 4]>, VerifyError> {
    let out_ndim = ndim + axes.len();
    let resolved = resolve_axes("axes", out_ndim, axes)?;
    check_unique_axes("axes", &resolved, axes)?;
    Ok(resolved)
}

/// Unsqueeze operator, with axes specified as an attribute.
///
/// Inserts size-1 dimensions into the input shape at the positions given by
/// the required `axes` attribute. Axes index into the output shape.
///
/// See <https://onnx.ai/onnx/operators/onnx__Unsqueeze.html>.
#[derive(Default)]
pub struct Unsqueeze;

impl InferShapes for Unsqueeze {
    fn verify(&self, op: &OpAdaptor) -> Result<(), VerifyError> {
        let op = UnsqueezeAdaptor::new(op)?;
        let Some(ndim) = op.data().and_then(|data| data.ndim()) else {
            return Ok(());
        };
        resolve_unsqueeze_axes(ndim, op.axes())?;
        Ok(())
    }

    fn infer_shapes(
        &self,
        op: &OpAdaptor,
        _sym_gen: &mut SymbolGen,
    ) -> Result<ShapeOutcome, InferShapesError> {
        if op.inputs().len() != 1 {
            return Err(InferShapesError::IncorrectInputCount);
        }
        let op = UnsqueezeAdaptor::new(op)?;
        let Some(data) = op.data() else {
            return Err(InferShapesError::IncorrectInputCount);
        };
        let Some(dims) = data.dims() else {
            return Ok(ShapeOutcome::Deferred);
        };

        let mut axes = resolve_unsqueeze_axes(dims.len(), op.axes())?;
        axes.sort_unstable();

        let mut out_dims: Dims = dims.iter().cloned().collect();
        for axis in axes {
            out_dims.insert(axis, Dimension::Fixed(1));
        }

        Ok(ShapeOutcome::Computed(InferredShapes::single(
            data.with_dims(out_dims),
        )))
    }
}
