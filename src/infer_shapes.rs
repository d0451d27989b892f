//! Traits for shape inference and verification, and their outcome types.

use std::error::Error;
use std::fmt;

use smallvec::SmallVec;

use crate::adaptor::OpAdaptor;
use crate::attrs::{Attr, AttrError};
use crate::dim::SymbolGen;
use crate::types::TensorType;

/// Reasons why an operator's attributes or operands are structurally invalid.
///
/// This is the _invalid_ outcome of [`InferShapes::verify`]. It describes a
/// problem with the operator instance itself, independent of its neighbors
/// in the graph. When several elements of an attribute are invalid, only the
/// first is reported.
#[derive(Clone, Debug, PartialEq)]
pub enum VerifyError {
    /// An element of an axis list is below zero after negative values have
    /// been resolved by adding the rank.
    ///
    /// `value` is the resolved value.
    ValueTooLow {
        attr: &'static str,
        index: usize,
        value: i64,
    },

    /// An element of an axis list is greater than or equal to the rank.
    ValueTooHigh {
        attr: &'static str,
        index: usize,
        value: i64,
        ndim: usize,
    },

    /// An axis list has the wrong number of elements.
    IncorrectLength {
        attr: &'static str,
        expected: usize,
        actual: usize,
    },

    /// An axis list refers to the same axis more than once.
    DuplicateValue {
        attr: &'static str,
        index: usize,
        value: i64,
    },

    /// An attribute is missing or has the wrong type.
    Attr(AttrError),
}

impl VerifyError {
    /// Return the position within the attribute of the offending element, if
    /// the error relates to a single element.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::ValueTooLow { index, .. }
            | Self::ValueTooHigh { index, .. }
            | Self::DuplicateValue { index, .. } => Some(*index),
            Self::IncorrectLength { .. } | Self::Attr(_) => None,
        }
    }
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValueTooLow { attr, index, value } => {
                write!(f, "{} value too low ({} at index {})", attr, value, index)
            }
            Self::ValueTooHigh {
                attr,
                index,
                value,
                ndim,
            } => write!(
                f,
                "{} value too high ({} at index {}, rank {})",
                attr, value, index, ndim
            ),
            Self::IncorrectLength {
                attr,
                expected,
                actual,
            } => write!(
                f,
                "{} has {} elements but expected {}",
                attr, actual, expected
            ),
            Self::DuplicateValue { attr, index, value } => {
                write!(f, "{} value {} at index {} is repeated", attr, value, index)
            }
            Self::Attr(err) => write!(f, "{}", err),
        }
    }
}

impl Error for VerifyError {}

impl From<AttrError> for VerifyError {
    fn from(val: AttrError) -> Self {
        VerifyError::Attr(val)
    }
}

/// Errors that occur when computing the output types of a verified operator.
#[derive(Clone, Debug, PartialEq)]
pub enum InferShapesError {
    /// Too many or too few inputs were provided for this operator.
    IncorrectInputCount,

    /// The input shapes are incompatible.
    ///
    /// Operator execution will fail if given inputs with these shapes.
    IncompatibleShapes,

    /// The input element types are incompatible.
    IncompatibleTypes,

    /// An input's rank does not match that expected by the operator.
    IncorrectRank,

    /// The operator's attributes are invalid.
    ///
    /// This is reported if shape inference is run on an operator that was
    /// not verified.
    Invalid(VerifyError),
}

impl fmt::Display for InferShapesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncorrectInputCount => write!(f, "incorrect number of inputs"),
            Self::IncompatibleShapes => write!(f, "input shapes are incompatible"),
            Self::IncompatibleTypes => write!(f, "input element types are incompatible"),
            Self::IncorrectRank => write!(f, "input has incorrect rank"),
            Self::Invalid(err) => write!(f, "{}", err),
        }
    }
}

impl Error for InferShapesError {}

impl From<VerifyError> for InferShapesError {
    fn from(val: VerifyError) -> Self {
        InferShapesError::Invalid(val)
    }
}

impl From<AttrError> for InferShapesError {
    fn from(val: AttrError) -> Self {
        InferShapesError::Invalid(val.into())
    }
}

/// Attribute value synthesized by a shape rule when an optional attribute
/// was not set.
#[derive(Clone, Debug, PartialEq)]
pub struct DefaultAttr {
    pub name: &'static str,
    pub value: Attr,
}

/// Output types computed by a shape rule.
#[derive(Clone, Debug, PartialEq)]
pub struct InferredShapes {
    /// Types of each of the operator's results.
    pub outputs: SmallVec<[TensorType; 1]>,

    /// Default attribute values that the rule synthesized and which should be
    /// persisted onto the operator, so that later passes see an explicit value.
    pub defaults: SmallVec<[DefaultAttr; 1]>,
}

impl InferredShapes {
    /// Create a result with a single output and no synthesized attributes.
    pub fn single(output: TensorType) -> Self {
        InferredShapes {
            outputs: [output].into_iter().collect(),
            defaults: SmallVec::new(),
        }
    }

    /// Record a synthesized default attribute value.
    pub fn with_default(mut self, name: &'static str, value: Attr) -> Self {
        self.defaults.push(DefaultAttr { name, value });
        self
    }
}

/// Result of a successful call to [`InferShapes::infer_shapes`].
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeOutcome {
    /// Output types could not be computed yet because shape information
    /// about the inputs, such as their rank, is unknown.
    ///
    /// This is not an error. Inference can be retried once more is known.
    Deferred,

    /// Output types were computed.
    Computed(InferredShapes),
}

/// Verify operators and infer the types of their outputs.
///
/// There is one implementation of this trait per operator or family of
/// operators with the same shape rules. Implementations are bound to operator
/// types via a [`ShapeRegistry`](crate::ShapeRegistry).
///
/// Both methods are pure functions of their inputs. The only way a rule can
/// change the operator is by returning synthesized attributes in
/// [`InferredShapes::defaults`], which the driver persists.
pub trait InferShapes: Send + Sync {
    /// Check that the operator's attributes are structurally valid for its
    /// operands.
    ///
    /// This runs before [`infer_shapes`](InferShapes::infer_shapes) and must
    /// not depend on it. If the information needed for a check is not known
    /// yet (eg. an input is unranked), the check should pass.
    ///
    /// Any operator which passes verification must not fail in
    /// `infer_shapes` due to the same attributes.
    fn verify(&self, #[allow(unused)] op: &OpAdaptor) -> Result<(), VerifyError> {
        Ok(())
    }

    /// Compute the output types of the operator.
    ///
    /// `sym_gen` should be used to create symbols for output dimensions which
    /// are unknown and cannot be expressed as an input dimension.
    fn infer_shapes(
        &self,
        op: &OpAdaptor,
        sym_gen: &mut SymbolGen,
    ) -> Result<ShapeOutcome, InferShapesError>;

    /// Return true if inference should be deferred when any input is
    /// unranked.
    ///
    /// Most rules cannot do anything useful without knowing input ranks, so
    /// the driver skips calling them. Rules which can handle unranked inputs,
    /// for example by producing an unranked output, should return false.
    fn requires_ranked_inputs(&self) -> bool {
        true
    }
}

/// Resolve an index given as a value in `[-len, len)` to a non-negative index
/// in `[0, len)`.
///
/// Negative values count backwards from the end. On failure the resolved
/// value is returned as the error, which is `< 0` if the index was too low
/// or `>= len` if it was too high.
pub fn resolve_index(len: usize, index: i64) -> Result<usize, i64> {
    let len = len.min(i64::MAX as usize) as i64;
    let resolved = if index < 0 { index + len } else { index };
    if resolved < 0 || resolved >= len {
        return Err(resolved);
    }
    Ok(resolved as usize)
}

/// Resolve each element of the axis-list attribute `attr` against a rank of
/// `ndim`.
///
/// This is the single resolution rule shared by verification and shape
/// computation, so that an attribute which passes verification always
/// resolves in the same way when computing shapes. The first invalid element
/// is reported.
pub fn resolve_axes(
    attr: &'static str,
    ndim: usize,
    axes: &[i64],
) -> Result<SmallVec<[usize; 4]>, VerifyError> {
    axes.iter()
        .enumerate()
        .map(|(index, &axis)| {
            resolve_index(ndim, axis).map_err(|value| {
                if value < 0 {
                    VerifyError::ValueTooLow { attr, index, value }
                } else {
                    VerifyError::ValueTooHigh {
                        attr,
                        index,
                        value,
                        ndim,
                    }
                }
            })
        })
        .collect()
}

/// Check that resolved axes do not contain duplicates.
///
/// `axes` are the original attribute values, used to report the error.
pub fn check_unique_axes(
    attr: &'static str,
    resolved: &[usize],
    axes: &[i64],
) -> Result<(), VerifyError> {
    for (index, axis) in resolved.iter().enumerate() {
        if resolved[..index].contains(axis) {
            return Err(VerifyError::DuplicateValue {
                attr,
                index,
                value: axes[index],
            });
        }
    }
    Ok(())
}
