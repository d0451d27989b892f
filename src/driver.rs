use std::error::Error;
use std::fmt;

use rayon::prelude::*;

use crate::adaptor::OpAdaptor;
use crate::diagnostics::{DiagnosticLevel, Diagnostics};
use crate::dim::SymbolGen;
use crate::infer_shapes::{InferShapes, InferShapesError, ShapeOutcome, VerifyError};
use crate::node::OperatorNode;
use crate::options::InferOptions;
use crate::registry::ShapeRegistry;
use crate::types::TensorType;

/// Errors reported when verifying an operator or inferring its output types.
#[derive(Clone, Debug, PartialEq)]
pub enum InferError {
    /// There is no shape rule registered for the operator's type.
    UnsupportedOperator { op_type: String },

    /// The operator's attributes are invalid for its operands.
    Invalid { node: String, error: VerifyError },

    /// The shape rule failed to compute output types.
    Shape {
        node: String,
        error: InferShapesError,
    },

    /// The shape rule produced a different number of output types than the
    /// operator has results.
    IncorrectOutputCount {
        node: String,
        expected: usize,
        actual: usize,
    },
}

impl InferError {
    /// Return the name of the operator which the error relates to.
    pub fn node(&self) -> Option<&str> {
        match self {
            Self::UnsupportedOperator { .. } => None,
            Self::Invalid { node, .. }
            | Self::Shape { node, .. }
            | Self::IncorrectOutputCount { node, .. } => Some(node),
        }
    }
}

impl fmt::Display for InferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedOperator { op_type } => {
                write!(f, "no shape rule for operator type \"{}\"", op_type)
            }
            Self::Invalid { node, error } => {
                write!(f, "operator \"{}\" is invalid: {}", node, error)
            }
            Self::Shape { node, error } => {
                write!(f, "shape inference failed for \"{}\": {}", node, error)
            }
            Self::IncorrectOutputCount {
                node,
                expected,
                actual,
            } => write!(
                f,
                "operator \"{}\" has {} outputs but {} types were inferred",
                node, expected, actual
            ),
        }
    }
}

impl Error for InferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid { error, .. } => Some(error),
            Self::Shape { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Successful outcome of [`ShapeInference::infer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InferOutcome {
    /// Output types could not be computed yet, because not enough is known
    /// about the operands. The operator's result types are unchanged.
    Deferred,

    /// Output types were computed and installed on the operator.
    Computed,
}

/// An operator and the types of its operands, for batch inference.
pub struct InferJob<'a> {
    pub node: &'a mut OperatorNode,
    pub inputs: &'a [TensorType],
}

impl<'a> InferJob<'a> {
    pub fn new(node: &'a mut OperatorNode, inputs: &'a [TensorType]) -> Self {
        InferJob { node, inputs }
    }
}

/// Verifies operators and infers the types of their results.
///
/// The driver looks up the shape rule for each operator in a
/// [`ShapeRegistry`], so it has no knowledge of individual operator types.
/// For each operator it:
///
/// 1. Verifies the operator's attributes, if enabled.
/// 2. Defers if the rule needs ranked operands and some are unranked.
/// 3. Runs the rule and installs the computed result types on the operator,
///    along with any default attribute values the rule synthesized.
///
/// Inference of an operator only depends on its own attributes and the
/// operand types passed in, so running it again with unchanged inputs gives
/// the same result. Callers are responsible for visiting operators after the
/// operators that produce their operands.
pub struct ShapeInference {
    registry: ShapeRegistry,
    options: InferOptions,
    diagnostics: Diagnostics,
}

impl ShapeInference {
    pub fn new(registry: ShapeRegistry, options: InferOptions) -> Self {
        let diagnostics = Diagnostics::new(options.diagnostics);
        ShapeInference {
            registry,
            options,
            diagnostics,
        }
    }

    /// Create a driver with rules for all built-in operators and default
    /// options.
    pub fn with_all_ops() -> Self {
        Self::new(ShapeRegistry::with_all_ops(), InferOptions::default())
    }

    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    pub fn options(&self) -> &InferOptions {
        &self.options
    }

    fn rule(&self, node: &OperatorNode) -> Result<&dyn InferShapes, InferError> {
        self.registry.get(node.op_type()).ok_or_else(|| {
            self.diagnostics.warn(node, format_args!("no shape rule for {}", node.op_type()));
            InferError::UnsupportedOperator {
                op_type: node.op_type().to_owned(),
            }
        })
    }

    fn invalid(&self, node: &OperatorNode, error: VerifyError) -> InferError {
        self.diagnostics.warn(node, format_args!("{}", error));
        InferError::Invalid {
            node: node.display_name().to_owned(),
            error,
        }
    }

    /// Check that an operator's attributes are valid for operands of type
    /// `inputs`.
    ///
    /// This runs regardless of whether verification is enabled in the
    /// options.
    pub fn verify(&self, node: &OperatorNode, inputs: &[TensorType]) -> Result<(), InferError> {
        let rule = self.rule(node)?;
        rule.verify(&OpAdaptor::new(inputs, node.attrs()))
            .map_err(|error| self.invalid(node, error))
    }

    /// Verify an operator and infer the types of its results, given the types
    /// of its operands.
    ///
    /// On success the operator's result types are replaced with the computed
    /// types, unless inference was deferred. If the rule synthesized values
    /// for attributes which were not set, they are added to the operator.
    /// On failure the operator is left unchanged.
    pub fn infer(
        &self,
        node: &mut OperatorNode,
        inputs: &[TensorType],
    ) -> Result<InferOutcome, InferError> {
        let rule = self.rule(node)?;
        let op = OpAdaptor::new(inputs, node.attrs());

        if self.options.verify {
            rule.verify(&op).map_err(|error| self.invalid(node, error))?;
        }

        if rule.requires_ranked_inputs() && inputs.iter().any(|input| !input.is_ranked()) {
            self.diagnostics.info(node, format_args!("deferred until input ranks are known"));
            return Ok(InferOutcome::Deferred);
        }

        let mut sym_gen = SymbolGen::with_prefix(symbol_prefix(node).into());
        let shapes = match rule.infer_shapes(&op, &mut sym_gen) {
            Ok(ShapeOutcome::Computed(shapes)) => shapes,
            Ok(ShapeOutcome::Deferred) => {
                self.diagnostics.info(node, format_args!("deferred until input shapes are known"));
                return Ok(InferOutcome::Deferred);
            }
            Err(InferShapesError::Invalid(error)) => return Err(self.invalid(node, error)),
            Err(error) => {
                self.diagnostics.warn(node, format_args!("{}", error));
                return Err(InferError::Shape {
                    node: node.display_name().to_owned(),
                    error,
                });
            }
        };

        if shapes.outputs.len() != node.outputs().len() {
            self.diagnostics.warn(
                node,
                format_args!(
                    "expected {} output types but {} were inferred",
                    node.outputs().len(),
                    shapes.outputs.len()
                ),
            );
            return Err(InferError::IncorrectOutputCount {
                node: node.display_name().to_owned(),
                expected: node.outputs().len(),
                actual: shapes.outputs.len(),
            });
        }

        for default in shapes.defaults {
            if node.attrs_mut().set_if_absent(default.name, default.value) {
                self.diagnostics.info(
                    node,
                    format_args!("set default value for \"{}\"", default.name),
                );
            }
        }

        if self.diagnostics.enabled(DiagnosticLevel::Info) {
            let types: Vec<String> = shapes.outputs.iter().map(|ty| ty.to_string()).collect();
            self.diagnostics.info(node, format_args!("inferred {}", types.join(", ")));
        }
        node.set_outputs(shapes.outputs);

        Ok(InferOutcome::Computed)
    }

    /// Forget which operators have been warned about, so that warnings are
    /// reported again for operators which fail on a later pass.
    pub fn reset_diagnostics(&self) {
        self.diagnostics.reset();
    }

    /// Infer result types for a batch of independent operators in parallel.
    ///
    /// None of the operators in `jobs` may produce an operand of another
    /// operator in the batch. Results are returned in the same order as
    /// `jobs`.
    pub fn infer_batch(&self, jobs: &mut [InferJob]) -> Vec<Result<InferOutcome, InferError>> {
        jobs.par_iter_mut()
            .map(|job| self.infer(job.node, job.inputs))
            .collect()
    }
}

/// Return the prefix for symbols generated while inferring `node`.
///
/// This includes the node's ID, so that symbols generated for different nodes
/// never compare equal, while repeated inference of one node produces the
/// same symbols.
fn symbol_prefix(node: &OperatorNode) -> String {
    format!("{}#{}", node.display_name(), node.id())
}

impl Default for ShapeInference {
    fn default() -> Self {
        Self::with_all_ops()
    }
}
