use rustc_hash::FxHashMap;

use crate::infer_shapes::InferShapes;
use crate::ops;

/// Binds operator types to the shape rules that verify them and infer their
/// output types.
///
/// New registries have no rules registered. To create a registry with rules
/// for all built-in operators, use [`ShapeRegistry::with_all_ops`]. Rules for
/// additional operators can be added with [`ShapeRegistry::register`] without
/// any changes to the inference driver.
#[derive(Default)]
pub struct ShapeRegistry {
    rules: FxHashMap<String, Box<dyn InferShapes>>,
}

impl ShapeRegistry {
    /// Create a new empty registry.
    pub fn new() -> ShapeRegistry {
        Self::default()
    }

    /// Register the rule for an operator type.
    ///
    /// This replaces any existing rule for the same type.
    ///
    /// ```
    /// use shape_infer::ShapeRegistry;
    /// use shape_infer::ops::{Transpose, UnaryOp};
    ///
    /// let mut reg = ShapeRegistry::new();
    /// reg.register("Transpose", Transpose);
    /// reg.register("Gelu", UnaryOp);
    /// assert!(reg.contains("Gelu"));
    /// ```
    pub fn register(&mut self, op_type: &str, rule: impl InferShapes + 'static) {
        self.rules.insert(op_type.to_owned(), Box::new(rule));
    }

    /// Return the rule for an operator type.
    pub fn get(&self, op_type: &str) -> Option<&dyn InferShapes> {
        self.rules.get(op_type).map(|rule| rule.as_ref())
    }

    pub fn contains(&self, op_type: &str) -> bool {
        self.rules.contains_key(op_type)
    }

    /// Return the registered operator types, in sorted order.
    pub fn op_types(&self) -> Vec<&str> {
        let mut op_types: Vec<_> = self.rules.keys().map(|s| s.as_str()).collect();
        op_types.sort();
        op_types
    }

    /// Create a new registry with rules for all built-in operators.
    pub fn with_all_ops() -> ShapeRegistry {
        let mut reg = ShapeRegistry::new();

        macro_rules! register_op {
            ($op:ident) => {
                reg.register(stringify!($op), ops::$op)
            };

            ($op:ident, $rule:ident) => {
                reg.register(stringify!($op), ops::$rule)
            };
        }

        register_op!(Transpose);
        register_op!(Unsqueeze);

        register_op!(Identity, UnaryOp);
        register_op!(Relu, UnaryOp);
        register_op!(Neg, UnaryOp);
        register_op!(Sigmoid, UnaryOp);
        register_op!(Tanh, UnaryOp);
        register_op!(Exp, UnaryOp);
        register_op!(Sqrt, UnaryOp);

        register_op!(Add, BinaryOp);
        register_op!(Sub, BinaryOp);
        register_op!(Mul, BinaryOp);
        register_op!(Div, BinaryOp);
        register_op!(Pow, BinaryOp);

        register_op!(ReduceSum, ReductionOp);
        register_op!(ReduceMean, ReductionOp);
        register_op!(ReduceMax, ReductionOp);
        register_op!(ReduceMin, ReductionOp);
        register_op!(ReduceProd, ReductionOp);

        reg
    }
}
