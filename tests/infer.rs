use shape_infer::{
    Attr, Attrs, DataType, Dimension, InferError, InferJob, InferOptions, InferOutcome,
    OperatorNode, ShapeInference, ShapeRegistry, TensorType, VerifyError,
};
use shape_infer_testing::TestCases;

/// Create an f32 tensor type from a list of sizes and symbol names.
macro_rules! ty {
    ($($x:expr),* $(,)?) => {
        TensorType::new(DataType::Float, vec![$(Dimension::from($x)),*])
    };
}

fn fixed(shape: &[usize]) -> TensorType {
    TensorType::from_fixed_shape(DataType::Float, shape)
}

fn transpose(name: &str, perm: Option<Vec<i64>>) -> OperatorNode {
    let mut attrs = Attrs::new();
    if let Some(perm) = perm {
        attrs.set("perm", perm);
    }
    OperatorNode::new("Transpose", Some(name), attrs, 1)
}

#[test]
fn test_transpose_scenarios() {
    #[derive(Debug)]
    struct Case {
        input: TensorType,
        perm: Option<Vec<i64>>,
        expected: TensorType,
        expected_perm: Vec<i64>,
    }

    let cases = [
        // Default perm reverses dims and is persisted.
        Case {
            input: fixed(&[3, 5]),
            perm: None,
            expected: fixed(&[5, 3]),
            expected_perm: vec![1, 0],
        },
        // Negative perm values resolve relative to the rank. The attribute is
        // kept as it was written.
        Case {
            input: fixed(&[2, 3, 4]),
            perm: Some(vec![2, -3, 1]),
            expected: fixed(&[4, 2, 3]),
            expected_perm: vec![2, -3, 1],
        },
        Case {
            input: fixed(&[]),
            perm: None,
            expected: fixed(&[]),
            expected_perm: vec![],
        },
        Case {
            input: ty!("batch", 16, "seq", 64),
            perm: Some(vec![0, 2, 1, 3]),
            expected: ty!("batch", "seq", 16, 64),
            expected_perm: vec![0, 2, 1, 3],
        },
    ];

    cases.test_each_value(|case| {
        let driver = ShapeInference::with_all_ops();
        let mut node = transpose("transpose", case.perm);
        let outcome = driver.infer(&mut node, &[case.input]);

        assert_eq!(outcome, Ok(InferOutcome::Computed));
        assert_eq!(node.outputs(), [Some(case.expected)]);
        assert_eq!(node.attrs().get("perm"), Some(&Attr::Ints(case.expected_perm)));
    });
}

#[test]
fn test_transpose_perm_bounds() {
    #[derive(Debug)]
    struct Case {
        perm: Vec<i64>,
        expected: Result<(), VerifyError>,
    }

    // Bounds for an input of rank 3.
    let cases = [
        Case {
            perm: vec![-3, 1, 2],
            expected: Ok(()),
        },
        Case {
            perm: vec![-4, 1, 2],
            expected: Err(VerifyError::ValueTooLow {
                attr: "perm",
                index: 0,
                value: -1,
            }),
        },
        Case {
            perm: vec![0, 1, 2],
            expected: Ok(()),
        },
        Case {
            perm: vec![0, 1, 3],
            expected: Err(VerifyError::ValueTooHigh {
                attr: "perm",
                index: 2,
                value: 3,
                ndim: 3,
            }),
        },
    ];

    cases.test_each(|case| {
        let driver = ShapeInference::with_all_ops();
        let node = transpose("transpose", Some(case.perm.clone()));
        let result = driver.verify(&node, &[fixed(&[2, 3, 4])]);
        let expected = case
            .expected
            .clone()
            .map_err(|error| InferError::Invalid {
                node: "transpose".into(),
                error,
            });
        assert_eq!(result, expected);
    });
}

#[test]
fn test_invalid_perm_message() {
    let driver = ShapeInference::with_all_ops();
    let mut node = transpose("transpose_3", Some(vec![0, 2]));
    let err = driver.infer(&mut node, &[fixed(&[3, 5])]).unwrap_err();

    assert_eq!(err.node(), Some("transpose_3"));
    assert!(matches!(
        &err,
        InferError::Invalid { error, .. } if error.index() == Some(1)
    ));
    assert_eq!(
        err.to_string(),
        "operator \"transpose_3\" is invalid: perm value too high (2 at index 1, rank 2)"
    );
    assert_eq!(node.output(0), None);
}

#[test]
fn test_idempotent() {
    let driver = ShapeInference::with_all_ops();
    let input = ty!("batch", 3, 5);
    let mut node = transpose("transpose", None);

    driver.infer(&mut node, &[input.clone()]).unwrap();
    let first_outputs = node.outputs().to_vec();
    let first_attrs = node.attrs().clone();

    driver.infer(&mut node, &[input]).unwrap();
    assert_eq!(node.outputs(), first_outputs.as_slice());
    assert_eq!(node.attrs(), &first_attrs);
}

#[test]
fn test_existing_perm_is_not_replaced() {
    let driver = ShapeInference::with_all_ops();
    let mut node = transpose("transpose", Some(vec![0, 1]));
    driver.infer(&mut node, &[fixed(&[3, 5])]).unwrap();

    assert_eq!(node.output(0), Some(&fixed(&[3, 5])));
    assert_eq!(node.attrs().get("perm"), Some(&Attr::Ints(vec![0, 1])));
}

#[test]
fn test_deferred_then_retried() {
    let driver = ShapeInference::with_all_ops();
    let mut node = transpose("transpose", None);

    let outcome = driver.infer(&mut node, &[TensorType::unranked(DataType::Float)]);
    assert_eq!(outcome, Ok(InferOutcome::Deferred));
    assert_eq!(node.output(0), None);
    assert!(node.attrs().is_empty());

    // Once the operand's rank is known, inference can be run again.
    let outcome = driver.infer(&mut node, &[fixed(&[2, 7])]);
    assert_eq!(outcome, Ok(InferOutcome::Computed));
    assert_eq!(node.output(0), Some(&fixed(&[7, 2])));
}

#[test]
fn test_unverified_inference() {
    let mut opts = InferOptions::default();
    opts.enable_verify(false);
    let driver = ShapeInference::new(ShapeRegistry::with_all_ops(), opts);

    let mut node = OperatorNode::new("Unsqueeze", Some("unsqueeze"), Attrs::new(), 1);
    let err = driver.infer(&mut node, &[fixed(&[3])]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "operator \"unsqueeze\" is invalid: required attribute \"axes\" is missing"
    );
}

#[test]
fn test_chain_of_operators() {
    // x: (batch, 8) -> Unsqueeze(axes=[1]) -> Transpose -> ReduceSum(axes=[0], keepdims=0)
    // -> Add(y) -> Relu
    let driver = ShapeInference::with_all_ops();
    let x = ty!("batch", 8);

    let mut unsqueeze = OperatorNode::new(
        "Unsqueeze",
        Some("unsqueeze"),
        [("axes", vec![1i64])].into_iter().collect(),
        1,
    );
    driver.infer(&mut unsqueeze, &[x]).unwrap();
    let unsqueezed = unsqueeze.output(0).unwrap().clone();
    assert_eq!(unsqueezed, ty!("batch", 1, 8));

    let mut permute = transpose("transpose", None);
    driver.infer(&mut permute, &[unsqueezed]).unwrap();
    let transposed = permute.output(0).unwrap().clone();
    assert_eq!(transposed, ty!(8, 1, "batch"));

    let mut reduce = OperatorNode::new(
        "ReduceSum",
        Some("reduce"),
        [("axes", Attr::Ints(vec![0])), ("keepdims", Attr::Int(0))]
            .into_iter()
            .collect(),
        1,
    );
    driver.infer(&mut reduce, &[transposed]).unwrap();
    let reduced = reduce.output(0).unwrap().clone();
    assert_eq!(reduced, ty!(1, "batch"));

    let mut add = OperatorNode::new("Add", Some("add"), Attrs::new(), 1);
    driver
        .infer(&mut add, &[reduced, ty!("n", "m")])
        .unwrap();
    let sum = add.output(0).unwrap().clone();
    assert_eq!(sum, ty!("n", format!("add#{}_1", add.id())));

    let mut relu = OperatorNode::new("Relu", Some("relu"), Attrs::new(), 1);
    driver.infer(&mut relu, &[sum.clone()]).unwrap();
    assert_eq!(relu.output(0), Some(&sum));
}

#[test]
fn test_unnamed_nodes_generate_distinct_symbols() {
    let driver = ShapeInference::with_all_ops();
    let mut add_1 = OperatorNode::new("Add", None, Attrs::new(), 1);
    let mut add_2 = OperatorNode::new("Add", None, Attrs::new(), 1);

    driver.infer(&mut add_1, &[ty!("a"), ty!("b")]).unwrap();
    driver.infer(&mut add_2, &[ty!("c"), ty!("d")]).unwrap();
    let lhs = add_1.output(0).unwrap().clone();
    let rhs = add_2.output(0).unwrap().clone();
    assert_ne!(lhs.dim(0), rhs.dim(0));

    // The two unknown sizes are not assumed to be equal when combined.
    let mut add_3 = OperatorNode::new("Add", None, Attrs::new(), 1);
    driver.infer(&mut add_3, &[lhs.clone(), rhs.clone()]).unwrap();
    let sum = add_3.output(0).unwrap();
    assert_ne!(sum.dim(0), lhs.dim(0));
    assert_ne!(sum.dim(0), rhs.dim(0));

    // Each node keeps its symbols when inferred again.
    driver.infer(&mut add_1, &[ty!("a"), ty!("b")]).unwrap();
    assert_eq!(add_1.output(0), Some(&lhs));
}

#[test]
fn test_infer_batch() {
    let driver = ShapeInference::with_all_ops();
    let shapes: Vec<TensorType> = (1..=32).map(|n| fixed(&[n, n + 1, 2])).collect();
    let inputs: Vec<[TensorType; 1]> = shapes.iter().map(|s| [s.clone()]).collect();

    let mut nodes: Vec<OperatorNode> = (0..shapes.len())
        .map(|i| {
            // Every fourth operator has an invalid perm.
            let perm = if i % 4 == 3 { vec![0, 1, 3] } else { vec![2, 0, 1] };
            transpose(&format!("transpose_{}", i), Some(perm))
        })
        .collect();
    nodes.push(OperatorNode::new("Conv", Some("conv"), Attrs::new(), 1));
    let conv_input = [fixed(&[1, 3, 8, 8])];

    let mut jobs: Vec<InferJob> = nodes
        .iter_mut()
        .zip(inputs.iter().map(|i| i.as_slice()).chain([conv_input.as_slice()]))
        .map(|(node, inputs)| InferJob::new(node, inputs))
        .collect();
    let results = driver.infer_batch(&mut jobs);
    drop(jobs);

    assert_eq!(results.len(), shapes.len() + 1);
    for (i, (result, node)) in results.iter().zip(&nodes).enumerate() {
        if i == shapes.len() {
            assert_eq!(
                result,
                &Err(InferError::UnsupportedOperator {
                    op_type: "Conv".into()
                })
            );
        } else if i % 4 == 3 {
            let expected_name = format!("transpose_{}", i);
            assert!(matches!(
                result,
                Err(InferError::Invalid { node, .. }) if *node == expected_name
            ));
            assert_eq!(node.output(0), None);
        } else {
            let n = i + 1;
            assert_eq!(result, &Ok(InferOutcome::Computed));
            assert_eq!(node.output(0), Some(&fixed(&[2, n, n + 1])));
        }
    }
}
