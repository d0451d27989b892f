//! Internal testing utilities for the shape-infer crates.

use std::fmt::Debug;
use std::panic::{RefUnwindSafe, UnwindSafe, catch_unwind};

/// Utility for writing table-driven tests.
///
/// Define a `Case` struct holding the inputs and expected outputs for one
/// scenario, build a collection of cases and call [`test_each`] with the test
/// body. Every case is run, even if earlier ones fail. Once all cases have
/// run, the call panics with the number and debug representation of the
/// failing cases, if there were any.
///
/// ```
/// use shape_infer_testing::TestCases;
///
/// #[derive(Debug)]
/// struct Case {
///     shape: Vec<usize>,
///     perm: Vec<usize>,
///     expected: Vec<usize>,
/// }
///
/// let cases = [
///     Case { shape: vec![3, 5], perm: vec![1, 0], expected: vec![5, 3] },
///     Case { shape: vec![2, 3, 4], perm: vec![2, 0, 1], expected: vec![4, 2, 3] },
/// ];
///
/// cases.test_each(|case| {
///     let permuted: Vec<usize> = case.perm.iter().map(|&p| case.shape[p]).collect();
///     assert_eq!(permuted, case.expected);
/// });
/// ```
///
/// Test cases and captured state must be unwind safe, since each case is run
/// inside [`catch_unwind`]. Fields which are not can be wrapped with
/// [`AssertUnwindSafe`](std::panic::AssertUnwindSafe), or replaced with a
/// description from which the value is built inside the test body.
///
/// [`test_each`]: TestCases::test_each
pub trait TestCases {
    /// The data for a single test case.
    type Case;

    /// Run `test` with a reference to each case.
    fn test_each(self, test: impl Fn(&Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + RefUnwindSafe;

    /// Run `test` with a clone of each case.
    ///
    /// Use this when the test body needs to consume the case.
    fn test_each_clone(self, test: impl Fn(Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + Clone + UnwindSafe;

    /// Run `test` with each case passed by value.
    ///
    /// The debug representation of each case is captured before the test body
    /// runs, so the case does not need to be `Clone`.
    fn test_each_value(self, test: impl Fn(Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + UnwindSafe;
}

/// Panic with a summary if any cases failed.
fn report_failures<F: Debug>(failures: &[F]) {
    assert!(
        failures.is_empty(),
        "{} test cases failed: {:?}",
        failures.len(),
        failures
    );
}

impl<I: IntoIterator> TestCases for I {
    type Case = I::Item;

    fn test_each(self, test: impl Fn(&I::Item) + RefUnwindSafe)
    where
        Self::Case: Debug + RefUnwindSafe,
    {
        let failures: Vec<I::Item> = self
            .into_iter()
            .filter(|case| catch_unwind(|| test(case)).is_err())
            .collect();
        report_failures(&failures);
    }

    fn test_each_clone(self, test: impl Fn(I::Item) + RefUnwindSafe)
    where
        Self::Case: Debug + Clone + UnwindSafe,
    {
        let test = &test;
        let failures: Vec<I::Item> = self
            .into_iter()
            .filter(|case| {
                let owned = case.clone();
                catch_unwind(move || test(owned)).is_err()
            })
            .collect();
        report_failures(&failures);
    }

    fn test_each_value(self, test: impl Fn(I::Item) + RefUnwindSafe)
    where
        Self::Case: Debug + UnwindSafe,
    {
        let test = &test;
        let failures: Vec<String> = self
            .into_iter()
            .filter_map(|case| {
                let desc = format!("{:?}", case);
                catch_unwind(move || test(case)).is_err().then_some(desc)
            })
            .collect();
        report_failures(&failures);
    }
}
