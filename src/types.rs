//! Element and tensor types of operator operands and results.

use std::fmt;

use smallvec::SmallVec;

use crate::dim::Dimension;

/// Enum specifying the element type of a tensor.
///
/// Shape inference treats the element type as an opaque token. Rules pass it
/// through from their inputs to their outputs.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum DataType {
    Float,
    Int32,
    Int64,
    Int8,
    UInt8,
    Bool,
}

impl fmt::Display for DataType {
    /// Format this enum value in the style of the corresponding Rust type (eg.
    /// "i32" for `DataType::Int32`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DataType::Float => "f32",
                DataType::Int32 => "i32",
                DataType::Int64 => "i64",
                DataType::Int8 => "i8",
                DataType::UInt8 => "u8",
                DataType::Bool => "bool",
            }
        )
    }
}

/// Dimension sizes of a ranked tensor.
///
/// Most tensors have few dimensions, so these are stored inline.
pub type Dims = SmallVec<[Dimension; 4]>;

/// Type of a tensor value: its element type and, if known, its shape.
///
/// A tensor type is either _ranked_, with a known number of dimensions each
/// of which may be fixed or symbolic, or _unranked_ if even the number of
/// dimensions is unknown. The shape of a tensor type never changes after it
/// is created. Inference replaces a result type as a whole.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct TensorType {
    dtype: DataType,
    dims: Option<Dims>,
}

impl TensorType {
    /// Create a ranked tensor type.
    pub fn new(dtype: DataType, dims: impl Into<Dims>) -> Self {
        TensorType {
            dtype,
            dims: Some(dims.into()),
        }
    }

    /// Create a ranked tensor type where all sizes are known.
    pub fn from_fixed_shape(dtype: DataType, shape: &[usize]) -> Self {
        Self::new(
            dtype,
            shape.iter().copied().map(Dimension::Fixed).collect::<Dims>(),
        )
    }

    /// Create a tensor type with unknown rank.
    pub fn unranked(dtype: DataType) -> Self {
        TensorType { dtype, dims: None }
    }

    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    /// Return the number of dimensions, or `None` if the type is unranked.
    pub fn ndim(&self) -> Option<usize> {
        self.dims.as_ref().map(|d| d.len())
    }

    /// Return the dimension sizes, or `None` if the type is unranked.
    pub fn dims(&self) -> Option<&[Dimension]> {
        self.dims.as_deref()
    }

    /// Return the size of the `index`th dimension.
    ///
    /// Returns `None` if the type is unranked or the index is out of bounds.
    pub fn dim(&self, index: usize) -> Option<&Dimension> {
        self.dims.as_ref()?.get(index)
    }

    pub fn is_ranked(&self) -> bool {
        self.dims.is_some()
    }

    /// Return the shape as a list of sizes if all dimensions are fixed.
    pub fn fixed_shape(&self) -> Option<Vec<usize>> {
        self.dims()?.iter().map(|d| d.fixed()).collect()
    }

    /// Return a new type with the same element type and different dims.
    pub fn with_dims(&self, dims: impl Into<Dims>) -> Self {
        Self::new(self.dtype, dims)
    }
}

impl fmt::Debug for TensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.dims {
            Some(dims) => write!(f, "{}{:?}", self.dtype, dims.as_slice()),
            None => write!(f, "{}[*]", self.dtype),
        }
    }
}

impl fmt::Display for TensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tensor<")?;
        match &self.dims {
            Some(dims) => {
                for dim in dims {
                    match dim {
                        Dimension::Fixed(size) => write!(f, "{}x", size)?,
                        Dimension::Symbolic(_) => write!(f, "?x")?,
                    }
                }
            }
            None => write!(f, "*x")?,
        }
        write!(f, "{}>", self.dtype)
    }
}

#[cfg(test)]
pub(crate) use tests::{dims, tensor_type};

#[cfg(test)]
mod tests {
    use super::{DataType, Dimension, TensorType};

    /// Create a `Dims` from a list of sizes and symbol names.
    macro_rules! dims {
        ($($x:expr),* $(,)?) => {
            $crate::types::Dims::from_iter([$($crate::dim::Dimension::from($x)),*])
        };
    }

    /// Create a ranked f32 tensor type from a list of sizes and symbol names.
    macro_rules! tensor_type {
        ($($x:expr),* $(,)?) => {
            $crate::types::TensorType::new(
                $crate::types::DataType::Float,
                $crate::types::dims!($($x),*),
            )
        };
    }

    pub(crate) use {dims, tensor_type};

    #[test]
    fn test_ranked_type() {
        let ty = tensor_type!("batch", 3, 4);
        assert_eq!(ty.dtype(), DataType::Float);
        assert_eq!(ty.ndim(), Some(3));
        assert!(ty.is_ranked());
        assert_eq!(ty.dim(0), Some(&Dimension::from("batch")));
        assert_eq!(ty.dim(2), Some(&Dimension::Fixed(4)));
        assert_eq!(ty.dim(3), None);
        assert_eq!(ty.fixed_shape(), None);
    }

    #[test]
    fn test_scalar_type() {
        let ty = TensorType::from_fixed_shape(DataType::Int32, &[]);
        assert_eq!(ty.ndim(), Some(0));
        assert_eq!(ty.dims(), Some([].as_slice()));
        assert_eq!(ty.fixed_shape(), Some(vec![]));
    }

    #[test]
    fn test_unranked_type() {
        let ty = TensorType::unranked(DataType::Int64);
        assert_eq!(ty.ndim(), None);
        assert_eq!(ty.dims(), None);
        assert_eq!(ty.dim(0), None);
        assert!(!ty.is_ranked());
        assert_ne!(ty, TensorType::from_fixed_shape(DataType::Int64, &[]));
    }

    #[test]
    fn test_fmt() {
        let ty = TensorType::from_fixed_shape(DataType::Float, &[3, 5]);
        assert_eq!(format!("{:?}", ty), "f32[3, 5]");
        assert_eq!(ty.to_string(), "tensor<3x5xf32>");

        let ty = tensor_type!("batch", 8);
        assert_eq!(format!("{:?}", ty), "f32[\"batch\", 8]");
        assert_eq!(ty.to_string(), "tensor<?x8xf32>");

        let ty = TensorType::unranked(DataType::Int8);
        assert_eq!(format!("{:?}", ty), "i8[*]");
        assert_eq!(ty.to_string(), "tensor<*xi8>");
    }
}
