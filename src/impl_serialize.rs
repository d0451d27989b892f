use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::dim::Dimension;
use crate::types::{DataType, TensorType};

impl Serialize for Dimension {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Dimension::Fixed(size) => serializer.serialize_u64(*size as u64),
            Dimension::Symbolic(name) => serializer.serialize_str(name),
        }
    }
}

impl Serialize for DataType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl Serialize for TensorType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut ty = serializer.serialize_struct("TensorType", 2)?;
        ty.serialize_field("dtype", &self.dtype())?;
        ty.serialize_field("shape", &self.dims())?;
        ty.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::dim::Dimension;
    use crate::types::{DataType, TensorType, tensor_type};

    #[test]
    fn test_serialize_dimension() {
        assert_eq!(serde_json::to_value(Dimension::Fixed(3)).unwrap(), json!(3));
        assert_eq!(
            serde_json::to_value(Dimension::from("batch")).unwrap(),
            json!("batch")
        );
    }

    #[test]
    fn test_serialize_tensor_type() {
        let ty = tensor_type!("batch", 3, 5);
        assert_eq!(
            serde_json::to_value(&ty).unwrap(),
            json!({"dtype": "f32", "shape": ["batch", 3, 5]})
        );

        let ty = TensorType::unranked(DataType::Int64);
        assert_eq!(
            serde_json::to_string(&ty).unwrap(),
            r#"{"dtype":"i64","shape":null}"#
        );

        let ty = TensorType::from_fixed_shape(DataType::Bool, &[]);
        assert_eq!(
            serde_json::to_value(&ty).unwrap(),
            json!({"dtype": "bool", "shape": []})
        );
    }
}
