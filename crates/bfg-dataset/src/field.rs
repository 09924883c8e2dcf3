//! A named array with its dimensions and attributes.

use std::collections::BTreeMap;

use crate::error::{DatasetError, DatasetResult};

/// Name of the record dimension forecast files are concatenated along.
pub const TIME_DIM: &str = "time";

/// Attribute value attached to a field.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Text(String),
    Number(f64),
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<f32> for AttrValue {
    fn from(v: f32) -> Self {
        Self::Number(v as f64)
    }
}

/// A variable read from a forecast file.
///
/// Values are stored flat in row-major order of `dims`.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub dims: Vec<String>,
    pub shape: Vec<usize>,
    pub values: Vec<f64>,
    pub attributes: BTreeMap<String, AttrValue>,
}

impl Field {
    /// Create a field, checking that `values` fills `shape` exactly.
    pub fn new(
        name: impl Into<String>,
        dims: &[&str],
        shape: &[usize],
        values: Vec<f64>,
    ) -> DatasetResult<Self> {
        let name = name.into();
        if dims.len() != shape.len() {
            return Err(DatasetError::invalid_format(format!(
                "'{}' has {} dimension names for {} dimensions",
                name,
                dims.len(),
                shape.len()
            )));
        }
        let expected: usize = shape.iter().product();
        if expected != values.len() {
            return Err(DatasetError::ShapeMismatch {
                variable: name,
                expected: shape.to_vec(),
                found: vec![values.len()],
            });
        }

        Ok(Self {
            name,
            dims: dims.iter().map(|d| d.to_string()).collect(),
            shape: shape.to_vec(),
            values,
            attributes: BTreeMap::new(),
        })
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.get(key)
    }

    pub fn text_attribute(&self, key: &str) -> Option<&str> {
        match self.attributes.get(key) {
            Some(AttrValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn number_attribute(&self, key: &str) -> Option<f64> {
        match self.attributes.get(key) {
            Some(AttrValue::Number(v)) => Some(*v),
            Some(AttrValue::Text(s)) => s.trim().parse().ok(),
            None => None,
        }
    }

    pub fn long_name(&self) -> Option<&str> {
        self.text_attribute("long_name")
    }

    pub fn units(&self) -> Option<&str> {
        self.text_attribute("units")
    }

    pub fn fill_value(&self) -> Option<f64> {
        self.number_attribute("_FillValue")
    }

    pub fn missing_value(&self) -> Option<f64> {
        self.number_attribute("missing_value")
    }

    /// The declared sentinel for absent data: `missing_value`, then `_FillValue`.
    pub fn declared_missing(&self) -> Option<f64> {
        self.missing_value().or_else(|| self.fill_value())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether the leading dimension is the time record dimension.
    pub fn has_time_dim(&self) -> bool {
        self.dims.first().map(|d| d == TIME_DIM).unwrap_or(false)
    }

    /// Number of time samples (1 for fields without a time dimension).
    pub fn time_steps(&self) -> usize {
        if self.has_time_dim() {
            self.shape[0]
        } else {
            1
        }
    }

    /// Shape without the time dimension.
    pub fn spatial_shape(&self) -> &[usize] {
        if self.has_time_dim() {
            &self.shape[1..]
        } else {
            &self.shape
        }
    }

    /// Number of values in one time sample.
    pub fn plane_len(&self) -> usize {
        self.spatial_shape().iter().product()
    }

    /// Whether a value is usable data.
    ///
    /// A value is invalid when it equals `_FillValue`, equals `missing_value`,
    /// or is not finite.
    pub fn is_valid(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        if self.fill_value().map(|fv| value == fv).unwrap_or(false) {
            return false;
        }
        if self.missing_value().map(|mv| value == mv).unwrap_or(false) {
            return false;
        }
        true
    }

    /// Validity of every value, in storage order.
    pub fn validity(&self) -> Vec<bool> {
        self.values.iter().map(|&v| self.is_valid(v)).collect()
    }

    /// Concatenate fields along the time dimension.
    ///
    /// Parts without a time dimension count as one time sample each. All
    /// parts must share the same spatial shape; attributes are taken from
    /// the first part.
    pub fn concat_time(parts: Vec<Field>) -> DatasetResult<Field> {
        let mut parts = parts.into_iter();
        let first = parts
            .next()
            .ok_or_else(|| DatasetError::invalid_format("nothing to concatenate"))?;

        let spatial_shape = first.spatial_shape().to_vec();
        let spatial_dims: Vec<String> = if first.has_time_dim() {
            first.dims[1..].to_vec()
        } else {
            first.dims.clone()
        };

        let mut steps = first.time_steps();
        let Field {
            name,
            mut values,
            attributes,
            ..
        } = first;

        for part in parts {
            if part.spatial_shape() != spatial_shape.as_slice() {
                return Err(DatasetError::ShapeMismatch {
                    variable: name,
                    expected: spatial_shape,
                    found: part.spatial_shape().to_vec(),
                });
            }
            steps += part.time_steps();
            values.extend_from_slice(&part.values);
        }

        let mut dims = vec![TIME_DIM.to_string()];
        dims.extend(spatial_dims);
        let mut shape = vec![steps];
        shape.extend(spatial_shape);

        Ok(Field {
            name,
            dims,
            shape,
            values,
            attributes,
        })
    }
}
