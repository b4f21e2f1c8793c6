//! Deserializers turn the values collected by a supplier into typed resources

use super::value::NormalizedValue;
use super::Resource;
use crate::error::{Error, Result};
use serde_json::Value;
use std::marker::PhantomData;

/// Converts normalized values into typed resources of one type
///
/// Implementations must be side-effect free, must map an empty input to an
/// empty output, and must report malformed values as errors.
pub trait Deserializer: Send + Sync {
    type Output: Resource;

    fn deserialize(&self, values: Vec<NormalizedValue>) -> Result<Vec<Self::Output>>;
}

/// Deserializer for any serde-backed [`Resource`]
pub struct ValueDeserializer<T> {
    _resource: PhantomData<fn() -> T>,
}

impl<T> ValueDeserializer<T> {
    pub fn new() -> Self {
        Self {
            _resource: PhantomData,
        }
    }
}

impl<T> Default for ValueDeserializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Resource> Deserializer for ValueDeserializer<T> {
    type Output = T;

    fn deserialize(&self, values: Vec<NormalizedValue>) -> Result<Vec<T>> {
        values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                if !matches!(value, NormalizedValue::Map(_)) {
                    return Err(Error::Deserialize {
                        resource_type: T::TYPE.to_string(),
                        reason: format!("value #{} is a {}, expected a map", index, value.kind()),
                    });
                }
                serde_json::from_value::<T>(Value::from(value)).map_err(|e| Error::Deserialize {
                    resource_type: T::TYPE.to_string(),
                    reason: format!("value #{}: {}", index, e),
                })
            })
            .collect()
    }
}
