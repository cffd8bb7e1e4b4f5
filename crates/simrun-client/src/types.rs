//! Request and result values exchanged with the simulation service
//!
//! Both are opaque JSON: the client never interprets simulation parameters,
//! and only peeks at the `snapshots` field of a result.

use crate::error::{Result, SimulationError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the result field holding the trajectory samples
pub const SNAPSHOTS_FIELD: &str = "snapshots";

/// Simulation parameters, serialized verbatim as a JSON object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimulationRequest(Map<String, Value>);

impl SimulationRequest {
    /// Create an empty request
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a request from any value that serializes to a JSON object
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let value = serde_json::to_value(value).map_err(SimulationError::Encode)?;
        Self::try_from(value)
    }

    /// Set a field, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style variant of [`insert`](Self::insert)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no field is set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Underlying field map
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for SimulationRequest {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for SimulationRequest {
    type Error = SimulationError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(SimulationError::Encode(serde::ser::Error::custom(format!(
                "simulation request must be a JSON object, got {}",
                json_kind(&other)
            )))),
        }
    }
}

/// Decoded response of the simulation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimulationResult(Value);

impl SimulationResult {
    /// Wrap a raw JSON value
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Ordered trajectory samples
    ///
    /// Returns `None` when the service sent no `snapshots` array. The shape of
    /// an individual snapshot is owned by the service and is not checked.
    pub fn snapshots(&self) -> Option<&[Value]> {
        self.0
            .get(SNAPSHOTS_FIELD)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    /// Look up an arbitrary top-level field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Raw JSON value
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consume the result, returning the raw JSON value
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Reinterpret the result as a caller-defined type
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        T::deserialize(&self.0).map_err(SimulationError::ResultShape)
    }
}

impl From<Value> for SimulationResult {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
