use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Filter parameters for one fetched collection.
///
/// A thin newtype over a JSON object; ordering-insensitive deep equality is
/// what makes two [`Scope`](super::Scope)s identical, so incidental
/// re-creation of equal params never triggers a fetch/subscribe cycle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterParams(Map<String, Value>);

impl FilterParams {
    /// Empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter (builder style).
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Look up a parameter.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// True when no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the parameters.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for FilterParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
