use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of a tenant-scoped collection.
///
/// Every entity carries an opaque id, the owning tenant (`agency_id`), and a
/// creation timestamp; all remaining columns land in `fields` via serde
/// flattening.  Equality is full structural equality; the equality checker
/// relies on it to suppress no-op snapshot replacements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Opaque row identifier.
    pub id: String,
    /// Owning tenant identifier.
    pub agency_id: String,
    /// Creation timestamp as reported by the backend.
    #[serde(default)]
    pub created_at: String,
    /// Remaining columns.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Entity {
    /// Create an entity with no extra columns.
    pub fn new(id: impl Into<String>, agency_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            agency_id: agency_id.into(),
            created_at: String::new(),
            fields: Map::new(),
        }
    }

    /// Attach an extra column (builder style).
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }
}
