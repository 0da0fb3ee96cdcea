use super::FilterParams;

/// Identity of one logical live collection: tenant + table + filter params.
///
/// Two scopes are equal iff all three parts are deeply equal.  Scope equality
/// decides whether an in-flight fetch and an open subscription are still
/// current; the orchestrator never re-fetches or re-subscribes for an
/// unchanged scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    /// Owning tenant.
    pub tenant_id: String,
    /// Backend table name.
    pub table: String,
    /// Fetch filter parameters.
    pub params: FilterParams,
}

impl Scope {
    pub fn new(
        tenant_id: impl Into<String>,
        table: impl Into<String>,
        params: FilterParams,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            table: table.into(),
            params,
        }
    }

    /// True when `other` shares this scope's subscription key.
    ///
    /// Change-feed subscriptions are keyed on `(table, tenant)` only; a
    /// params-only change re-fetches without re-subscribing.
    pub fn same_feed(&self, other: &Scope) -> bool {
        self.tenant_id == other.tenant_id && self.table == other.table
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.tenant_id, self.table)
    }
}
