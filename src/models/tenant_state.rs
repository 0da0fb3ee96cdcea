/// Snapshot of the tenant resolution source.
///
/// Delivered over a `tokio::sync::watch` channel injected into the client,
/// so the engine is testable with fake resolvers instead of ambient auth
/// state.  `resolving` is true while authentication is still in progress;
/// once it settles, `tenant_id` is `Some` for a tenant-bound identity and
/// `None` for an identity with no tenant attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantState {
    /// Resolved tenant, if any.
    pub tenant_id: Option<String>,
    /// Whether resolution is still pending.
    pub resolving: bool,
}

impl TenantState {
    /// Resolution still in progress.
    pub fn resolving() -> Self {
        Self {
            tenant_id: None,
            resolving: true,
        }
    }

    /// Resolution finished with a tenant.
    pub fn resolved(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: Some(tenant_id.into()),
            resolving: false,
        }
    }

    /// Resolution finished without a tenant.
    pub fn no_tenant() -> Self {
        Self {
            tenant_id: None,
            resolving: false,
        }
    }
}

impl Default for TenantState {
    /// Auth starts pending.
    fn default() -> Self {
        Self::resolving()
    }
}
