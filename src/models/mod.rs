//! Data models for the realty-sync engine.
//!
//! One type per file; everything re-exported here.

pub mod change_record;
pub mod collection_state;
pub mod entity;
pub mod filter_params;
pub mod mutation_state;
pub mod scope;
pub mod tenant_state;

pub use change_record::{ChangeKind, ChangeRecord};
pub use collection_state::CollectionState;
pub use entity::Entity;
pub use filter_params::FilterParams;
pub use mutation_state::MutationState;
pub use scope::Scope;
pub use tenant_state::TenantState;
