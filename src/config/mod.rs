//! Leave policy configuration.
//!
//! Accrual rates, caps, and the leave-year calendar origin are loaded from
//! YAML files rather than hard-coded.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{LeaveTypePolicy, LeaveTypesConfig, PolicyConfig, PolicyMetadata};
