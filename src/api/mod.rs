//! HTTP API module for the leave engine.
//!
//! This is the integration surface for the surrounding application and its
//! schedulers: accrual runs, ledger initialization, settlement, drift
//! reconciliation, and balance reads. The engine owns no wire protocol of
//! its own; this router is the shim a host mounts.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AccrualRunRequest, BalancesQuery, InitializeRequest, ReconciliationRequest, SettlementRequest,
};
pub use response::{ApiError, BalancesResponse};
pub use state::AppState;
