//! Session-owned result lists.
//!
//! Every logged-in session owns one result list per view and one receipt
//! list. Refreshes are tagged with a generation number so that a slow
//! response can never overwrite a newer one. Idle sessions expire.

pub mod report;
pub mod state;
pub mod store;


pub use report::ReportSession;
pub use state::{Generation, Publish, ViewSnapshot, ViewState};
pub use store::SessionStore;
