//! Common types used across the application.

pub mod id;
pub mod pagination;
pub mod window;


pub use id::*;
pub use pagination::RowRange;
pub use window::{DateWindow, InvalidWindow};
