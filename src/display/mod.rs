//! Pure derived-value helpers behind the admin views.
//!
//! Nothing here performs I/O; every function maps already-fetched backend
//! values to what the UI shows.

pub mod chart;
pub mod date_range;
pub mod discount;
pub mod price;
pub mod status;
