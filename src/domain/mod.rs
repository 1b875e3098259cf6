//! Mirrors of the marketplace backend records.
//!
//! The backend owns validation and lifecycle; these types only carry the
//! fields the admin views read, deserialized leniently.

pub mod bookings;
pub mod dashboard;
pub mod lenient;
pub mod pricing;
pub mod reports;

pub use bookings::*;
pub use dashboard::*;
pub use pricing::*;
pub use reports::*;
