//! API extractors, response types and pagination utilities

pub mod extract;
pub mod pagination;
pub mod response;
