pub mod context;
pub mod middleware;

pub use context::AdminContext;
pub use middleware::RequireToken;
