//! API layer - HTTP endpoints and middleware

pub mod health;
pub mod middleware;
pub mod model_info;
pub mod predict;
pub mod router;
pub mod state;
pub mod token;
pub mod types;

pub use middleware::{BearerCredential, RequireSubject};
pub use router::create_router;
pub use state::AppState;
