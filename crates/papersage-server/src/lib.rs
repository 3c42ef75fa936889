//! PaperSage server — HTTP surface over the analysis pipeline.

pub mod cache;
pub mod cli;
pub mod routes;
pub mod state;

pub use cache::ResultCache;
pub use routes::build_router;
pub use state::AppState;
