pub mod config;
pub mod models;
pub mod chain;
pub mod engine;
pub mod handlers;
pub mod utils;
pub mod error;

pub use error::types::*;
pub use engine::VerdictEngine;
pub use handlers::{create_router, AppState};
pub use models::{Confidence, Target, Verdict, VerdictContract};
