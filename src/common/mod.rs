pub mod geo;
mod state;

pub use state::{AppState, CachedResponse, ResponseCache};
