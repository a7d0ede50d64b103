mod assets;
mod routes;

pub use routes::{AppState, ServeOptions, StreamEvent, TICK_INTERVAL, router, run_effects, serve};
