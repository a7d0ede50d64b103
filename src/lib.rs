pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod fetch;
pub mod filter;
pub mod fs;
pub mod health;
pub mod hierarchy;
pub mod layout;
pub mod model;
pub mod render;
pub mod selection;
pub mod server;
pub mod style;
pub mod task;
pub mod widgets;

pub use api::{
    RingLensError, connect, health as check_health, layout_network, network, summary, suspects,
};
pub use cli::Cli;
pub use commands::{
    cmd_analyze, cmd_export, cmd_health, cmd_init, cmd_network, cmd_serve, cmd_summary,
    cmd_suspects,
};
pub use config::Config;
pub use controller::{Controller, UiEvent};
pub use filter::FilterState;
pub use model::AnalysisPayload;
pub use selection::ClusterSelection;
