mod analyze;
mod context;
mod export;
mod health;
mod init;
mod network;
mod serve;
mod summary;
mod suspects;

pub use analyze::cmd_analyze;
pub use context::CommandContext;
pub use export::cmd_export;
pub use health::cmd_health;
pub use init::{cmd_init, cmd_init_with_fs};
pub use network::cmd_network;
pub use serve::cmd_serve;
pub use summary::cmd_summary;
pub use suspects::cmd_suspects;
