use super::context::{CommandContext, runtime};
use crate::cli::ServeArgs;
use crate::server::{self, ServeOptions};
use crate::style;
use std::sync::Arc;

pub fn cmd_serve(args: ServeArgs, api_url: Option<&str>) -> i32 {
    let ctx = match CommandContext::new(api_url) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    style::status(&format!("Backend: {}", style::url(ctx.client.base_url().as_str())));
    let options = ServeOptions {
        port: args.port,
        open_browser: args.open,
        canvas: ctx.config.layout.canvas(),
        health_interval: ctx.config.health.poll_interval,
    };

    if let Err(e) = rt.block_on(server::serve(Arc::new(ctx.client), options)) {
        style::error(&format!("Server failed: {}", e));
        return 1;
    }
    0
}
