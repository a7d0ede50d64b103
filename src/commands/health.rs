use super::context::{CommandContext, emit, runtime};
use crate::api;
use crate::cli::HealthArgs;
use crate::fs::default_fs;
use crate::health::{Readiness, SystemStatus, spawn_monitor};
use crate::render::Markdown;
use crate::style;
use std::sync::Arc;

fn status_line(status: &SystemStatus) -> String {
    let latency = status
        .latency_ms
        .map(|ms| format!(" ({:.0} ms)", ms))
        .unwrap_or_default();
    format!("System {}{}", style::readiness(status.readiness), latency)
}

pub fn cmd_health(args: HealthArgs, api_url: Option<&str>) -> i32 {
    let ctx = match CommandContext::new(api_url) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    if !args.watch {
        let status = rt.block_on(api::health(&ctx.client));
        let code = emit(&status.to_markdown(), None, true, default_fs());
        return if status.readiness == Readiness::Online { code } else { 1 };
    }

    let interval = ctx.config.health.poll_interval;
    style::status(&format!(
        "Polling {} every {}s (Ctrl+C to stop)",
        style::url(ctx.client.base_url().as_str()),
        interval.as_secs()
    ));
    rt.block_on(async move {
        let (_monitor, mut rx) = spawn_monitor(Arc::new(ctx.client), interval);
        loop {
            tokio::select! {
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let status = rx.borrow_and_update().clone();
                    style::status(&status_line(&status));
                }
                _ = tokio::signal::ctrl_c() => break,
            }
        }
    });
    0
}
