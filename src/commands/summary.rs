use super::context::{CommandContext, emit, runtime, to_json};
use crate::api;
use crate::cli::{OutputFormat, SummaryArgs};
use crate::filter::FilterState;
use crate::fs::default_fs;
use crate::render::Markdown;
use crate::style;

pub fn cmd_summary(args: SummaryArgs, api_url: Option<&str>) -> i32 {
    let ctx = match CommandContext::new(api_url) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    let filters = FilterState {
        fan_window: args.fan_window,
        commission_retention: args.commission,
    };
    let widgets = match rt.block_on(api::summary(&ctx.client, args.cluster, &filters)) {
        Ok(widgets) => widgets,
        Err(e) => {
            style::error(&format!("Failed to load analysis: {}", e));
            style::hint("Upload a CSV first with `ringlens analyze <file>`");
            return 1;
        }
    };

    match args.format {
        OutputFormat::Markdown => emit(&widgets.to_markdown(), None, true, default_fs()),
        OutputFormat::Json => match to_json(&widgets) {
            Ok(json) => emit(&json, None, false, default_fs()),
            Err(code) => code,
        },
    }
}
