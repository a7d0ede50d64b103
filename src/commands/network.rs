use super::context::{CommandContext, emit, runtime, to_json};
use crate::api::{self, RingLensError};
use crate::cli::{NetworkArgs, NetworkFormat};
use crate::fs::default_fs;
use crate::render::Markdown;
use crate::render::svg::{NO_NETWORK, network_svg};
use crate::style;

pub fn cmd_network(args: NetworkArgs, api_url: Option<&str>) -> i32 {
    let ctx = match CommandContext::new(api_url) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    let canvas = ctx.config.layout.canvas();
    let result = rt.block_on(api::network(
        &ctx.client,
        &args.id,
        (canvas.width, canvas.height),
        args.ticks,
    ));
    let layout = match result {
        Ok(layout) => layout,
        Err(RingLensError::SuspectNotFound(_)) => {
            style::warning(NO_NETWORK);
            return 1;
        }
        Err(e) => {
            style::error(&format!("Failed to load network: {}", e));
            return 1;
        }
    };

    if layout.needs_tick() {
        style::hint(&format!(
            "Layout still moving after {} ticks; raise --ticks for a settled picture",
            args.ticks
        ));
    }

    let output = args.output.as_deref();
    match args.format {
        NetworkFormat::Markdown => emit(&layout.to_markdown(), output, true, default_fs()),
        NetworkFormat::Json => match to_json(&layout.frame(0)) {
            Ok(json) => emit(&json, output, false, default_fs()),
            Err(code) => code,
        },
        NetworkFormat::Svg => emit(
            &network_svg(&layout, canvas.width, canvas.height),
            output,
            false,
            default_fs(),
        ),
    }
}
