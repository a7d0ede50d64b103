use super::context::{CommandContext, runtime};
use crate::cli::ExportArgs;
use crate::fs::{FileSystem, default_fs};
use crate::style;
use std::path::Path;

pub fn cmd_export(args: ExportArgs, api_url: Option<&str>) -> i32 {
    let ctx = match CommandContext::new(api_url) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    match rt.block_on(ctx.client.export_json()) {
        Ok(bytes) => save_export(&args.output, &bytes, default_fs()),
        Err(e) => {
            style::error(&format!("Export failed: {}", e));
            1
        }
    }
}

/// The export is stored verbatim, never re-encoded.
pub fn save_export(path: &Path, bytes: &[u8], fs: &dyn FileSystem) -> i32 {
    if let Err(e) = fs.write(path, bytes) {
        style::error(&format!("Failed to write export file: {}", e));
        return 1;
    }
    style::success(&format!(
        "Export saved to {} ({} bytes)",
        style::path(path),
        bytes.len()
    ));
    0
}
