use super::context::{CommandContext, emit, runtime};
use crate::cli::AnalyzeArgs;
use crate::fs::{FileSystem, default_fs};
use crate::render::Markdown;
use crate::style;

pub fn cmd_analyze(args: AnalyzeArgs, api_url: Option<&str>) -> i32 {
    let contents = match default_fs().read(&args.csv) {
        Ok(bytes) => bytes,
        Err(e) => {
            style::error(&format!("Could not read {}: {}", style::path(&args.csv), e));
            return 1;
        }
    };
    let file_name = args
        .csv
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload.csv".to_string());

    let ctx = match CommandContext::new(api_url) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    style::status(&format!("Uploading {} ({} bytes)", file_name, contents.len()));
    let receipt = match rt.block_on(ctx.client.analyze_csv(&file_name, contents)) {
        Ok(receipt) => receipt,
        Err(e) => {
            style::error(&format!("Analysis failed: {}", e));
            return 1;
        }
    };

    let code = emit(&receipt.to_markdown(), None, true, default_fs());
    style::hint("Inspect the results with `ringlens summary` or `ringlens serve --open`");
    code
}
