use crate::api;
use crate::config::{API_URL_ENV, Config};
use crate::fetch::ApiClient;
use crate::fs::FileSystem;
use crate::style;
use std::io;
use std::path::Path;

/// Shared setup for commands that talk to the backend.
pub struct CommandContext {
    pub config: Config,
    pub client: ApiClient,
}

impl CommandContext {
    /// Load `.ringlens.toml` from the working directory, apply URL overrides and
    /// build the HTTP client. Returns Err(exit_code) if setup fails.
    pub fn new(api_url: Option<&str>) -> Result<Self, i32> {
        let config = match std::env::current_dir() {
            Ok(dir) => Config::load(&dir).unwrap_or_else(|e| {
                style::warning(&format!("Failed to load config: {}. Using defaults.", e));
                Config::default()
            }),
            Err(_) => Config::default(),
        };

        let env_url = std::env::var(API_URL_ENV).ok();
        let config = match config.with_overrides(env_url.as_deref(), api_url) {
            Ok(config) => config,
            Err(e) => {
                style::error(&e.to_string());
                return Err(1);
            }
        };

        match api::connect(&config) {
            Ok(client) => Ok(Self { config, client }),
            Err(e) => {
                style::error(&format!("Could not create HTTP client: {}", e));
                Err(1)
            }
        }
    }
}

pub fn runtime() -> Result<tokio::runtime::Runtime, i32> {
    tokio::runtime::Runtime::new().map_err(|e| {
        style::error(&format!("Failed to start async runtime: {}", e));
        1
    })
}

/// Write to `output` when given, otherwise render markdown (or print raw text) to stdout.
pub fn emit(
    content: &str,
    output: Option<&Path>,
    markdown: bool,
    fs: &dyn FileSystem,
) -> i32 {
    if let Some(path) = output {
        if let Err(e) = fs.write(path, content.as_bytes()) {
            style::error(&format!("Failed to write {}: {}", style::path(path), e));
            return 1;
        }
        style::success(&format!("Wrote {}", style::path(path)));
        return 0;
    }

    let result = if markdown {
        style::render_markdown(content, &mut io::stdout())
    } else {
        println!("{}", content);
        Ok(())
    };
    match result {
        Ok(()) => 0,
        Err(e) => {
            style::error(&format!("Failed to write output: {}", e));
            1
        }
    }
}

pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String, i32> {
    serde_json::to_string_pretty(value).map_err(|e| {
        style::error(&format!("Failed to serialize output: {}", e));
        1
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFs;

    #[test]
    fn test_emit_to_file() {
        let fs = MockFs::new();
        let path = Path::new("/out/network.svg");
        assert_eq!(emit("<svg/>", Some(path), false, &fs), 0);
        assert_eq!(fs.contents(path).unwrap(), "<svg/>");
    }
}
