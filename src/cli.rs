use crate::filter::FanWindow;
use crate::selection::ClusterSelection;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ringlens")]
#[command(about = "Analyst dashboard for financial-crime detection results")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Detection backend base URL (overrides RINGLENS_API_URL and .ringlens.toml)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Verbose diagnostics (debug-level logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the interactive dashboard server
    Serve(ServeArgs),

    /// Print the derived dashboard widgets for the latest analysis
    Summary(SummaryArgs),

    /// List suspects under investigation
    Suspects(SuspectsArgs),

    /// Lay out a suspect's ego network
    Network(NetworkArgs),

    /// Show backend readiness
    Health(HealthArgs),

    /// Download the raw analysis export
    Export(ExportArgs),

    /// Upload a transaction CSV for analysis
    Analyze(AnalyzeArgs),

    /// Generate a starter .ringlens.toml configuration file
    Init(InitArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// Port to serve on
    #[arg(short, long, default_value = "3000")]
    pub port: u16,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SummaryArgs {
    /// Cluster scope: all, websites, mule_accounts, suspected_distribution
    #[arg(long, default_value = "all")]
    pub cluster: ClusterSelection,

    /// Minimum fan-in/out ratio window
    #[arg(long, default_value = "high")]
    pub fan_window: FanWindow,

    /// Only entities flagged as commission-retaining
    #[arg(long)]
    pub commission: bool,

    #[arg(short, long, default_value = "markdown")]
    pub format: OutputFormat,
}

#[derive(Parser, Debug, Clone, Default)]
pub struct SuspectsArgs {
    /// Case-insensitive account id substring
    #[arg(long)]
    pub search: Option<String>,

    /// Hide circular-pattern suspects
    #[arg(long)]
    pub no_circular: bool,

    /// Hide smurfing-pattern suspects
    #[arg(long)]
    pub no_smurfing: bool,

    #[arg(short, long, default_value = "markdown")]
    pub format: OutputFormat,
}

#[derive(Parser, Debug, Clone)]
pub struct NetworkArgs {
    /// Suspect account id
    pub id: String,

    /// Maximum simulation ticks before giving up on rest
    #[arg(long, default_value = "1000")]
    pub ticks: usize,

    #[arg(short, long, default_value = "markdown")]
    pub format: NetworkFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct HealthArgs {
    /// Keep polling at the configured interval until Ctrl+C
    #[arg(short, long)]
    pub watch: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ExportArgs {
    #[arg(short, long, default_value = "analysis_export.json")]
    pub output: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Transaction CSV to upload
    pub csv: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Directory where to create .ringlens.toml (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum NetworkFormat {
    #[default]
    Markdown,
    Json,
    Svg,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClusterKey;

    #[test]
    fn test_summary_flags() {
        let cli = Cli::parse_from([
            "ringlens",
            "--api-url",
            "http://10.0.0.5:8001",
            "summary",
            "--cluster",
            "mule_accounts",
            "--fan-window",
            "medium",
        ]);
        assert_eq!(cli.api_url.as_deref(), Some("http://10.0.0.5:8001"));
        let Command::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(args.cluster, ClusterSelection::Cluster(ClusterKey::MuleAccounts));
        assert_eq!(args.fan_window, FanWindow::Medium);
    }

    #[test]
    fn test_unknown_cluster_rejected() {
        assert!(Cli::try_parse_from(["ringlens", "summary", "--cluster", "banks"]).is_err());
    }

    #[test]
    fn test_global_verbose_after_subcommand() {
        let cli = Cli::parse_from(["ringlens", "network", "0xA", "-v", "--format", "svg"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Network(ref a) if a.id == "0xA"));
    }
}
