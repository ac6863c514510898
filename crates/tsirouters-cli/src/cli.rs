use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tsirouters",
    about = "Building controller registry and monitoring peer-list export",
    version
)]
pub struct Cli {
    /// Registry data directory [default: .tsirouters]
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// TOML config file [default: <data-dir>/config.toml when present]
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the registry files and seed the default buildings if empty
    Init,

    /// Add a building, or reactivate a removed one
    Add {
        /// Building number (positive integer)
        #[arg(allow_hyphen_values = true)]
        number: String,

        /// Controller IP address
        ip: String,
    },

    /// Mark a building as removed
    Remove {
        /// Building number (positive integer)
        #[arg(allow_hyphen_values = true)]
        number: String,
    },

    /// List active buildings and the last recorded activity
    List,

    /// Show the add/remove/reactivate audit trail
    Log,

    /// Write peer-list artifacts for the monitoring tool
    Export {
        #[command(subcommand)]
        target: ExportCommands,

        /// Output directory [default: <data-dir>/export]
        #[arg(long, global = true)]
        export_dir: Option<String>,

        /// Artifact format: tnr-v2 or ini-v1
        #[arg(long, global = true)]
        format: Option<String>,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum ExportCommands {
    /// Master list of every active building (TSIRouters.ini)
    Master,

    /// Peer list for one building (TSIRouters_<n>.ini)
    Single {
        /// Building number
        #[arg(allow_hyphen_values = true)]
        number: String,
    },

    /// Every peer list, bundled (all_configs.zip)
    All,
}
