// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "surfacebook2-button")]
#[command(author, version, about = "Surface Book 2 button array driver")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path (default: ~/.config/surfacebook2-button/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Bind every button array and keep the devices alive until Ctrl-C
    #[command(visible_aliases = ["daemon"])]
    Run,

    /// List ACPI nodes offered to this driver
    #[command(visible_aliases = ["ls"])]
    List,

    /// Run the identity check against one node
    Probe {
        /// Instance name, e.g. MSHW0040:00
        instance: String,
    },

    /// Show the button table and how it is grouped
    Buttons,

    /// Print the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        init: bool,
    },
}
