pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use crate::config::toml_config::HackathonConfig;
#[cfg(feature = "cli")]
use crate::utils::error::Result;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "hackathon")]
#[command(about = "Hackathon team scoring, ranking and reporting")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the directory data and report paths are relative to
    #[arg(long, global = true)]
    pub base_dir: Option<String>,

    /// Override the team data CSV path
    #[arg(long, global = true)]
    pub data_file: Option<String>,

    /// Override the report output path
    #[arg(long, global = true)]
    pub report_file: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Load team data and write the final report
    Report,
    /// Print the ranked team list
    Rank {
        /// Only show teams in this category (exact match)
        #[arg(long)]
        category: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the full details of one team
    Show { id: u32 },
    /// Print total teams, average score and top team
    Summary {
        #[arg(long)]
        json: bool,
    },
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入設定檔（未指定時使用預設值），再套用命令列覆蓋
    pub fn resolve_config(&self) -> Result<HackathonConfig> {
        let mut config = match &self.config {
            Some(path) => HackathonConfig::from_file(path)?,
            None => HackathonConfig::default(),
        };

        if let Some(base_dir) = &self.base_dir {
            config.files.base_dir = base_dir.clone();
        }
        if let Some(data_file) = &self.data_file {
            config.files.data_file = data_file.clone();
        }
        if let Some(report_file) = &self.report_file {
            config.files.report_file = report_file.clone();
        }

        Ok(config)
    }
}
