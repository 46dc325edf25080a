use clap::Parser;
use folio::discovery::DiscoveryConfig;
use std::path::PathBuf;

/// Directory scanned for `README*.md` files when none is configured, relative to the executable.
const DEFAULT_DISCOVERY_DIR: &str = "docs";

const LOG_FILE_NAME: &str = "crm-base.log";

/// MCP server publishing the CRM base documentation over stdio.
#[derive(Debug, Clone, Parser)]
#[command(name = "crm-base", version, about)]
pub struct Config {
    /// Directory scanned for README*.md files at startup [default: <executable dir>/docs]
    #[arg(long, env = "CRM_BASE_DISCOVERY_DIR", value_name = "DIR")]
    pub discovery_dir: Option<PathBuf>,

    /// Serve only the built-in documents
    #[arg(long)]
    pub no_discovery: bool,

    /// Directory for the daily log file [default: the system temp dir]
    #[arg(long, env = "CRM_BASE_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Where discovery should look, or `None` when it is disabled or no directory can be
    /// determined.
    pub fn discovery(&self) -> Option<DiscoveryConfig> {
        if self.no_discovery {
            return None;
        }
        match &self.discovery_dir {
            Some(dir) => Some(DiscoveryConfig::new(dir)),
            None => match DiscoveryConfig::beside_executable(DEFAULT_DISCOVERY_DIR) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!(error = %e, "Cannot locate the executable, discovery disabled");
                    None
                }
            },
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn log_file_name(&self) -> &'static str {
        LOG_FILE_NAME
    }
}
