use crate::{config::Config, errors::AppError, logging::LogLevel};
use anyhow::{Error, Result};
use clap::{CommandFactory, Parser};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use twelf::{config, Layer};

pub const DEFAULT_RPC_URL: &str = "https://aeneid.storyrpc.io";
pub const DEFAULT_SEARCH_URL: &str = "http://localhost:3000/api/search-by-owner";
pub const DEFAULT_TOKEN_ADDRESS: &str = "0x91ecf2d7f0b1bad77592f90a5f46a5e7fef5e7f2";

const ENV_PREFIX: &str = "STORY_PORTFOLIO_";

static SHOULD_SKIP_SERIALIZNG_FIELDS: AtomicBool = AtomicBool::new(false);

fn should_skip_serializng_fields<T>(_: &T) -> bool {
    SHOULD_SKIP_SERIALIZNG_FIELDS.load(Ordering::SeqCst)
}

#[derive(Parser, Debug, Serialize, Clone)]
#[command(author,
          name = "story-portfolio",
          bin_name = "story-portfolio",
          version,
          about,
          long_about = None)]
#[config]
pub struct Args {
    /// JSON-RPC endpoint used for the balanceOf eth_call
    #[arg(long, default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Owned-assets search endpoint, POSTed with {"ownerAddress": ...}
    #[arg(long, default_value = DEFAULT_SEARCH_URL)]
    pub search_url: String,

    /// ERC20 contract whose balance is displayed
    #[arg(long, default_value = DEFAULT_TOKEN_ADDRESS)]
    pub token_address: String,

    #[arg(long = "request-timeout-sec", default_value = "30")]
    pub request_timeout_sec: u64,

    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,

    /// Comma separated connected wallet addresses, first non-empty one wins
    #[arg(long)]
    pub wallets: Option<String>,

    #[arg(long, help = "Write the resolved settings to the configuration file")]
    #[serde(skip_serializing_if = "should_skip_serializng_fields")]
    #[serde(default)]
    init: bool,

    #[arg(long, help = "Path to an existing configuration file")]
    #[serde(skip_serializing_if = "should_skip_serializng_fields")]
    config: Option<PathBuf>,
}

pub fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("story-portfolio")
        .join("config.toml")
}

impl Args {
    fn parse_args(config_path: &Path) -> Result<Args, AppError> {
        let matches = Self::command().get_matches();

        let mut config_layers = vec![
            Layer::Env(Some(String::from(ENV_PREFIX))),
            Layer::Clap(matches),
        ];
        if config_path.exists() {
            config_layers.insert(0, Layer::Toml(config_path.to_path_buf()));
        }

        Self::with_layers(&config_layers).map_err(|e| match e {
            twelf::Error::Toml(_) => AppError::Config(format!(
                "Failed to parse config file '{}'",
                config_path.to_string_lossy()
            )),
            _ => AppError::Config(e.to_string()),
        })
    }

    /// Resolves file, environment and flag layers into a runtime `Config`.
    /// With `--init` the resolved settings are also written to disk.
    pub fn init() -> Result<Config, AppError> {
        let initial_args = Args::parse();
        let config_path = initial_args.config.unwrap_or_else(get_config_path);

        let arguments = Args::parse_args(&config_path)?;

        SHOULD_SKIP_SERIALIZNG_FIELDS.store(true, Ordering::SeqCst);

        if arguments.init {
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }
            arguments
                .to_file(&config_path)
                .map_err(|e| AppError::Config(e.to_string()))?;
            eprintln!("Config has been written to {config_path:?}");
        }

        Config::from_args(arguments)
    }

    fn to_file(&self, file_path: &Path) -> Result<()> {
        let toml_string = toml::to_string(self).map_err(Error::new)?;
        let mut file = fs::File::create(file_path)?;
        file.write_all(toml_string.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_args() -> Args {
    Args {
        rpc_url: DEFAULT_RPC_URL.to_string(),
        search_url: DEFAULT_SEARCH_URL.to_string(),
        token_address: DEFAULT_TOKEN_ADDRESS.to_string(),
        request_timeout_sec: 30,
        log_level: LogLevel::Info,
        wallets: None,
        init: false,
        config: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_file_round_trips_through_toml() {
        let dir = std::env::temp_dir().join(format!("story-portfolio-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let mut args = test_args();
        args.wallets = Some("0xabc".to_string());
        args.to_file(&path).unwrap();

        let written: toml::Value = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["rpc_url"].as_str(), Some(DEFAULT_RPC_URL));
        assert_eq!(written["wallets"].as_str(), Some("0xabc"));
        assert_eq!(written["log_level"].as_str(), Some("info"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }
}
