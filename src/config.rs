use crate::address::WalletAddress;
use crate::cli::Args;
use crate::errors::AppError;
use crate::session::SessionContext;
use reqwest::Url;
use std::time::Duration;
use tracing::Level;

#[derive(Clone, Debug)]
pub struct Config {
    pub rpc_url: Url,
    pub search_url: Url,
    pub token_address: String,
    pub request_timeout: Duration,
    pub log_level: Level,
    pub wallets: Option<String>,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self, AppError> {
        let rpc_url = parse_endpoint("--rpc-url", &args.rpc_url)?;
        let search_url = parse_endpoint("--search-url", &args.search_url)?;

        WalletAddress::new(args.token_address.as_str())
            .to_address()
            .map_err(|e| AppError::Config(format!("--token-address: {e}")))?;

        if args.request_timeout_sec == 0 {
            return Err(AppError::Config(
                "--request-timeout-sec must be greater than 0".into(),
            ));
        }

        Ok(Config {
            rpc_url,
            search_url,
            token_address: args.token_address.trim().to_lowercase(),
            request_timeout: Duration::from_secs(args.request_timeout_sec),
            log_level: args.log_level.into(),
            wallets: args.wallets,
        })
    }

    /// Session described by `--wallets`, logged out when none were given.
    pub fn session(&self) -> SessionContext {
        match &self.wallets {
            Some(list) => SessionContext::from_address_list(list),
            None => SessionContext::logged_out(),
        }
    }
}

fn parse_endpoint(flag: &str, value: &str) -> Result<Url, AppError> {
    let url = Url::parse(value).map_err(|e| AppError::Config(format!("{flag}: {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::Config(format!(
            "{flag}: unsupported scheme '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{test_args, DEFAULT_RPC_URL, DEFAULT_TOKEN_ADDRESS};
    use crate::logging::LogLevel;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_from_args_defaults() {
        let config = Config::from_args(test_args()).unwrap();

        assert_eq!(config.rpc_url.as_str(), format!("{DEFAULT_RPC_URL}/"));
        assert_eq!(config.token_address, DEFAULT_TOKEN_ADDRESS);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.log_level, Level::INFO);
        assert!(!config.session().authenticated);
    }

    #[test]
    fn test_from_args_overrides() {
        let mut args = test_args();
        args.rpc_url = "http://127.0.0.1:8545".to_string();
        args.token_address = "0x91ECF2D7F0B1BAD77592F90A5F46A5E7FEF5E7F2".to_string();
        args.log_level = LogLevel::Debug;
        args.wallets = Some("0xabc,0xdef".to_string());

        let config = Config::from_args(args).unwrap();

        assert_eq!(config.rpc_url.as_str(), "http://127.0.0.1:8545/");
        assert_eq!(config.token_address, DEFAULT_TOKEN_ADDRESS);
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.session().wallets.len(), 2);
    }

    #[rstest]
    #[case("bad rpc url", |a: &mut Args| a.rpc_url = "not a url".into())]
    #[case("ws scheme", |a: &mut Args| a.rpc_url = "wss://aeneid.storyrpc.io".into())]
    #[case("bad search url", |a: &mut Args| a.search_url = "".into())]
    #[case("bad token", |a: &mut Args| a.token_address = "0x1234".into())]
    #[case("zero timeout", |a: &mut Args| a.request_timeout_sec = 0)]
    fn test_from_args_rejects(#[case] description: &str, #[case] mutate: fn(&mut Args)) {
        let mut args = test_args();
        mutate(&mut args);

        let result = Config::from_args(args);

        assert!(
            matches!(result, Err(AppError::Config(_))),
            "{description}: {result:?}"
        );
    }
}
