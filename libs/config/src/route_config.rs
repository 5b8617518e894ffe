//! Route Configuration Module
//!
//! Provides configuration loading for trading route adapters.
//! Supports loading from TOML files with environment-specific overrides.

use crate::blockchain::{routers, swap, tokens};
use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use ethers_core::types::{Address, U256};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default settings file location
pub const DEFAULT_SETTINGS_PATH: &str = "config/route.toml";

/// Prefix for environment variable overrides (`ROUTE_NETWORK__RPC_URL=...`)
pub const ENV_PREFIX: &str = "ROUTE";

/// Immutable configuration of a single trading route
///
/// Defaults reproduce the mainnet Uniswap V2 deployment with slippage and
/// deadline protection effectively disabled (floor of 1, deadline of
/// `U256::MAX`). Callers wanting protection override either value per trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Router contract the route delegates to
    pub router: Address,
    /// Reserved asset id meaning "native currency"
    pub native_sentinel: Address,
    /// ERC-20 wrapper of the native currency
    pub wrapped_native: Address,
    /// Minimum acceptable output passed to every swap
    pub amount_out_min: U256,
    /// Deadline timestamp passed to every swap
    pub deadline: U256,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl RouteConfig {
    /// Uniswap V2 on Ethereum mainnet
    pub fn mainnet() -> Self {
        Self {
            router: routers::UNISWAP_V2_ROUTER,
            native_sentinel: tokens::ETHER,
            wrapped_native: tokens::WETH,
            amount_out_min: swap::DEFAULT_AMOUNT_OUT_MIN,
            deadline: swap::DEFAULT_DEADLINE,
        }
    }

    /// Reject configurations the route cannot operate with
    pub fn validate(&self) -> Result<()> {
        if self.router.is_zero() {
            bail!("Router address must not be zero");
        }
        if self.wrapped_native.is_zero() {
            bail!("Wrapped-native address must not be zero");
        }
        if self.wrapped_native == self.native_sentinel {
            bail!(
                "Wrapped-native token {:?} must differ from the native sentinel",
                self.wrapped_native
            );
        }
        if self.deadline.is_zero() {
            bail!("Deadline must not be zero");
        }
        Ok(())
    }
}

/// Settings file structure
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct RouteSettings {
    /// Global settings
    pub global: GlobalConfig,

    /// Route parameters; unset values fall back to mainnet defaults
    pub route: RouteSection,

    /// Node connection for the delegating provider
    pub network: NetworkConfig,
}

/// Global configuration settings
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct GlobalConfig {
    pub log_level: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Raw route section; amounts accept decimal, `0x` hex or `max`
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct RouteSection {
    pub router: Option<String>,
    pub native_sentinel: Option<String>,
    pub wrapped_native: Option<String>,
    pub amount_out_min: Option<String>,
    pub deadline: Option<String>,
}

/// Node connection settings
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct NetworkConfig {
    pub rpc_url: Option<String>,
    pub chain_id: Option<u64>,
}

impl RouteSettings {
    /// Load settings from files with environment overrides
    ///
    /// An explicit `base_path` must exist; the default location is optional
    /// so the route can run on mainnet defaults alone.
    pub fn load(base_path: Option<&Path>, environment: Option<&str>) -> Result<Self> {
        Self::load_with_prefix(base_path, environment, ENV_PREFIX)
    }

    /// Same as [`RouteSettings::load`] with a custom environment prefix
    pub fn load_with_prefix(
        base_path: Option<&Path>,
        environment: Option<&str>,
        env_prefix: &str,
    ) -> Result<Self> {
        let (base, required) = match base_path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_SETTINGS_PATH), false),
        };

        let mut builder = Config::builder().add_source(File::from(base.as_path()).required(required));

        // Environment-specific overlay lives next to the base file
        if let Some(env) = environment {
            let env_file = base
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("environments")
                .join(format!("{}.toml", env));

            if env_file.exists() {
                info!("Loading environment config: {:?}", env_file);
                builder = builder.add_source(File::from(env_file));
            } else {
                warn!("Environment config not found: {:?}", env_file);
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build().context("Failed to build configuration")?;

        let settings: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        debug!("Loaded route settings: {:?}", settings);
        Ok(settings)
    }

    /// Resolve the route section into a validated [`RouteConfig`]
    pub fn route_config(&self) -> Result<RouteConfig> {
        let defaults = RouteConfig::mainnet();
        let section = &self.route;

        let config = RouteConfig {
            router: optional_address("route.router", &section.router)?.unwrap_or(defaults.router),
            native_sentinel: optional_address("route.native_sentinel", &section.native_sentinel)?
                .unwrap_or(defaults.native_sentinel),
            wrapped_native: optional_address("route.wrapped_native", &section.wrapped_native)?
                .unwrap_or(defaults.wrapped_native),
            amount_out_min: optional_amount("route.amount_out_min", &section.amount_out_min)?
                .unwrap_or(defaults.amount_out_min),
            deadline: optional_amount("route.deadline", &section.deadline)?
                .unwrap_or(defaults.deadline),
        };

        config.validate()?;
        Ok(config)
    }

    /// Expand environment variables in string values
    pub fn expand_env_vars(&mut self) -> Result<()> {
        if let Some(rpc) = &self.network.rpc_url {
            let expanded = shellexpand::env(rpc).context("Failed to expand RPC URL")?;
            self.network.rpc_url = Some(expanded.to_string());
        }
        Ok(())
    }
}

/// Convenience function to load settings with variables expanded
pub fn load_settings(path: Option<&Path>, environment: Option<&str>) -> Result<RouteSettings> {
    let mut settings = RouteSettings::load(path, environment)?;
    settings.expand_env_vars()?;
    Ok(settings)
}

/// Parse an amount written as decimal, `0x`-prefixed hex, or `max`
pub fn parse_amount(raw: &str) -> Result<U256> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("max") {
        return Ok(U256::MAX);
    }
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        return U256::from_str_radix(hex, 16)
            .map_err(|e| anyhow::anyhow!("Invalid hex amount {:?}: {}", raw, e));
    }
    U256::from_dec_str(raw).map_err(|e| anyhow::anyhow!("Invalid decimal amount {:?}: {}", raw, e))
}

fn optional_address(field: &str, raw: &Option<String>) -> Result<Option<Address>> {
    raw.as_deref()
        .map(|value| {
            value
                .trim()
                .parse::<Address>()
                .with_context(|| format!("Invalid address for {}: {:?}", field, value))
        })
        .transpose()
}

fn optional_amount(field: &str, raw: &Option<String>) -> Result<Option<U256>> {
    raw.as_deref()
        .map(|value| parse_amount(value).with_context(|| format!("Invalid amount for {}", field)))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_mainnet_defaults() {
        let config = RouteConfig::default();

        assert_eq!(config.router, routers::UNISWAP_V2_ROUTER);
        assert_eq!(config.native_sentinel, tokens::ETHER);
        assert_eq!(config.wrapped_native, tokens::WETH);
        assert_eq!(config.amount_out_min, U256::one());
        assert_eq!(config.deadline, U256::MAX);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_broken_configs() {
        let mut config = RouteConfig::mainnet();
        config.router = Address::zero();
        assert!(config.validate().is_err());

        let mut config = RouteConfig::mainnet();
        config.wrapped_native = config.native_sentinel;
        assert!(config.validate().is_err());

        let mut config = RouteConfig::mainnet();
        config.deadline = U256::zero();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_amount_formats() {
        assert_eq!(parse_amount("1").unwrap(), U256::one());
        assert_eq!(parse_amount(" 0x10 ").unwrap(), U256::from(16u64));
        assert_eq!(parse_amount("MAX").unwrap(), U256::MAX);
        assert_eq!(
            parse_amount("1000000000000000000").unwrap(),
            U256::exp10(18)
        );
        assert!(parse_amount("one").is_err());
        assert!(parse_amount("0xzz").is_err());
    }

    #[test]
    fn test_load_base_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("route.toml");

        let config_content = r#"
[global]
log_level = "debug"

[route]
amount_out_min = "1000"
deadline = "0x6553f100"

[network]
rpc_url = "http://localhost:8545"
chain_id = 1
"#;

        fs::write(&config_path, config_content).unwrap();

        let settings =
            RouteSettings::load_with_prefix(Some(&config_path), None, "ROUTE_TEST_BASE").unwrap();
        assert_eq!(settings.global.log_level, "debug");
        assert_eq!(
            settings.network.rpc_url.as_deref(),
            Some("http://localhost:8545")
        );
        assert_eq!(settings.network.chain_id, Some(1));

        let route = settings.route_config().unwrap();
        assert_eq!(route.router, routers::UNISWAP_V2_ROUTER);
        assert_eq!(route.amount_out_min, U256::from(1000u64));
        assert_eq!(route.deadline, U256::from(1_700_000_000u64));
    }

    #[test]
    fn test_environment_overlay() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("route.toml");
        fs::write(
            &config_path,
            "[route]\nwrapped_native = \"0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2\"\n",
        )
        .unwrap();

        let env_dir = dir.path().join("environments");
        fs::create_dir_all(&env_dir).unwrap();
        fs::write(
            env_dir.join("sepolia.toml"),
            "[route]\nwrapped_native = \"0x7b79995e5f793A07Bc00c21412e50Ecae098E7f9\"\n",
        )
        .unwrap();

        let settings =
            RouteSettings::load_with_prefix(Some(&config_path), Some("sepolia"), "ROUTE_TEST_ENV")
                .unwrap();
        let route = settings.route_config().unwrap();
        let expected: Address = "0x7b79995e5f793A07Bc00c21412e50Ecae098E7f9".parse().unwrap();
        assert_eq!(route.wrapped_native, expected);
    }

    #[test]
    fn test_environment_variable_override() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("route.toml");
        fs::write(&config_path, "[global]\nlog_level = \"info\"\n").unwrap();

        std::env::set_var("ROUTE_TEST_VARS_ROUTE__AMOUNT_OUT_MIN", "77");
        let settings =
            RouteSettings::load_with_prefix(Some(&config_path), None, "ROUTE_TEST_VARS").unwrap();
        std::env::remove_var("ROUTE_TEST_VARS_ROUTE__AMOUNT_OUT_MIN");

        assert_eq!(settings.route_config().unwrap().amount_out_min, U256::from(77u64));
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(RouteSettings::load_with_prefix(Some(&missing), None, "ROUTE_TEST_MISSING").is_err());
    }

    #[test]
    fn test_invalid_address_is_reported() {
        let settings = RouteSettings {
            route: RouteSection {
                router: Some("not-an-address".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let err = settings.route_config().unwrap_err();
        assert!(format!("{:#}", err).contains("route.router"));
    }

    #[test]
    fn test_expand_env_vars_in_rpc_url() {
        std::env::set_var("ROUTE_TEST_RPC_HOST", "node.internal");
        let mut settings = RouteSettings {
            network: NetworkConfig {
                rpc_url: Some("http://${ROUTE_TEST_RPC_HOST}:8545".to_string()),
                chain_id: None,
            },
            ..Default::default()
        };

        settings.expand_env_vars().unwrap();
        assert_eq!(
            settings.network.rpc_url.as_deref(),
            Some("http://node.internal:8545")
        );
    }
}
