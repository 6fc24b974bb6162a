use std::str::FromStr;

use alloy::primitives::{Address, U256};
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::ledger::LedgerParams;

/// Deployment of one liquidity-mining ledger.
///
/// Addresses identify the collaborators the ledger is wired to; the
/// caller checks them against the instances it passes in.
#[derive(Debug, Deserialize, Clone)]
pub struct LedgerSettings {
    /// Address the ledger holds rewards and positions under
    pub address: Address,
    pub reward_token: Address,
    pub position_manager: Address,
    pub pool: Address,
    pub factory: Address,
    /// Reward emitted per second, decimal or `0x` hex (default 10^18)
    #[serde(default = "default_reward_rate_per_second")]
    pub reward_rate_per_second: String,
    #[serde(default)]
    pub genesis_timestamp: u64,
}

fn default_reward_rate_per_second() -> String {
    "1000000000000000000".to_string()
}

impl LedgerSettings {
    pub fn reward_rate(&self) -> Result<U256> {
        U256::from_str(self.reward_rate_per_second.trim()).with_context(|| {
            format!(
                "invalid reward_rate_per_second {:?}",
                self.reward_rate_per_second
            )
        })
    }

    pub fn params(&self) -> Result<LedgerParams> {
        Ok(LedgerParams {
            address: self.address,
            factory: self.factory,
            reward_rate_per_second: self.reward_rate()?,
            genesis_timestamp: self.genesis_timestamp,
        })
    }
}

/// Root application configuration.
///
/// Loaded from `config.{yaml,toml,json}`; any key can be overridden from the
/// environment, e.g. `LIQUIDITY_MINING__LEDGER__GENESIS_TIMESTAMP=0`.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub ledger: LedgerSettings,
}

impl Settings {
    pub fn new() -> Result<Self> {
        let s = Config::builder()
            .add_source(File::with_name("config"))
            .add_source(Environment::with_prefix("LIQUIDITY_MINING").separator("__"))
            .build()
            .context("failed to load configuration")?;

        s.try_deserialize().context("invalid configuration")
    }

    pub fn from_yaml(source: &str) -> Result<Self> {
        let s = Config::builder()
            .add_source(File::from_str(source, FileFormat::Yaml))
            .build()
            .context("failed to parse configuration")?;

        s.try_deserialize().context("invalid configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
ledger:
  address: "0x00000000000000000000000000000000000000d1"
  reward_token: "0x00000000000000000000000000000000000000e1"
  position_manager: "0xC36442b4a4522E871399CD717aBDD847Ab11FE88"
  pool: "0x00000000000000000000000000000000000000f1"
  factory: "0x1F98431c8aD98523631AE4a59f267346ea31F984"
"#;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_yaml(YAML).unwrap();
        let params = settings.ledger.params().unwrap();

        assert_eq!(
            params.reward_rate_per_second,
            U256::from(1_000_000_000_000_000_000u128)
        );
        assert_eq!(params.genesis_timestamp, 0);
        assert_eq!(params.address, settings.ledger.address);
        assert_eq!(params.factory, settings.ledger.factory);
    }

    #[test]
    fn test_hex_reward_rate() {
        let yaml = format!(
            "{YAML}  reward_rate_per_second: \"0x10\"\n  genesis_timestamp: 1700000000\n"
        );
        let settings = Settings::from_yaml(&yaml).unwrap();

        assert_eq!(settings.ledger.reward_rate().unwrap(), U256::from(16u8));
        assert_eq!(settings.ledger.genesis_timestamp, 1_700_000_000);
    }

    #[test]
    fn test_invalid_reward_rate() {
        let yaml = format!("{YAML}  reward_rate_per_second: \"lots\"\n");
        let settings = Settings::from_yaml(&yaml).unwrap();

        assert!(settings.ledger.reward_rate().is_err());
        assert!(settings.ledger.params().is_err());
    }

    #[test]
    fn test_missing_address_is_rejected() {
        let yaml = "ledger:\n  factory: \"0x1F98431c8aD98523631AE4a59f267346ea31F984\"\n";
        assert!(Settings::from_yaml(yaml).is_err());
    }
}
