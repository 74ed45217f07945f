use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
}

impl ServerConfig {
    /// Development mode surfaces upstream error detail in 500 bodies.
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub statement_timeout_millis: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NodeConfig {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub pair: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RewardConfig {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub token_policy: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PriceProviderConfig {
    pub provider: String,
    pub token_id: String,
    pub api_key: Option<String>,
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub api_keys: Vec<String>,
    /// Low-balance alert threshold in lovelace.
    #[serde(default)]
    pub ada_threshold: u64,
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
    #[serde(default)]
    pub reward: RewardConfig,
    pub price_provider: PriceProviderConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Self::defaults()?
            // Add in settings from config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in settings from environment variables with prefix ORACLE_,
            // "__" separating nesting levels so underscored field names stay
            // intact. E.g. `ORACLE_DATABASE__PASSWORD=foo ./target/app` sets
            // `database.password`, ORACLE_PRICE_PROVIDER__TOKEN_ID sets
            // `price_provider.token_id`.
            .add_source(Environment::with_prefix("oracle").separator("__"))
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn defaults() -> Result<config::builder::ConfigBuilder<config::builder::DefaultState>, ConfigError>
    {
        Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 4000)?
            .set_default("server.environment", "development")?
            .set_default("database.host", "localhost")?
            .set_default("database.port", 5432)?
            .set_default("database.database", "cexplorer")?
            .set_default("database.user", "")?
            .set_default("database.password", "")?
            .set_default("database.max_connections", 20)?
            .set_default("database.connect_timeout_secs", 20)?
            .set_default("database.idle_timeout_secs", 30)?
            .set_default("database.statement_timeout_millis", 30_000)?
            .set_default("price_provider.provider", "coingecko")?
            .set_default("price_provider.token_id", "cardano")?
            .set_default("price_provider.cache_ttl_secs", 300)
    }

    /// Field-level validation of everything the process cannot run without.
    /// A failure here is fatal at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database.host.is_empty() {
            errors.push("database.host is required".to_string());
        }
        if self.database.database.is_empty() {
            errors.push("database.database is required".to_string());
        }
        if self.database.user.is_empty() {
            errors.push("database.user is required".to_string());
        }
        if self.database.password.is_empty() {
            errors.push("database.password is required".to_string());
        }

        if self.api_keys.is_empty() || self.api_keys.iter().any(|k| k.trim().is_empty()) {
            errors.push("at least one non-empty API key is required".to_string());
        }

        if self.nodes.is_empty() {
            errors.push("at least one node configuration is required".to_string());
        }
        for (index, node) in self.nodes.iter().enumerate() {
            if node.address.trim().is_empty() {
                errors.push(format!("nodes[{index}].address is required"));
            }
            if node.pair.trim().is_empty() {
                errors.push(format!("nodes[{index}].pair must be a non-empty string"));
            }
        }

        if self.reward.address.trim().is_empty() {
            errors.push("reward.address is required".to_string());
        }
        if self.reward.token_policy.trim().is_empty() {
            errors.push("reward.token_policy is required".to_string());
        }

        if self.price_provider.provider.trim().is_empty() {
            errors.push("price_provider.provider is required".to_string());
        }
        if self.price_provider.token_id.trim().is_empty() {
            errors.push("price_provider.token_id is required".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(format!(
                "configuration validation failed:\n- {}",
                errors.join("\n- ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 4000,
                environment: "development".into(),
            },
            database: DatabaseConfig {
                host: "localhost".into(),
                port: 5432,
                database: "cexplorer".into(),
                user: "readonly".into(),
                password: "secret".into(),
                max_connections: 20,
                connect_timeout_secs: 20,
                idle_timeout_secs: 30,
                statement_timeout_millis: 30_000,
            },
            api_keys: vec!["test-key".into()],
            ada_threshold: 1_000_000_000,
            nodes: vec![NodeConfig { address: "addr1qxyz".into(), pair: "ADA/USD".into() }],
            reward: RewardConfig {
                address: "addr1reward".into(),
                token_policy: "a0".repeat(28),
            },
            price_provider: PriceProviderConfig {
                provider: "coingecko".into(),
                token_id: "cardano".into(),
                api_key: None,
                cache_ttl_secs: 300,
            },
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn missing_api_keys_is_rejected() {
        let mut config = valid_config();
        config.api_keys.clear();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("API key"));
    }

    #[test]
    fn empty_node_fields_are_itemized() {
        let mut config = valid_config();
        config.nodes.push(NodeConfig { address: String::new(), pair: "  ".into() });
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("nodes[1].address"));
        assert!(err.contains("nodes[1].pair"));
    }

    #[test]
    fn missing_reward_pair_is_rejected() {
        let mut config = valid_config();
        config.reward.token_policy.clear();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("reward.token_policy"));
    }

    #[test]
    fn env_overrides_reach_underscored_and_nested_fields() {
        // Injected vars instead of real process environment, so the test is
        // deterministic. "__" separates nesting levels; single underscores
        // inside field names must survive.
        let vars = std::collections::HashMap::from([
            ("ORACLE_ADA_THRESHOLD".to_string(), "123456".to_string()),
            ("ORACLE_DATABASE__MAX_CONNECTIONS".to_string(), "5".to_string()),
            ("ORACLE_DATABASE__PASSWORD".to_string(), "hunter2".to_string()),
            ("ORACLE_PRICE_PROVIDER__TOKEN_ID".to_string(), "ergo".to_string()),
        ]);

        let source = Environment::with_prefix("oracle").separator("__").source(Some(vars));
        let config: AppConfig = AppConfig::defaults()
            .unwrap()
            .add_source(source)
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.ada_threshold, 123456);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.password, "hunter2");
        assert_eq!(config.price_provider.token_id, "ergo");
    }

    #[test]
    fn development_mode_flag() {
        let mut config = valid_config();
        assert!(config.server.is_development());
        config.server.environment = "production".into();
        assert!(!config.server.is_development());
    }
}
