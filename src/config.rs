use crate::error::{Error, Result};
use crate::protocol::PointerMode;
use log::LevelFilter;
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub port: u16,
    pub group: Ipv4Addr,
    pub interface: Ipv4Addr,
    pub multicast_ttl: u32,
    pub multicast_loop: bool,
    pub log_level: String,
    /// Seconds, for records this host advertises.
    pub record_ttl: u32,
    pub cache_limit: usize,
    pub sweep_interval_secs: u64,
    pub legacy_pointers: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 5353,
            group: Ipv4Addr::new(224, 0, 0, 251),
            interface: Ipv4Addr::UNSPECIFIED,
            multicast_ttl: 255,
            multicast_loop: true,
            log_level: "INFO".to_string(),
            record_ttl: 4500,
            cache_limit: 4096,
            sweep_interval_secs: 10,
            legacy_pointers: false,
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.group.is_multicast() {
            return Err(Error::Config(format!("{} is not a multicast group", self.group)));
        }
        if self.multicast_ttl > 255 {
            return Err(Error::Config(format!("multicast_ttl {} exceeds 255", self.multicast_ttl)));
        }
        if self.sweep_interval_secs == 0 {
            return Err(Error::Config("sweep_interval_secs must be positive".to_string()));
        }
        self.get_log_level()?;
        Ok(())
    }

    pub fn pointer_mode(&self) -> PointerMode {
        if self.legacy_pointers {
            PointerMode::Legacy
        } else {
            PointerMode::Full
        }
    }

    pub fn get_log_level(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| Error::Config(format!("unknown log level {:?}", self.log_level)))
    }
}

/// Reads the config file at `path`, or the defaults when no path is given.
pub async fn init_from_toml(path: Option<&str>) -> Result<Config> {
    match path {
        None => Ok(Config::default()),
        Some(path) => {
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| Error::Config(format!("cannot read {}: {}", path, e)))?;
            Config::from_toml(&content)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{init_from_toml, Config};
    use crate::protocol::PointerMode;
    use log::LevelFilter;
    use std::net::Ipv4Addr;

    #[test]
    fn should_return_defaults_when_from_toml_given_empty_content() {
        let config = Config::from_toml("").unwrap();

        assert_eq!(Config::default(), config);
        assert_eq!(5353, config.port);
        assert_eq!(Ipv4Addr::new(224, 0, 0, 251), config.group);
        assert_eq!(255, config.multicast_ttl);
        assert!(config.multicast_loop);
        assert_eq!(4500, config.record_ttl);
        assert_eq!(PointerMode::Full, config.pointer_mode())
    }

    #[test]
    fn should_override_given_keys_when_from_toml_given_partial_content() {
        let content = r#"
            port = 15353
            log_level = "debug"
            cache_limit = 10
            legacy_pointers = true
        "#;

        let config = Config::from_toml(content).unwrap();

        assert_eq!(15353, config.port);
        assert_eq!(10, config.cache_limit);
        assert_eq!(LevelFilter::Debug, config.get_log_level().unwrap());
        assert_eq!(PointerMode::Legacy, config.pointer_mode());
        assert_eq!(Ipv4Addr::UNSPECIFIED, config.interface)
    }

    #[test]
    fn should_return_error_when_from_toml_given_unknown_key() {
        let result = Config::from_toml("servers = [\"8.8.8.8:53\"]");

        assert!(result.is_err())
    }

    #[test]
    fn should_return_error_when_from_toml_given_unicast_group() {
        let result = Config::from_toml("group = \"192.168.1.1\"");

        assert!(result.is_err())
    }

    #[test]
    fn should_return_error_when_from_toml_given_unknown_log_level() {
        let result = Config::from_toml("log_level = \"LOUD\"");

        assert!(result.is_err())
    }

    #[test]
    fn should_return_error_when_from_toml_given_ttl_over_255() {
        let result = Config::from_toml("multicast_ttl = 256");

        assert!(result.is_err())
    }

    #[tokio::test]
    async fn should_return_defaults_when_init_from_toml_given_no_path() {
        let config = init_from_toml(None).await.unwrap();

        assert_eq!(Config::default(), config)
    }

    #[tokio::test]
    async fn should_return_error_when_init_from_toml_given_missing_file() {
        let result = init_from_toml(Some("/nonexistent/rendezvous-mdns.toml")).await;

        assert!(result.is_err())
    }
}
