use crate::persistence::DatabaseConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::net::SocketAddr;

/// Server and ledger configuration
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,

    /// Database settings
    pub database: DatabaseConfig,

    /// Deposit used when an enable/reset request does not name one
    pub default_initial_deposit: Decimal,

    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            database: DatabaseConfig::default(),
            default_initial_deposit: dec!(10000),
            max_body_bytes: 64 * 1024,
        }
    }
}

impl LedgerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> LedgerConfig {
        let mut config = LedgerConfig::default();
        config.database = DatabaseConfig::from_env();

        if let Ok(port) = std::env::var("PORT") {
            match port.parse::<u16>() {
                Ok(value) => config.bind_addr.set_port(value),
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse PORT '{}': {}, using default: {}",
                        port,
                        e,
                        config.bind_addr.port()
                    );
                }
            }
        }

        if let Ok(host) = std::env::var("HOST") {
            match host.parse() {
                Ok(value) => config.bind_addr.set_ip(value),
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse HOST '{}': {}, using default: {}",
                        host,
                        e,
                        config.bind_addr.ip()
                    );
                }
            }
        }

        if let Ok(deposit) = std::env::var("DEFAULT_INITIAL_DEPOSIT") {
            match deposit.parse::<Decimal>() {
                Ok(value) if value > Decimal::ZERO => {
                    config.default_initial_deposit = value;
                }
                Ok(value) => {
                    tracing::warn!(
                        "Invalid DEFAULT_INITIAL_DEPOSIT value: {} (must be positive), using default: {}",
                        value,
                        config.default_initial_deposit
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse DEFAULT_INITIAL_DEPOSIT '{}': {}, using default: {}",
                        deposit,
                        e,
                        config.default_initial_deposit
                    );
                }
            }
        }

        if let Ok(limit) = std::env::var("MAX_BODY_BYTES") {
            if let Ok(value) = limit.parse::<usize>() {
                if value > 0 {
                    config.max_body_bytes = value;
                }
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LedgerConfig::default();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.default_initial_deposit, dec!(10000));
        assert_eq!(config.database.url, "sqlite://data/folio.db");
    }
}
