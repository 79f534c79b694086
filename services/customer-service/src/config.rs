use clap::Parser;
use std::net::{IpAddr, SocketAddr};

/// Runtime settings; every flag can also be supplied through its environment variable.
#[derive(Parser, Debug, Clone)]
#[command(name = "customer-service", about = "Resourceful customer CRUD service", long_about = None)]
pub struct Config {
    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8089)]
    pub port: u16,

    /// Postgres connection string; customers are kept in memory when unset
    #[arg(long = "database-url", env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Origins allowed by CORS (comma separated)
    #[arg(
        long = "allowed-origins",
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_values = ["http://localhost:3000", "http://localhost:3001", "http://localhost:5173"]
    )]
    pub allowed_origins: Vec<String>,

    /// tracing filter directive
    #[arg(long = "log-filter", env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,
}

impl Config {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_override_defaults() {
        let cfg = Config::try_parse_from([
            "customer-service",
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
            "--allowed-origins",
            "https://a.example,https://b.example",
        ])
        .unwrap();
        assert_eq!(cfg.socket_addr(), "127.0.0.1:9000".parse().unwrap());
        assert_eq!(cfg.allowed_origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn rejects_non_numeric_port() {
        assert!(Config::try_parse_from(["customer-service", "--port", "eighty"]).is_err());
    }
}
