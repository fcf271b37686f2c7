//! Command-line and environment configuration
//!
//! Flags mirror the knobs an operator needs: where the nomad api lives, how
//! to authenticate against it, how often to poll, and which allocations to
//! count when deriving the busy signal.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;

use crate::error::{Error, Result};

#[derive(Parser, Debug)]
#[command(name = "nomad-node-exporter")]
#[command(about = "Generate prometheus metrics for nomad node states", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Address of the nomad server api
    #[arg(
        short,
        long,
        env = "NOMAD_ADDR",
        default_value = "https://localhost:4646"
    )]
    pub address: String,

    /// Port to listen on
    #[arg(long, env = "NOMAD_EXPORTER_PORT", default_value_t = 9827)]
    pub port: u16,

    /// Seconds between polls of the nomad api
    #[arg(
        long,
        env = "NOMAD_EXPORTER_FETCH_INTERVAL",
        default_value_t = 30,
        value_name = "SECONDS"
    )]
    pub fetch_interval: u64,

    /// Disable TLS client authentication
    #[arg(long, default_value_t = false)]
    pub disable_authentication: bool,

    /// Certificate used for TLS auth
    #[arg(long, default_value = "/nomad-pki/cli.pem")]
    pub cert: PathBuf,

    /// Certificate key used for TLS auth
    #[arg(long, default_value = "/nomad-pki/cli-key.pem")]
    pub key: PathBuf,

    /// Trusted CA certificate for TLS auth
    #[arg(long, default_value = "/nomad-pki/nomad-ca.pem")]
    pub ca: PathBuf,

    /// Nomad filter expression for the allocations endpoint, e.g. 'Name contains "jenkins"'
    #[arg(short, long, default_value = "")]
    pub filter: String,
}

/// PEM material for mutual TLS against the nomad api
#[derive(Debug, Clone)]
pub struct TlsMaterial {
    pub cert_pem: Vec<u8>,
    pub key_pem: Vec<u8>,
    pub ca_pem: Vec<u8>,
}

impl TlsMaterial {
    /// Load client cert, key and trusting CA from PEM files
    pub fn load(cert: &Path, key: &Path, ca: &Path) -> Result<Self> {
        Ok(Self {
            cert_pem: read_pem(cert, "client certificate")?,
            key_pem: read_pem(key, "client key")?,
            ca_pem: read_pem(ca, "CA certificate")?,
        })
    }
}

fn read_pem(path: &Path, what: &str) -> Result<Vec<u8>> {
    fs::read(path)
        .map_err(|e| Error::ConfigError(format!("failed to read {} {}: {}", what, path.display(), e)))
}

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base address of the nomad api, without a trailing slash
    pub address: String,
    pub port: u16,
    pub fetch_interval: Duration,
    /// Operator-supplied filter expression for the allocations endpoint
    pub allocation_filter: String,
    /// TLS client material, or `None` when authentication is disabled
    pub tls: Option<TlsMaterial>,
}

impl Settings {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let tls = if cli.disable_authentication {
            None
        } else {
            Some(TlsMaterial::load(&cli.cert, &cli.key, &cli.ca)?)
        };

        Ok(Self {
            address: cli.address.trim_end_matches('/').to_string(),
            port: cli.port,
            fetch_interval: Duration::from_secs(cli.fetch_interval),
            allocation_filter: cli.filter,
            tls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_exporter_conventions() {
        let cli = Cli::try_parse_from(["nomad-node-exporter", "--disable-authentication"]).unwrap();
        assert_eq!(cli.port, 9827);
        assert_eq!(cli.fetch_interval, 30);
        assert_eq!(cli.filter, "");
        assert_eq!(cli.cert, PathBuf::from("/nomad-pki/cli.pem"));
    }

    #[test]
    fn trailing_slash_is_trimmed_from_the_address() {
        let cli = Cli::try_parse_from([
            "nomad-node-exporter",
            "--disable-authentication",
            "-a",
            "http://nomad.example:4646/",
        ])
        .unwrap();

        let settings = Settings::from_cli(cli).unwrap();
        assert_eq!(settings.address, "http://nomad.example:4646");
        assert!(settings.tls.is_none());
        assert_eq!(settings.fetch_interval, Duration::from_secs(30));
    }

    #[test]
    fn missing_pem_files_are_a_config_error() {
        let cli = Cli::try_parse_from([
            "nomad-node-exporter",
            "--cert",
            "/does/not/exist.pem",
        ])
        .unwrap();

        let err = Settings::from_cli(cli).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }
}
