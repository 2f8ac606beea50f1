//! Process configuration from CLI flags and environment variables

use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "analytics-server")]
#[command(about = "Usage analytics API over an in-memory event dataset")]
#[command(version)]
pub struct Config {
    /// Port for the HTTP server
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// CSV dataset; relative paths resolve against the working directory
    #[arg(long, env = "DATA_PATH", default_value = "data/dataset.csv")]
    pub data_path: PathBuf,

    /// Reject malformed startDate/endDate instead of ignoring them
    #[arg(long, env = "STRICT_DATES")]
    pub strict_dates: bool,
}

impl Config {
    /// Dataset path made absolute against the current working directory
    pub fn resolved_data_path(&self) -> PathBuf {
        resolve_against_cwd(&self.data_path)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parsed bind address, when `host` is an IP literal
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.bind_addr().parse().ok()
    }
}

fn resolve_against_cwd(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}
