//! Service configuration
//!
//! Command-line flags with environment-variable fallbacks; everything has
//! a default so the binary starts with zero configuration.

use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "encore", about = "Booking board for music venues, artists, and shows")]
pub struct Config {
    /// Address to bind the HTTP listener to
    #[arg(long, env = "ENCORE_BIND", default_value = "127.0.0.1")]
    pub bind: IpAddr,

    /// Port for the HTTP listener
    #[arg(long, env = "ENCORE_PORT", default_value_t = 5780)]
    pub port: u16,

    /// Path to the SQLite database (created on first run)
    #[arg(long, env = "ENCORE_DB", default_value = "encore.db")]
    pub database: PathBuf,
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}
