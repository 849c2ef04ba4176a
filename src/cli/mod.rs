//! Command line interface
//!
//! Flags override the matching configuration values; each can also be set
//! through its environment variable.

pub mod serve;

use clap::Parser;

use crate::config::AppConfig;
use crate::domain::ServiceFlavour;

/// Observed reference service: record API, page renderer or job trial
#[derive(Parser, Debug, Default)]
#[command(name = "reference-app")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Flavour to run: backend, front or trial
    #[arg(long, env = "SERVICE_FLAVOUR")]
    pub flavour: Option<ServiceFlavour>,

    /// Address to bind
    #[arg(long, env = "SERVICE_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "SERVICE_PORT")]
    pub port: Option<u16>,
}

impl Cli {
    /// Apply the flags that were given on top of the loaded configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(flavour) = self.flavour {
            config.service.flavour = flavour;
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
