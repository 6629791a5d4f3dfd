//! Command line flags.
//!
//! Flags override values from the config file, which override defaults.

use std::path::PathBuf;

use clap::Parser;

use crate::config::schema::RelayConfig;

#[derive(Debug, Parser)]
#[command(name = "lepton-relay")]
#[command(about = "Serve files through a Lepton codec socket", long_about = None)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Root path to serve files from.
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Host and port to listen on, e.g. 0.0.0.0:8080 or :8080.
    #[arg(long)]
    pub listen: Option<String>,

    /// Seconds allowed to produce response headers.
    #[arg(long)]
    pub read_timeout: Option<u64>,

    /// Seconds allowed to stream the response body.
    #[arg(long)]
    pub write_timeout: Option<u64>,

    /// Socket to use to connect to Lepton, e.g. tcp://localhost:2402 or unix:///tmp/.leptonsock.
    #[arg(long)]
    pub lepton_socket: Option<String>,
}

impl Cli {
    /// Apply every flag that was given on top of `config`.
    pub fn apply(&self, config: &mut RelayConfig) {
        if let Some(root) = &self.root {
            config.files.root = root.clone();
        }
        if let Some(listen) = &self.listen {
            config.listener.bind_address = normalize_listen(listen);
        }
        if let Some(secs) = self.read_timeout {
            config.timeouts.read_secs = secs;
        }
        if let Some(secs) = self.write_timeout {
            config.timeouts.write_secs = secs;
        }
        if let Some(socket) = &self.lepton_socket {
            config.codec.endpoint = socket.clone();
        }
    }
}

/// `:8080` means every interface.
fn normalize_listen(listen: &str) -> String {
    if listen.starts_with(':') {
        format!("0.0.0.0{}", listen)
    } else {
        listen.to_string()
    }
}
