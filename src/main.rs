//! vpngate - browse VPN Gate relays and run one OpenVPN tunnel at a time
//!
//! This is the binary entry point. All logic lives in the workspace crates.

use std::path::PathBuf;

use clap::Parser;
use vpngate_app::config::{load_settings, Settings};
use vpngate_core::logging;
use vpngate_core::prelude::*;
use vpngate_tunnel::{fetch_servers, filter_by_country};

/// Browse VPN Gate relays in the terminal and connect with OpenVPN
#[derive(Parser, Debug)]
#[command(name = "vpngate")]
#[command(about = "Browse VPN Gate relays and run one OpenVPN tunnel at a time", long_about = None)]
struct Args {
    /// Short country code to list (e.g. JP, KR), or ALL
    #[arg(value_name = "COUNTRY")]
    country: Option<String>,

    /// Server list URL
    #[arg(long)]
    url: Option<String>,

    /// Settings file (default: <config dir>/vpngate/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Tunnel binary to run instead of openvpn
    #[arg(long, value_name = "PATH")]
    tunnel_binary: Option<String>,
}

impl Args {
    /// Command-line flags win over the settings file
    fn apply(&self, settings: &mut Settings) {
        if let Some(country) = &self.country {
            settings.feed.country = country.clone();
        }
        if let Some(url) = &self.url {
            settings.feed.url = url.clone();
        }
        if let Some(binary) = &self.tunnel_binary {
            settings.tunnel.binary = binary.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    color_eyre::install().map_err(|e| Error::terminal(e.to_string()))?;
    logging::init()?;

    let mut settings = load_settings(args.config.as_deref());
    args.apply(&mut settings);
    info!(
        "Feed {} country {}, tunnel {}",
        settings.feed.url, settings.feed.country, settings.tunnel.binary
    );

    let servers = fetch_servers(&settings.feed.url).await?;
    let servers = filter_by_country(servers, &settings.feed.country);

    if servers.is_empty() {
        let err = Error::no_servers(&settings.feed.country);
        warn!("{}", err);
        eprintln!("❌ {}", err);
        std::process::exit(1);
    }

    vpngate_tui::run(servers, settings).await
}
