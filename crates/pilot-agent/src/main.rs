//! rfb-pilot agent entry point.
//!
//! Reads line-delimited JSON commands on stdin, synthesizes the matching
//! keyboard and pointer input, and writes one reply line per id-bearing
//! command on stdout.  Logs go to stderr so they never mix with replies.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load config file (optional)
//!  └─ build DeviceLink: RfbDeviceLink over TCP, or DryRunDeviceLink
//!  └─ spawn linkStatus notification forwarder
//!  └─ serve(stdin → ProtocolDispatcher → stdout) until EOF or Ctrl+C
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pilot_agent::application::dispatcher::ProtocolDispatcher;
use pilot_agent::application::input_controller::{DeviceLink, InputController};
use pilot_agent::infrastructure::config::{load_config, AgentConfig};
use pilot_agent::infrastructure::device_link::{dry_run::DryRunDeviceLink, rfb::RfbDeviceLink};
use pilot_agent::infrastructure::line_io::{serve, LineWriter};
use pilot_core::input::Platform;
use pilot_core::protocol::LinkStatus;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Drives a remote desktop's keyboard and mouse from JSON commands on stdin.
#[derive(Debug, Parser)]
#[command(
    name = "rfb-pilot",
    about = "Line-delimited JSON input automation over RFB",
    version
)]
struct Cli {
    /// Path to a TOML config file with `[display]` and `[timing]` tables.
    #[arg(long, env = "PILOT_CONFIG")]
    config: Option<PathBuf>,

    /// `host:port` of an RFB session endpoint that accepts client input
    /// messages directly (handshake already completed by a front proxy).
    ///
    /// Without it, events are only logged.
    #[arg(long, env = "PILOT_RFB_ADDR")]
    rfb_addr: Option<String>,

    /// Operating system of the remote desktop: `macos` or `other`.
    ///
    /// Decides whether paste uses Cmd+V or Ctrl+V.
    #[arg(long, default_value = "other", env = "PILOT_PLATFORM", value_parser = parse_platform)]
    platform: Platform,

    /// Remote framebuffer size as `WIDTHxHEIGHT`, e.g. `1920x1080`.
    #[arg(long, env = "PILOT_FRAMEBUFFER", value_parser = parse_framebuffer)]
    framebuffer: Option<(u32, u32)>,
}

fn parse_platform(value: &str) -> Result<Platform, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "macos" | "mac" | "darwin" => Ok(Platform::Macos),
        "other" | "linux" | "windows" => Ok(Platform::Other),
        other => Err(format!("unknown platform '{other}' (expected macos or other)")),
    }
}

fn parse_framebuffer(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| format!("invalid dimension '{s}' in '{value}'"))
    };
    Ok((parse(w)?, parse(h)?))
}

impl Cli {
    /// Reads the config file named by `--config`, or returns defaults.
    fn load_agent_config(&self) -> anyhow::Result<AgentConfig> {
        match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("loading config from {}", path.display())),
            None => Ok(AgentConfig::default()),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the protocol; logs must go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.load_agent_config()?;
    let profile = config.initial_profile()?;
    let max_dimension = config.max_dimension()?;

    let writer = LineWriter::new(tokio::io::stdout());
    let (status_tx, status_rx) = mpsc::unbounded_channel();
    let forwarder = writer.spawn_notification_forwarder(status_rx);

    // ── Device link ───────────────────────────────────────────────────────────
    let link: Arc<dyn DeviceLink> = match &cli.rfb_addr {
        Some(addr) => {
            let stream = TcpStream::connect(addr)
                .await
                .with_context(|| format!("connecting to RFB endpoint {addr}"))?;
            stream.set_nodelay(true)?;
            info!("connected to RFB endpoint {addr}");
            let _ = status_tx.send(LinkStatus::Connected);

            let mut link = RfbDeviceLink::new(stream, cli.platform)
                .with_status_channel(status_tx.clone());
            if let Some((w, h)) = cli.framebuffer {
                link = link.with_framebuffer(w, h);
            }
            Arc::new(link)
        }
        None => {
            warn!("no --rfb-addr given; input events will only be logged");
            Arc::new(DryRunDeviceLink::new(cli.platform, cli.framebuffer))
        }
    };
    drop(status_tx);

    let controller = InputController::new(link, profile).with_max_dimension(max_dimension);
    let mut dispatcher = ProtocolDispatcher::new(controller);

    info!("rfb-pilot ready; reading commands from stdin");

    // ── Command loop ──────────────────────────────────────────────────────────
    let stdin = BufReader::new(tokio::io::stdin());
    tokio::select! {
        result = serve(&mut dispatcher, stdin, &writer) => result?,
        _ = tokio::signal::ctrl_c() => info!("received Ctrl+C; shutting down"),
    }

    // Dropping the dispatcher drops the link and with it the last status sender.
    drop(dispatcher);
    if let Err(e) = forwarder.await {
        warn!("notification forwarder ended abnormally: {e}");
    }

    info!("rfb-pilot stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        // Arrange / Act: parse with no arguments (all defaults apply)
        let cli = Cli::parse_from(["rfb-pilot"]);

        // Assert
        assert_eq!(cli.platform, Platform::Other);
        assert!(cli.config.is_none());
        assert!(cli.rfb_addr.is_none());
        assert!(cli.framebuffer.is_none());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "rfb-pilot",
            "--platform",
            "macos",
            "--framebuffer",
            "2560x1440",
            "--rfb-addr",
            "10.0.0.5:5900",
        ]);
        assert_eq!(cli.platform, Platform::Macos);
        assert_eq!(cli.framebuffer, Some((2560, 1440)));
        assert_eq!(cli.rfb_addr.as_deref(), Some("10.0.0.5:5900"));
    }

    #[test]
    fn test_cli_rejects_unknown_platform() {
        assert!(Cli::try_parse_from(["rfb-pilot", "--platform", "amiga"]).is_err());
    }

    #[test]
    fn test_parse_platform_aliases() {
        assert_eq!(parse_platform("Darwin"), Ok(Platform::Macos));
        assert_eq!(parse_platform("linux"), Ok(Platform::Other));
    }

    #[test]
    fn test_parse_framebuffer_accepts_either_case_separator() {
        assert_eq!(parse_framebuffer("800X600"), Ok((800, 600)));
        assert_eq!(parse_framebuffer("1920x1080"), Ok((1920, 1080)));
    }

    #[test]
    fn test_parse_framebuffer_rejects_malformed_values() {
        assert!(parse_framebuffer("1920").is_err());
        assert!(parse_framebuffer("0x600").is_err());
        assert!(parse_framebuffer("wide x tall").is_err());
    }

    #[test]
    fn test_missing_config_flag_gives_defaults() {
        let cli = Cli::parse_from(["rfb-pilot"]);
        assert_eq!(cli.load_agent_config().unwrap(), AgentConfig::default());
    }

    #[test]
    fn test_unreadable_config_is_an_error() {
        let cli = Cli::parse_from(["rfb-pilot", "--config", "/nonexistent/pilot.toml"]);
        assert!(cli.load_agent_config().is_err());
    }
}
