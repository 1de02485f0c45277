mod app;
mod input;
mod render;

use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use app::App;
use netpong::simulation::DEFAULT_SUB_STEP_MS;
use netpong::{DEFAULT_FRAME_RATE, DEFAULT_PORT, Endpoint, Session, SessionConfig};

#[derive(Parser)]
#[command(name = "netpong")]
#[command(about = "Two-player pong over UDP")]
struct Args {
    #[command(subcommand)]
    mode: Option<Mode>,

    #[arg(short, long, global = true, default_value_t = DEFAULT_PORT)]
    port: u16,

    #[arg(short, long, global = true, default_value_t = DEFAULT_FRAME_RATE)]
    frame_rate: u32,

    #[arg(long, global = true, default_value_t = DEFAULT_SUB_STEP_MS, help = "Ball physics interval in ms")]
    sub_step_ms: u32,

    #[arg(long, global = true, default_value_t = 100, help = "Socket receive timeout in ms")]
    recv_timeout_ms: u64,

    #[arg(long, global = true, help = "Run without the terminal UI and no input")]
    headless: bool,

    #[arg(long, global = true, help = "Stop a headless run after this many seconds")]
    duration_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Mode {
    /// Wait for a peer to join on --port
    Host,
    /// Connect to a host; the port defaults to --port
    Join { address: String },
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.headless {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    } else {
        env_logger::init();
    }

    let config = SessionConfig {
        port: args.port,
        frame_rate: args.frame_rate,
        sub_step_ms: args.sub_step_ms,
        recv_timeout: Duration::from_millis(args.recv_timeout_ms),
        ..Default::default()
    };
    config.validate()?;

    let session = match args.mode {
        None => Session::local(),
        Some(Mode::Host) => {
            let endpoint = Endpoint::bind(("0.0.0.0", config.port), config.recv_timeout)?;
            Session::host(endpoint)
        }
        Some(Mode::Join { address }) => {
            let peer = resolve_peer(&address, config.port)?;
            let endpoint = Endpoint::bind(("0.0.0.0", 0), config.recv_timeout)?;
            Session::join(endpoint, peer)
        }
    };

    let running = Arc::new(AtomicBool::new(true));
    let mut app = App::new(session, config, running);

    if !args.headless {
        // Printed before the terminal switches to raw mode.
        println!("{}", app.waiting_message());
    }
    app.connect()?;

    if args.headless {
        app.run_headless(args.duration_secs.map(Duration::from_secs))
    } else {
        app.run_with_tui()
    }
}

fn resolve_peer(address: &str, default_port: u16) -> Result<SocketAddr> {
    if let Ok(ip) = address.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, default_port));
    }

    let resolved = if address.contains(':') {
        address.to_socket_addrs()
    } else {
        (address, default_port).to_socket_addrs()
    };

    resolved
        .with_context(|| format!("failed to resolve {}", address))?
        .next()
        .with_context(|| format!("no addresses for {}", address))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_ip_gets_default_port() {
        let addr = resolve_peer("127.0.0.1", 1200).unwrap();
        assert_eq!(addr, "127.0.0.1:1200".parse().unwrap());
    }

    #[test]
    fn explicit_port_wins() {
        let addr = resolve_peer("127.0.0.1:4000", 1200).unwrap();
        assert_eq!(addr.port(), 4000);
    }

    #[test]
    fn join_requires_address() {
        assert!(Args::try_parse_from(["netpong", "join"]).is_err());
        let args = Args::try_parse_from(["netpong", "join", "10.0.0.2", "--port", "1300"]).unwrap();
        assert!(matches!(args.mode, Some(Mode::Join { ref address }) if address == "10.0.0.2"));
        assert_eq!(args.port, 1300);
    }

    #[test]
    fn no_subcommand_is_local() {
        let args = Args::try_parse_from(["netpong"]).unwrap();
        assert!(args.mode.is_none());
        assert!(!args.headless);
    }
}
