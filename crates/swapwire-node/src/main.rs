// ============================================
// File: crates/swapwire-node/src/main.rs
// ============================================
//! # Swapwire Node Entry Point
//!
//! ## Creation Reason
//! Command line access to the node's key store and message codecs, for
//! operators and for debugging traffic captured from a room.
//!
//! ## Main Functionality
//! - CLI argument parsing with clap
//! - Logging initialization with tracing
//! - Key generation, announcement building, message inspection
//!
//! ## Usage
//! ```bash
//! swapwire-node keygen                              # New key pair, prints interface id
//! swapwire-node announce --offer-id <uuid> --interface-id <base64>
//! swapwire-node inspect < captured.txt              # One wire string per line
//! swapwire-node validate                            # Check config file
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Announcement wire strings go to stdout, logs go to stderr
//! - `inspect` never prints settlement details
//!
//! ## Last Modified
//! v0.1.0 - Initial CLI implementation

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use swapwire_common::{InterfaceId, OfferId};
use swapwire_core::protocol::create_public_key_announcement;
use swapwire_node::services::InboundPeerMessage;
use swapwire_node::{
    FileKeyStore, KeyManagerService, KeyStore, MemoryKeyStore, NodeConfig, NodeError, P2pService,
};
use swapwire_transport::MemoryRoom;

// ============================================
// CLI Definition
// ============================================

/// Swapwire settlement messaging node
#[derive(Parser, Debug)]
#[command(name = "swapwire-node")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate and store a new RSA key pair
    Keygen {
        /// Path to configuration file
        #[arg(short, long, default_value = "/etc/swapwire/node.toml")]
        config: PathBuf,
    },

    /// Print a Public Key Announcement for a stored key pair
    Announce {
        /// Offer the key is announced for (UUID)
        #[arg(long)]
        offer_id: OfferId,

        /// Interface id of the stored key pair (Base64)
        #[arg(long)]
        interface_id: InterfaceId,

        /// Path to configuration file
        #[arg(short, long, default_value = "/etc/swapwire/node.toml")]
        config: PathBuf,
    },

    /// Read wire strings from stdin and report what each one is
    Inspect {
        /// Path to configuration file
        #[arg(short, long, default_value = "/etc/swapwire/node.toml")]
        config: PathBuf,
    },

    /// Validate configuration file
    Validate {
        /// Path to configuration file
        #[arg(short, long, default_value = "/etc/swapwire/node.toml")]
        config: PathBuf,
    },
}

impl Commands {
    fn config_path(&self) -> &Path {
        match self {
            Self::Keygen { config }
            | Self::Announce { config, .. }
            | Self::Inspect { config }
            | Self::Validate { config } => config,
        }
    }
}

// ============================================
// Main
// ============================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config_path = cli.command.config_path().to_path_buf();

    // The config decides the log level, so it is read before logging starts
    let loaded = if config_path.exists() {
        NodeConfig::load(&config_path).await.map(Some)
    } else {
        Ok(None)
    };
    init_logging(log_level(&loaded));

    let result = match loaded {
        Ok(config) => run(cli.command, &config_path, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands, config_path: &Path, config: Option<NodeConfig>) -> anyhow::Result<()> {
    match command {
        Commands::Validate { .. } => cmd_validate(config_path, config.as_ref()),
        Commands::Keygen { .. } => cmd_keygen(&or_default(config, config_path)).await,
        Commands::Announce {
            offer_id,
            interface_id,
            ..
        } => cmd_announce(&or_default(config, config_path), offer_id, interface_id),
        Commands::Inspect { .. } => cmd_inspect(&or_default(config, config_path)).await,
    }
}

// ============================================
// Commands
// ============================================

/// Generates and persists a key pair.
async fn cmd_keygen(config: &NodeConfig) -> anyhow::Result<()> {
    if config.keystore_path().is_none() {
        warn!("keystore.path is empty, the key pair will not be persisted");
    }

    let keys = KeyManagerService::new(open_store(config)?);
    let key_pair = tokio::task::spawn_blocking(move || keys.generate_key_pair(true))
        .await
        .context("key generation task failed")??;

    println!("✅ Key pair generated");
    println!();
    println!("   Interface ID:        {}", key_pair.interface_id());
    println!("   Interface ID (hex):  {}", hex::encode(key_pair.interface_id().as_bytes()));
    println!();
    Ok(())
}

/// Prints an announcement wire string.
fn cmd_announce(
    config: &NodeConfig,
    offer_id: OfferId,
    interface_id: InterfaceId,
) -> anyhow::Result<()> {
    let keys = KeyManagerService::new(open_store(config)?);

    let key_pair = keys
        .get_key_pair(&interface_id)?
        .with_context(|| format!("no key pair stored for interface id {interface_id}"))?;

    let wire = create_public_key_announcement(&offer_id, &key_pair)?;
    info!(offer_id = %offer_id, interface_id = %interface_id, "Announcement created");
    println!("{wire}");
    Ok(())
}

/// Classifies wire strings read from stdin.
async fn cmd_inspect(config: &NodeConfig) -> anyhow::Result<()> {
    let keys = Arc::new(KeyManagerService::new(open_store(config)?));
    // Offline: nothing is sent, the room only satisfies the service
    let room = MemoryRoom::new(config.p2p.room.clone());
    let p2p = P2pService::new(
        Arc::new(room.join("inspect")),
        keys,
        config.p2p.max_message_bytes,
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_no = 0usize;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        println!("{line_no:>5}  {}", describe(p2p.classify(line).as_ref()));
    }
    Ok(())
}

/// Reports the configuration loaded at startup.
fn cmd_validate(config_path: &Path, config: Option<&NodeConfig>) -> anyhow::Result<()> {
    let Some(config) = config else {
        println!("⚠️  Config file not found: {}", config_path.display());
        println!("   Node will use default values.");
        return Ok(());
    };

    println!("✅ Configuration is valid");
    println!();
    println!("Key store:");
    match config.keystore_path() {
        Some(path) => println!("   Path:              {}", path.display()),
        None => println!("   Path:              (in memory)"),
    }
    println!();
    println!("P2P:");
    println!("   Room:              {}", config.p2p.room);
    println!("   Max message size:  {} bytes", config.p2p.max_message_bytes);
    println!();
    println!("Logging:");
    println!("   Level:             {}", config.logging.level);
    println!();
    Ok(())
}

// ============================================
// Helper Functions
// ============================================

/// Level from the loaded config, `info` when there is none.
fn log_level(loaded: &Result<Option<NodeConfig>, NodeError>) -> &str {
    match loaded {
        Ok(Some(config)) => config.logging.level.as_str(),
        _ => "info",
    }
}

/// Initializes the tracing subscriber.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .ok();
}

/// Falls back to defaults when no config file was found.
fn or_default(config: Option<NodeConfig>, path: &Path) -> NodeConfig {
    config.unwrap_or_else(|| {
        info!(path = %path.display(), "Config file not found, using defaults");
        NodeConfig::default()
    })
}

/// Opens the configured key store.
fn open_store(config: &NodeConfig) -> anyhow::Result<Arc<dyn KeyStore>> {
    Ok(match config.keystore_path() {
        Some(path) => Arc::new(FileKeyStore::open(path)?),
        None => Arc::new(MemoryKeyStore::new()),
    })
}

/// One-line summary of an inspected string.
fn describe(message: Option<&InboundPeerMessage>) -> String {
    match message {
        None => "skipped".to_string(),
        Some(InboundPeerMessage::PublicKeyAnnouncement(announcement)) => format!(
            "pka        offer={} key={}",
            announcement.offer_id,
            announcement.public_key.interface_id()
        ),
        Some(InboundPeerMessage::TakerInformation { message, recipient }) => format!(
            "takerInfo  swap={} from={} to={} details={}",
            message.swap_id,
            message.public_key.interface_id(),
            recipient,
            if message.settlement_method_details.is_some() { "yes" } else { "no" }
        ),
        Some(InboundPeerMessage::MakerInformation {
            message,
            sender,
            recipient,
        }) => format!(
            "makerInfo  swap={} from={} to={}",
            message.swap_id, sender, recipient
        ),
    }
}
