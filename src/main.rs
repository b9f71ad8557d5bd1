//! Redis Token Auth CLI
//!
//! Runs single authorization decisions against a Redis deployment.

use anyhow::Result;
use clap::{Parser, Subcommand};
use sentinel_redis_token_auth::acl::AccessMode;
use sentinel_redis_token_auth::config::parse_option;
use sentinel_redis_token_auth::mqtt::TopicMatcher;
use sentinel_redis_token_auth::{RedisTokenBackend, RedisTokenConfig};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

const CLI_STARTUP_TIMEOUT_SECS: u64 = 30;

/// Redis token authentication backend for MQTT brokers
#[derive(Parser, Debug)]
#[command(name = "redis-token-auth")]
#[command(author = "Sentinel Contributors")]
#[command(version)]
#[command(about = "Check MQTT tokens and topic ACLs stored in Redis", long_about = None)]
struct Args {
    /// Configuration file path (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Plugin option (key=value), e.g. redis_token_host=redis.local
    #[arg(short = 'o', long = "opt", global = true)]
    opts: Vec<String>,

    /// Log level (trace, debug, info, warn, error); overrides the configured level
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable JSON log format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check an identity's token
    Authenticate {
        identity: String,
        token: String,
        #[arg(long, default_value = "")]
        client_id: String,
    },

    /// Check whether an identity is a superuser
    Superuser { identity: String },

    /// Check topic access
    CheckAcl {
        identity: String,
        topic: String,
        client_id: String,
        /// subscribe, read or write
        mode: AccessMode,
    },
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => RedisTokenConfig::from_file(path)?,
        None => RedisTokenConfig::default(),
    };

    let opts = args
        .opts
        .iter()
        .map(|raw| parse_option(raw))
        .collect::<Result<HashMap<_, _>, _>>()?;
    config.apply_auth_opts(&opts);

    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if args.json_logs {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        address = %config.address(),
        db = config.db,
        "Starting Redis token auth"
    );

    // A one-shot check should not hang forever on an unreachable server
    config
        .startup_timeout_secs
        .get_or_insert(CLI_STARTUP_TIMEOUT_SECS);

    let backend = RedisTokenBackend::connect(&config, None)?;

    let allowed = match &args.command {
        Command::Authenticate {
            identity,
            token,
            client_id,
        } => backend.authenticate(identity, token, client_id),
        Command::Superuser { identity } => backend.is_superuser(identity),
        Command::CheckAcl {
            identity,
            topic,
            client_id,
            mode,
        } => {
            if !TopicMatcher::new().is_valid_topic(topic) {
                warn!(topic = %topic, "Requested topic is not a concrete topic name");
            }
            backend.check_acl(identity, topic, client_id, *mode)
        }
    };

    backend.halt();

    println!("{}", if allowed { "allowed" } else { "denied" });

    Ok(if allowed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
