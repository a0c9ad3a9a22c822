// # clientinfod - Runtime Client Information Daemon
//
// This daemon is a THIN integration layer. All registry logic lives in
// clientinfo-core; configuration is via environment variables only.
//
// The clientinfod daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing the runtime
// 3. Reading hint events as JSON lines from stdin
// 4. Starting the client engine
//
// The daemon exits cleanly on Ctrl-C or when stdin is closed.
//
// ## Configuration
//
// ### Sources
// - `CLIENTINFO_SOURCE_WHOIS`: Accept WHOIS information (true/false)
// - `CLIENTINFO_SOURCE_ARP`: Accept ARP table information (true/false)
// - `CLIENTINFO_SOURCE_RDNS`: Accept reverse DNS information (true/false)
// - `CLIENTINFO_SOURCE_DHCP`: Accept DHCP lease information (true/false)
// - `CLIENTINFO_SOURCE_HOSTS`: Accept hosts file information (true/false)
//
// ### Engine
// - `CLIENTINFO_EVENT_CHANNEL_CAPACITY`: Engine event channel capacity
// - `CLIENTINFO_LOG_LEVEL`: trace, debug, info, warn or error
//
// ## Example
//
// ```bash
// export CLIENTINFO_SOURCE_WHOIS=false
// echo '{"kind":"hosts","addr":"192.0.2.10","source":"DHCP","hosts":["host.example"]}' \
//     | clientinfod
// ```

use anyhow::Result;
use clientinfo_core::{
    ClientEngine, ClientsConfig, EngineEvent, LinesFeed, RuntimeSourcesConfig, SharedRuntimeIndex,
    Source, source_name,
};
use std::env;
use std::process::ExitCode;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum ClientInfoExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<ClientInfoExitCode> for ExitCode {
    fn from(code: ClientInfoExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    sources: RuntimeSourcesConfig,
    event_channel_capacity: Option<usize>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let mut sources = RuntimeSourcesConfig::default();
        for (var, source) in [
            ("CLIENTINFO_SOURCE_WHOIS", Source::Whois),
            ("CLIENTINFO_SOURCE_ARP", Source::Arp),
            ("CLIENTINFO_SOURCE_RDNS", Source::Rdns),
            ("CLIENTINFO_SOURCE_DHCP", Source::Dhcp),
            ("CLIENTINFO_SOURCE_HOSTS", Source::HostsFile),
        ] {
            if let Ok(value) = env::var(var) {
                sources = sources.with_source(source, parse_bool(var, &value)?);
            }
        }

        let event_channel_capacity = match env::var("CLIENTINFO_EVENT_CHANNEL_CAPACITY") {
            Ok(value) => Some(value.parse().map_err(|e| {
                anyhow::anyhow!("CLIENTINFO_EVENT_CHANNEL_CAPACITY '{}' is not a number: {}", value, e)
            })?),
            Err(_) => None,
        };

        Ok(Self {
            sources,
            event_channel_capacity,
            log_level: env::var("CLIENTINFO_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if let Some(capacity) = self.event_channel_capacity
            && !(1..=1_000_000).contains(&capacity)
        {
            anyhow::bail!(
                "CLIENTINFO_EVENT_CHANNEL_CAPACITY must be between 1 and 1000000. Got: {}",
                capacity
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "CLIENTINFO_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    /// Build the core library configuration
    fn clients_config(&self) -> ClientsConfig {
        let mut config = ClientsConfig::new();
        config.runtime_sources = self.sources;
        if let Some(capacity) = self.event_channel_capacity {
            config.engine.event_channel_capacity = capacity;
        }
        config
    }
}

/// Parse a boolean environment value
fn parse_bool(var: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("{} must be true or false. Got: {}", var, value),
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ClientInfoExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return ClientInfoExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr; stdin carries the hint feed
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ClientInfoExitCode::ConfigError.into();
    }

    info!("Starting clientinfod daemon");

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ClientInfoExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {}", e);
            ClientInfoExitCode::RuntimeError
        } else {
            ClientInfoExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: Config) -> Result<()> {
    let clients_config = config.clients_config();
    for source in clients_config.runtime_sources.disabled() {
        info!("Source {} disabled", source);
    }

    let index = SharedRuntimeIndex::new();
    let feed = LinesFeed::new("stdin", tokio::io::BufReader::new(tokio::io::stdin()));

    let (engine, mut events) = ClientEngine::new(Box::new(feed), index.clone(), clients_config)?;

    // Report resolved names as the registry changes
    let reporter = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                EngineEvent::Applied {
                    addr,
                    source: Some(_),
                } => {
                    let (winner, host) = index.info(&addr).await;
                    info!("Client {} resolves to {:?} via {}", addr, host, source_name(winner));
                }
                EngineEvent::Rejected { addr, error } => {
                    warn!("Rejected hint for {}: {}", addr, error);
                }
                EngineEvent::SourceCleared { source, removed } => {
                    info!("Cleared {}, removed {} client(s)", source, removed);
                }
                other => debug!("Engine event: {:?}", other),
            }
        }
    });

    info!("Reading hints from stdin");
    engine.run().await?;

    info!("Shutting down daemon with {} client(s)", engine.index().size().await);
    drop(engine);
    reporter
        .await
        .map_err(|e| anyhow::anyhow!("Event reporter failed: {}", e))?;

    Ok(())
}
