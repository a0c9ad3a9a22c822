//! Client information engine
//!
//! The ClientEngine is the single writer of a [`SharedRuntimeIndex`]:
//! - Reading hint events from a HintFeed
//! - Dropping information from disabled sources
//! - Applying hints to the shared index
//! - Purging sources in bulk when they are disabled
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  HintFeed   │─── HintEvent ───┐
//! └─────────────┘                 │
//!                                 ▼
//!                        ┌──────────────┐
//!                        │ ClientEngine │
//!                        └──────────────┘
//!                                 │
//!                ┌────────────────┴────────────────┐
//!                ▼                                 ▼
//!     ┌────────────────────┐              ┌─────────────┐
//!     │ SharedRuntimeIndex │              │   Events    │
//!     │ (apply)            │              │  (notify)   │
//!     └────────────────────┘              └─────────────┘
//! ```
//!
//! Readers hold clones of the same [`SharedRuntimeIndex`] and resolve client
//! names concurrently with the engine.

use crate::config::{ClientsConfig, RuntimeSourcesConfig};
use crate::error::{Error, Result};
use crate::index::SharedRuntimeIndex;
use crate::source::Source;
use crate::traits::{HintEvent, HintFeed};
use std::net::IpAddr;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tracing::{debug, error, info, warn};

/// Events emitted by the ClientEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A hint was applied to the index
    Applied {
        addr: IpAddr,
        source: Option<Source>,
    },

    /// A hint was dropped: its source is disabled or carries no host list
    Ignored { source: Source },

    /// A hint was rejected
    Rejected { addr: IpAddr, error: String },

    /// A source was cleared on every client
    SourceCleared { source: Source, removed: usize },

    /// Engine started
    Started { disabled_sources: Vec<Source> },

    /// Engine stopped
    Stopped { reason: String },
}

/// Core client information engine
///
/// ## Lifecycle
///
/// 1. Create with [`ClientEngine::new()`]
/// 2. Start with [`ClientEngine::run()`]
/// 3. Engine runs until shutdown signal received or the feed ends
/// 4. Drop to cleanup
///
/// The index is shared: the engine keeps writing while other tasks read
/// through their own clones.
pub struct ClientEngine {
    /// Source of hint events
    feed: Box<dyn HintFeed>,

    /// Index the hints are applied to
    index: SharedRuntimeIndex,

    /// Source enablement
    sources: RuntimeSourcesConfig,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl ClientEngine {
    /// Create a new client engine
    ///
    /// # Parameters
    ///
    /// - `feed`: Hint feed implementation
    /// - `index`: Shared index to apply hints to
    /// - `config`: Client registry configuration
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields engine events
    pub fn new(
        feed: Box<dyn HintFeed>,
        index: SharedRuntimeIndex,
        config: ClientsConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.engine.event_channel_capacity);

        let engine = Self {
            feed,
            index,
            sources: config.runtime_sources,
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Handle to the index the engine writes to
    pub fn index(&self) -> &SharedRuntimeIndex {
        &self.index
    }

    /// Run the engine
    ///
    /// Applies hints until a shutdown signal (Ctrl-C) is received or the
    /// feed's watch stream ends.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Clean shutdown
    /// - `Err(Error)`: The feed could not deliver its initial table
    pub async fn run(&self) -> Result<()> {
        self.run_internal(None).await
    }

    /// Internal run implementation that accepts an optional shutdown signal
    async fn run_internal(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        let disabled = self.sources.disabled();
        self.emit_event(EngineEvent::Started {
            disabled_sources: disabled.clone(),
        });

        // Nothing from a disabled source may linger in a reused index
        for source in disabled {
            let removed = self.index.delete_by_source(source).await;
            self.emit_event(EngineEvent::SourceCleared { source, removed });
        }

        let initial = self
            .feed
            .initial()
            .await
            .map_err(|e| Error::feed(format!("{}: {}", self.feed.name(), e)))?;
        info!("Feed {} reported {} initial hint(s)", self.feed.name(), initial.len());
        for event in initial {
            self.handle_hint(event).await;
        }

        let mut hints = self.feed.watch();

        if let Some(mut rx) = shutdown_rx {
            loop {
                tokio::select! {
                    event = hints.next() => match event {
                        Some(event) => self.handle_hint(event).await,
                        None => {
                            self.feed_ended();
                            break;
                        }
                    },

                    _ = &mut rx => {
                        info!("Shutdown signal received");
                        self.emit_event(EngineEvent::Stopped {
                            reason: "Shutdown signal".to_string(),
                        });
                        break;
                    }
                }
            }
        } else {
            loop {
                tokio::select! {
                    event = hints.next() => match event {
                        Some(event) => self.handle_hint(event).await,
                        None => {
                            self.feed_ended();
                            break;
                        }
                    },

                    _ = tokio::signal::ctrl_c() => {
                        info!("Shutdown signal received");
                        self.emit_event(EngineEvent::Stopped {
                            reason: "Shutdown signal".to_string(),
                        });
                        break;
                    }
                }
            }
        }

        info!("Engine stopped with {} runtime client(s)", self.index.size().await);

        Ok(())
    }

    /// Report that the feed has no more hints to deliver
    fn feed_ended(&self) {
        info!("Feed {} ended", self.feed.name());
        self.emit_event(EngineEvent::Stopped {
            reason: "Feed ended".to_string(),
        });
    }

    /// Apply a single hint event
    async fn handle_hint(&self, event: HintEvent) {
        if let Some(source) = event.source()
            && !matches!(event, HintEvent::SourceDisabled { .. })
            && !self.sources.is_enabled(source)
        {
            debug!("Dropping hint from disabled source {:?}", source);
            self.emit_event(EngineEvent::Ignored { source });
            return;
        }

        let source = event.source();
        let result = match event {
            HintEvent::Hosts {
                addr,
                source,
                hosts,
            } => match self.index.set_info(addr, source, hosts).await {
                Ok(true) => Ok(addr),
                Ok(false) => {
                    debug!("Hint for {} from {:?} carries nothing to store", addr, source);
                    self.emit_event(EngineEvent::Ignored { source });
                    return;
                }
                Err(e) => Err(e),
            },
            HintEvent::Whois { addr, info } => self.index.set_whois(addr, info).await.map(|_| addr),
            HintEvent::Unset { addr, source } => {
                self.index.unset(&addr, source).await;
                Ok(addr)
            }
            HintEvent::Remove { addr } => {
                self.index.delete(&addr).await;
                Ok(addr)
            }
            HintEvent::SourceDisabled { source } => {
                let removed = self.index.delete_by_source(source).await;
                self.emit_event(EngineEvent::SourceCleared { source, removed });
                return;
            }
        };

        match result {
            Ok(addr) => {
                debug!("Applied hint for {} from {:?}", addr, source);
                self.emit_event(EngineEvent::Applied { addr, source });
            }
            Err(Error::InvalidAddress(addr)) => {
                warn!("Rejected hint for invalid address {}", addr);
                self.emit_event(EngineEvent::Rejected {
                    addr,
                    error: Error::InvalidAddress(addr).to_string(),
                });
            }
            Err(e) => {
                error!("Failed to apply hint: {}", e);
            }
        }
    }

    /// Emit an engine event
    fn emit_event(&self, event: EngineEvent) {
        if self.event_tx.try_send(event).is_err() {
            warn!("Event channel full, dropping event. Consider increasing event_channel_capacity.");
        }
    }

    /// Run the engine with a controlled shutdown signal
    ///
    /// Embedders that manage shutdown themselves pass the receiving end of a
    /// oneshot channel. `None` behaves like [`ClientEngine::run()`].
    pub async fn run_with_shutdown(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.run_internal(shutdown_rx).await
    }
}
