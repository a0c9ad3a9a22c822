//! Configuration types for the client registry
//!
//! This module defines the configuration consumed by [`crate::ClientEngine`].

use crate::source::Source;
use serde::{Deserialize, Serialize};

/// Main client registry configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientsConfig {
    /// Which runtime sources feed the registry
    #[serde(default)]
    pub runtime_sources: RuntimeSourcesConfig,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl ClientsConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.engine.validate()
    }
}

/// Enablement of each runtime client source
///
/// Information from a disabled source is dropped on arrival, and anything
/// already stored from it is purged when the engine starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeSourcesConfig {
    /// Use WHOIS information
    #[serde(default = "default_enabled")]
    pub whois: bool,

    /// Use the ARP table
    #[serde(default = "default_enabled")]
    pub arp: bool,

    /// Use reverse DNS
    #[serde(default = "default_enabled")]
    pub rdns: bool,

    /// Use DHCP leases
    #[serde(default = "default_enabled")]
    pub dhcp: bool,

    /// Use the hosts file
    #[serde(default = "default_enabled")]
    pub hosts: bool,
}

impl RuntimeSourcesConfig {
    /// Whether information from `source` is accepted.
    ///
    /// [`Source::Persistent`] is never a runtime source.
    pub fn is_enabled(&self, source: Source) -> bool {
        match source {
            Source::Whois => self.whois,
            Source::Arp => self.arp,
            Source::Rdns => self.rdns,
            Source::Dhcp => self.dhcp,
            Source::HostsFile => self.hosts,
            Source::Persistent => false,
        }
    }

    /// Enable or disable a source
    pub fn with_source(mut self, source: Source, enabled: bool) -> Self {
        match source {
            Source::Whois => self.whois = enabled,
            Source::Arp => self.arp = enabled,
            Source::Rdns => self.rdns = enabled,
            Source::Dhcp => self.dhcp = enabled,
            Source::HostsFile => self.hosts = enabled,
            Source::Persistent => {}
        }
        self
    }

    /// Runtime sources that are switched off
    pub fn disabled(&self) -> Vec<Source> {
        Source::RESOLUTION_ORDER
            .into_iter()
            .filter(|source| !self.is_enabled(*source))
            .collect()
    }
}

impl Default for RuntimeSourcesConfig {
    fn default() -> Self {
        Self {
            whois: true,
            arp: true,
            rdns: true,
            dhcp: true,
            hosts: true,
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Capacity of the engine event channel
    ///
    /// When full, new engine events are dropped with a warning log.
    ///
    /// Default: 1000 events
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl EngineConfig {
    /// Validate the engine configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("Event channel capacity must be > 0"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

fn default_event_channel_capacity() -> usize {
    1000
}
