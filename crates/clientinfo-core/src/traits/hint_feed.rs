// # Hint Feed Trait
//
// Defines the interface through which discovery mechanisms deliver client
// information to the registry.
//
// ## Implementations
//
// - JSON lines over any async reader: `feed::LinesFeed`
// - ARP readers, DHCP lease trackers, rDNS and WHOIS resolvers live outside
//   this crate and only need to produce `HintEvent`s
//
// ## Usage
//
// ```rust,ignore
// use clientinfo_core::HintFeed;
// use tokio_stream::StreamExt;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let feed = /* HintFeed implementation */;
//
//     // Current table of the mechanism
//     for event in feed.initial().await? {
//         println!("known: {:?}", event);
//     }
//
//     // Follow-up reports
//     let mut stream = feed.watch();
//     while let Some(event) = stream.next().await {
//         println!("hint: {:?}", event);
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::pin::Pin;
use tokio_stream::Stream;

use crate::source::Source;
use crate::whois::WhoisInfo;

/// One report from a discovery mechanism
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HintEvent {
    /// Host names reported by a host list source
    Hosts {
        /// Client address
        addr: IpAddr,
        /// Reporting source
        source: Source,
        /// Reported host names, possibly empty
        #[serde(default)]
        hosts: Vec<String>,
    },

    /// WHOIS information for a client
    Whois {
        /// Client address
        addr: IpAddr,
        /// WHOIS data
        info: WhoisInfo,
    },

    /// A source no longer has information about a client
    Unset {
        /// Client address
        addr: IpAddr,
        /// Source whose information is gone
        source: Source,
    },

    /// The client must be forgotten entirely
    Remove {
        /// Client address
        addr: IpAddr,
    },

    /// A source was turned off or its data invalidated in bulk
    SourceDisabled {
        /// The disabled source
        source: Source,
    },
}

impl HintEvent {
    /// Create a host list event
    pub fn hosts(addr: IpAddr, source: Source, hosts: Vec<String>) -> Self {
        Self::Hosts {
            addr,
            source,
            hosts,
        }
    }

    /// Source the event concerns, if any
    pub fn source(&self) -> Option<Source> {
        match self {
            HintEvent::Hosts { source, .. }
            | HintEvent::Unset { source, .. }
            | HintEvent::SourceDisabled { source } => Some(*source),
            HintEvent::Whois { .. } => Some(Source::Whois),
            HintEvent::Remove { .. } => None,
        }
    }

    /// Client address the event concerns, if any
    pub fn addr(&self) -> Option<IpAddr> {
        match self {
            HintEvent::Hosts { addr, .. }
            | HintEvent::Whois { addr, .. }
            | HintEvent::Unset { addr, .. }
            | HintEvent::Remove { addr } => Some(*addr),
            HintEvent::SourceDisabled { .. } => None,
        }
    }
}

/// Trait for discovery feeds
///
/// A feed exposes two capabilities:
/// 1. **initial()**: the mechanism's current table, applied once at startup
/// 2. **watch()**: stream of subsequent reports
///
/// Feeds only report; they never touch the registry themselves.
#[async_trait]
pub trait HintFeed: Send + Sync {
    /// Feed name for logging
    fn name(&self) -> &str;

    /// Reports describing the current state of the mechanism
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<HintEvent>)`: Known client information, possibly empty
    /// - `Err(Error)`: The mechanism could not be read
    async fn initial(&self) -> Result<Vec<HintEvent>, crate::Error> {
        Ok(Vec::new())
    }

    /// Watch for new reports
    ///
    /// The stream ends when the mechanism has nothing more to say.
    fn watch(&self) -> Pin<Box<dyn Stream<Item = HintEvent> + Send + 'static>>;
}
