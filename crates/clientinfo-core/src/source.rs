//! Client information sources
//!
//! A [`Source`] names the mechanism a piece of client information came from.
//! Declaration order is the priority order: later variants outrank earlier
//! ones when a client has data from several sources.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The mechanism client information has been obtained from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Source {
    /// WHOIS lookup of the client address
    Whois = 1,
    /// The system ARP/neighbor table
    Arp,
    /// Reverse DNS lookup
    Rdns,
    /// DHCP leases
    Dhcp,
    /// The system hosts file
    HostsFile,
    /// Persistent client configuration, resolved elsewhere
    Persistent,
}

impl Source {
    /// Sources consulted by resolution, highest priority first.
    ///
    /// [`Source::Persistent`] is deliberately absent.
    pub const RESOLUTION_ORDER: [Source; 5] = [
        Source::HostsFile,
        Source::Dhcp,
        Source::Rdns,
        Source::Arp,
        Source::Whois,
    ];

    /// Sources whose data is a list of host names
    pub const HOST_SOURCES: [Source; 4] =
        [Source::Arp, Source::Rdns, Source::Dhcp, Source::HostsFile];

    /// Human-readable name of the source.
    ///
    /// Returns an empty string for [`Source::Persistent`].
    pub fn name(self) -> &'static str {
        match self {
            Source::Whois => "WHOIS",
            Source::Arp => "ARP",
            Source::Rdns => "rDNS",
            Source::Dhcp => "DHCP",
            Source::HostsFile => "etc/hosts",
            Source::Persistent => "",
        }
    }

    /// Whether the source reports a list of host names
    pub fn has_hosts(self) -> bool {
        Source::HOST_SOURCES.contains(&self)
    }

    /// Look up a source by its stable numeric identifier
    pub fn from_repr(id: u8) -> Option<Self> {
        match id {
            1 => Some(Source::Whois),
            2 => Some(Source::Arp),
            3 => Some(Source::Rdns),
            4 => Some(Source::Dhcp),
            5 => Some(Source::HostsFile),
            6 => Some(Source::Persistent),
            _ => None,
        }
    }

    /// Stable numeric identifier of the source
    pub fn id(self) -> u8 {
        self as u8
    }
}

/// Name of an optional source, empty when there is none.
///
/// Resolution of a client without any information yields no source; this
/// keeps the display path total.
pub fn source_name(source: Option<Source>) -> &'static str {
    source.map(Source::name).unwrap_or("")
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown source name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown client source: {0:?}")]
pub struct ParseSourceError(String);

impl FromStr for Source {
    type Err = ParseSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WHOIS" => Ok(Source::Whois),
            "ARP" => Ok(Source::Arp),
            "rDNS" => Ok(Source::Rdns),
            "DHCP" => Ok(Source::Dhcp),
            "etc/hosts" => Ok(Source::HostsFile),
            _ => Err(ParseSourceError(s.to_string())),
        }
    }
}

impl Serialize for Source {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Source {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
