//! Runtime client information
//!
//! A [`ClientRuntime`] holds, independently, the latest data reported by each
//! discovery source for one client address. Each host list slot has three
//! states:
//!
//! - `None`: no information from the source
//! - `Some(vec![])`: the source reported, but had nothing
//! - `Some(hosts)`: the source reported host names
//!
//! ## Example
//!
//! ```rust
//! use clientinfo_core::{ClientRuntime, Source};
//! use std::net::IpAddr;
//!
//! let addr: IpAddr = "192.0.2.10".parse().unwrap();
//! let mut rc = ClientRuntime::new(addr).unwrap();
//!
//! rc.set_info(Source::Dhcp, vec!["host.example".to_string()]);
//! rc.set_info(Source::Arp, vec!["other".to_string()]);
//! assert_eq!(rc.info(), (Some(Source::Dhcp), "host.example"));
//! ```

use crate::error::{Error, Result};
use crate::source::Source;
use crate::whois::WhoisInfo;
use serde::Serialize;
use std::net::IpAddr;
use tracing::debug;

/// Client information gathered from runtime sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientRuntime {
    /// Address of the client
    addr: IpAddr,

    /// Filtered WHOIS information
    #[serde(skip_serializing_if = "Option::is_none")]
    whois: Option<WhoisInfo>,

    /// Host names from the ARP table
    #[serde(skip_serializing_if = "Option::is_none")]
    arp: Option<Vec<String>>,

    /// Host names from reverse DNS
    #[serde(skip_serializing_if = "Option::is_none")]
    rdns: Option<Vec<String>>,

    /// Host names from DHCP leases
    #[serde(skip_serializing_if = "Option::is_none")]
    dhcp: Option<Vec<String>>,

    /// Host names from the hosts file
    #[serde(skip_serializing_if = "Option::is_none")]
    hosts_file: Option<Vec<String>>,
}

impl ClientRuntime {
    /// Create a runtime client without any information.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] for unspecified addresses
    /// (`0.0.0.0` and `::`), which cannot identify a client.
    pub fn new(addr: IpAddr) -> Result<Self> {
        if addr.is_unspecified() {
            return Err(Error::InvalidAddress(addr));
        }

        Ok(Self {
            addr,
            whois: None,
            arp: None,
            rdns: None,
            dhcp: None,
            hosts_file: None,
        })
    }

    /// Client information from the highest-priority source.
    ///
    /// Returns the winning source and its first host name. The name is empty
    /// when the source reported no hosts, or when the winner is WHOIS, which
    /// carries no host names. Returns `(None, "")` when no source has data.
    pub fn info(&self) -> (Option<Source>, &str) {
        for source in Source::RESOLUTION_ORDER {
            if source == Source::Whois {
                if self.whois.is_some() {
                    return (Some(source), "");
                }
                continue;
            }

            // TODO: return every host name once callers can display them.
            if let Some(hosts) = self.hosts(source) {
                let host = hosts.first().map(String::as_str).unwrap_or("");
                return (Some(source), host);
            }
        }

        (None, "")
    }

    /// Host names reported by a host list source.
    ///
    /// Returns `None` when the source has no information, and also for
    /// sources that carry no host list.
    pub fn hosts(&self, source: Source) -> Option<&[String]> {
        let slot = match source {
            Source::Arp => &self.arp,
            Source::Rdns => &self.rdns,
            Source::Dhcp => &self.dhcp,
            Source::HostsFile => &self.hosts_file,
            Source::Whois | Source::Persistent => return None,
        };

        slot.as_deref()
    }

    /// Replace the host names reported by `source`.
    ///
    /// A single empty host name is stored as "present but empty". Sources
    /// without a host list are ignored.
    pub fn set_info(&mut self, source: Source, mut hosts: Vec<String>) {
        if hosts.len() == 1 && hosts[0].is_empty() {
            hosts.clear();
        }

        if let Some(slot) = self.hosts_slot_mut(source) {
            *slot = Some(hosts);
        }
    }

    /// WHOIS information of the client
    pub fn whois(&self) -> Option<&WhoisInfo> {
        self.whois.as_ref()
    }

    /// Replace the WHOIS information of the client
    pub fn set_whois(&mut self, info: WhoisInfo) {
        self.whois = Some(info);
    }

    /// Drop all information from `source`
    pub fn unset(&mut self, source: Source) {
        if source == Source::Whois {
            self.whois = None;
            return;
        }

        if let Some(slot) = self.hosts_slot_mut(source) {
            *slot = None;
        }
    }

    /// Whether no source has information about the client
    pub fn is_empty(&self) -> bool {
        self.whois.is_none()
            && self.arp.is_none()
            && self.rdns.is_none()
            && self.dhcp.is_none()
            && self.hosts_file.is_none()
    }

    /// Address of the client
    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    /// Slot of a host list source.
    ///
    /// This is the single place where unsupported sources are dropped.
    fn hosts_slot_mut(&mut self, source: Source) -> Option<&mut Option<Vec<String>>> {
        match source {
            Source::Arp => Some(&mut self.arp),
            Source::Rdns => Some(&mut self.rdns),
            Source::Dhcp => Some(&mut self.dhcp),
            Source::HostsFile => Some(&mut self.hosts_file),
            Source::Whois | Source::Persistent => {
                debug!("Ignoring unsupported source {:?} for client {}", source, self.addr);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn client() -> ClientRuntime {
        ClientRuntime::new(IpAddr::from([192, 0, 2, 10])).unwrap()
    }

    #[test]
    fn test_new_rejects_unspecified() {
        let err = ClientRuntime::new(IpAddr::from([0, 0, 0, 0])).unwrap_err();
        assert!(matches!(err, Error::InvalidAddress(_)));

        let err = ClientRuntime::new("::".parse().unwrap()).unwrap_err();
        assert!(matches!(err, Error::InvalidAddress(_)));

        let rc = ClientRuntime::new("2001:db8::1".parse().unwrap()).unwrap();
        assert!(rc.is_empty());
        assert_eq!(rc.info(), (None, ""));
    }

    #[test]
    fn test_info_priority_scenario() {
        let mut rc = client();

        rc.set_info(Source::Dhcp, hosts(&["host.example"]));
        rc.set_info(Source::Arp, hosts(&["other"]));
        assert_eq!(rc.info(), (Some(Source::Dhcp), "host.example"));

        // Hosts file outranks DHCP even with an empty payload
        rc.set_info(Source::HostsFile, hosts(&[""]));
        assert_eq!(rc.info(), (Some(Source::HostsFile), ""));
    }

    #[test]
    fn test_info_every_combination() {
        // Bit i set means RESOLUTION_ORDER[i] has data
        for mask in 1u32..(1 << Source::RESOLUTION_ORDER.len()) {
            let mut rc = client();
            for (i, source) in Source::RESOLUTION_ORDER.iter().enumerate() {
                if mask & (1 << i) == 0 {
                    continue;
                }
                if *source == Source::Whois {
                    rc.set_whois(WhoisInfo::new().with_country("AU"));
                } else {
                    rc.set_info(*source, hosts(&[source.name()]));
                }
            }

            let expected = Source::RESOLUTION_ORDER[mask.trailing_zeros() as usize];
            let (source, host) = rc.info();
            assert_eq!(source, Some(expected), "mask {mask:#07b}");
            if expected == Source::Whois {
                assert_eq!(host, "");
            } else {
                assert_eq!(host, expected.name());
            }
        }
    }

    #[test]
    fn test_info_returns_first_host() {
        let mut rc = client();
        rc.set_info(Source::Rdns, hosts(&["first.lan", "second.lan"]));
        assert_eq!(rc.info(), (Some(Source::Rdns), "first.lan"));
    }

    #[test]
    fn test_empty_host_normalized() {
        let mut a = client();
        let mut b = client();

        a.set_info(Source::Arp, hosts(&[""]));
        b.set_info(Source::Arp, Vec::new());

        assert_eq!(a.hosts(Source::Arp), Some(&[][..]));
        assert_eq!(a, b);
        assert!(!a.is_empty());

        // Only a lone empty name is normalized
        a.set_info(Source::Arp, hosts(&["", "named"]));
        assert_eq!(a.hosts(Source::Arp).map(<[String]>::len), Some(2));
    }

    #[test]
    fn test_unset_restores_absence() {
        for source in Source::HOST_SOURCES {
            let mut rc = client();
            rc.set_info(source, hosts(&["host"]));
            assert!(!rc.is_empty());

            rc.unset(source);
            assert_eq!(rc.hosts(source), None);
            assert!(rc.is_empty());
        }

        let mut rc = client();
        rc.set_whois(WhoisInfo::new().with_orgname("Example Org"));
        assert_eq!(rc.info(), (Some(Source::Whois), ""));
        rc.unset(Source::Whois);
        assert!(rc.whois().is_none());
        assert!(rc.is_empty());
    }

    #[test]
    fn test_unsupported_sources_are_ignored() {
        let mut rc = client();

        rc.set_info(Source::Persistent, hosts(&["pinned"]));
        rc.set_info(Source::Whois, hosts(&["whois"]));
        assert!(rc.is_empty());

        rc.set_info(Source::Dhcp, hosts(&["host"]));
        rc.unset(Source::Persistent);
        assert_eq!(rc.info(), (Some(Source::Dhcp), "host"));
    }

    #[test]
    fn test_whois_round_trip() {
        let mut rc = client();
        assert!(rc.whois().is_none());

        let info = WhoisInfo::new().with_city("Sydney").with_country("AU");
        rc.set_whois(info.clone());
        assert_eq!(rc.whois(), Some(&info));
        assert_eq!(rc.addr(), IpAddr::from([192, 0, 2, 10]));
    }
}
