// # Shared Runtime Index
//
// A RuntimeIndex behind one coarse-grained lock.
//
// ## Purpose
//
// The DNS service answers many lookups while discovery results keep arriving.
// Every operation here takes the lock exactly once, so read-modify-write
// sequences such as clearing a source across all clients are atomic with
// respect to other callers.
//
// Per-client locking is not provided.

use std::net::IpAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::RuntimeIndex;
use crate::error::Result;
use crate::runtime::ClientRuntime;
use crate::source::Source;
use crate::whois::WhoisInfo;

/// Thread-safe handle to a runtime client index
///
/// Clones share the same underlying index.
///
/// # Example
///
/// ```rust,no_run
/// use clientinfo_core::{SharedRuntimeIndex, Source};
/// use std::net::IpAddr;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let index = SharedRuntimeIndex::new();
///     let addr: IpAddr = "192.0.2.10".parse()?;
///
///     index.set_info(addr, Source::Dhcp, vec!["host.example".into()]).await?;
///
///     let (source, host) = index.info(&addr).await;
///     assert_eq!(source, Some(Source::Dhcp));
///     assert_eq!(host, "host.example");
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedRuntimeIndex {
    inner: Arc<RwLock<RuntimeIndex>>,
}

impl SharedRuntimeIndex {
    /// Create a new empty shared index
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolved client information for `addr`.
    ///
    /// Unknown clients resolve to `(None, "")`.
    pub async fn info(&self, addr: &IpAddr) -> (Option<Source>, String) {
        let guard = self.inner.read().await;
        match guard.client(addr) {
            Some(rc) => {
                let (source, host) = rc.info();
                (source, host.to_string())
            }
            None => (None, String::new()),
        }
    }

    /// Copy of the runtime client stored for `addr`
    pub async fn client(&self, addr: &IpAddr) -> Option<ClientRuntime> {
        self.inner.read().await.client(addr).cloned()
    }

    /// Record host names reported by `source` for `addr`.
    ///
    /// The client is created when it is not yet known. Returns `false` when
    /// `source` carries no host list and nothing was stored.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidAddress`] when a new client would have
    /// to be created for an unspecified address.
    pub async fn set_info(&self, addr: IpAddr, source: Source, hosts: Vec<String>) -> Result<bool> {
        if !source.has_hosts() {
            debug!("Not storing host list from {:?} for client {}", source, addr);
            return Ok(false);
        }

        let mut guard = self.inner.write().await;
        if let Some(rc) = guard.client_mut(&addr) {
            rc.set_info(source, hosts);
            return Ok(true);
        }

        let mut rc = ClientRuntime::new(addr)?;
        rc.set_info(source, hosts);
        guard.add(rc);
        Ok(true)
    }

    /// Record WHOIS information for `addr`, creating the client if needed
    pub async fn set_whois(&self, addr: IpAddr, whois: WhoisInfo) -> Result<()> {
        let mut guard = self.inner.write().await;
        if let Some(rc) = guard.client_mut(&addr) {
            rc.set_whois(whois);
            return Ok(());
        }

        let mut rc = ClientRuntime::new(addr)?;
        rc.set_whois(whois);
        guard.add(rc);
        Ok(())
    }

    /// Drop `source` information of `addr`.
    ///
    /// The client is removed once it has no information left. Returns whether
    /// it was removed.
    pub async fn unset(&self, addr: &IpAddr, source: Source) -> bool {
        let mut guard = self.inner.write().await;
        let Some(rc) = guard.client_mut(addr) else {
            return false;
        };

        rc.unset(source);
        if rc.is_empty() {
            guard.delete(addr);
            return true;
        }
        false
    }

    /// Store a runtime client, replacing any client with the same address
    pub async fn add(&self, rc: ClientRuntime) {
        self.inner.write().await.add(rc);
    }

    /// Remove the runtime client stored for `addr`
    pub async fn delete(&self, addr: &IpAddr) {
        self.inner.write().await.delete(addr);
    }

    /// Drop `source` information on every client.
    ///
    /// Returns the number of clients removed because nothing was left.
    pub async fn delete_by_source(&self, source: Source) -> usize {
        let removed = self.inner.write().await.delete_by_source(source);
        info!("Cleared {} information, removed {} runtime client(s)", source.name(), removed);
        removed
    }

    /// Number of runtime clients
    pub async fn size(&self) -> usize {
        self.inner.read().await.size()
    }

    /// Whether the index holds no clients
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Copy of every runtime client, in an undefined order
    pub async fn snapshot(&self) -> Vec<ClientRuntime> {
        let guard = self.inner.read().await;
        let mut clients = Vec::with_capacity(guard.size());
        guard.range(|rc| {
            clients.push(rc.clone());
            std::ops::ControlFlow::Continue(())
        });
        clients
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shared_index_basic() {
        let index = SharedRuntimeIndex::new();
        let addr = IpAddr::from([192, 0, 2, 10]);

        assert!(index.is_empty().await);
        assert_eq!(index.info(&addr).await, (None, String::new()));

        index
            .set_info(addr, Source::Dhcp, vec!["host.example".to_string()])
            .await
            .unwrap();
        index
            .set_info(addr, Source::Arp, vec!["other".to_string()])
            .await
            .unwrap();

        assert_eq!(index.size().await, 1);
        assert_eq!(
            index.info(&addr).await,
            (Some(Source::Dhcp), "host.example".to_string())
        );
    }

    #[tokio::test]
    async fn test_shared_index_rejects_unspecified() {
        let index = SharedRuntimeIndex::new();
        let addr = IpAddr::from([0, 0, 0, 0]);

        assert!(index.set_info(addr, Source::Arp, vec!["x".into()]).await.is_err());
        assert!(index.set_whois(addr, WhoisInfo::new()).await.is_err());
        assert!(index.is_empty().await);
    }

    #[tokio::test]
    async fn test_unsupported_source_does_not_create_client() {
        let index = SharedRuntimeIndex::new();
        let addr = IpAddr::from([192, 0, 2, 3]);

        let stored = index
            .set_info(addr, Source::Persistent, vec!["pinned".into()])
            .await
            .unwrap();
        assert!(!stored);

        let stored = index
            .set_info(addr, Source::Whois, vec!["whois".into()])
            .await
            .unwrap();
        assert!(!stored);
        assert!(index.client(&addr).await.is_none());

        assert!(index.set_info(addr, Source::Arp, vec![]).await.unwrap());
        assert_eq!(index.info(&addr).await, (Some(Source::Arp), String::new()));
    }

    #[tokio::test]
    async fn test_unset_removes_empty_client() {
        let index = SharedRuntimeIndex::new();
        let addr = IpAddr::from([192, 0, 2, 4]);

        index.set_whois(addr, WhoisInfo::new().with_country("DE")).await.unwrap();
        index.set_info(addr, Source::Rdns, vec![]).await.unwrap();

        assert!(!index.unset(&addr, Source::Rdns).await);
        assert_eq!(index.info(&addr).await.0, Some(Source::Whois));

        assert!(index.unset(&addr, Source::Whois).await);
        assert!(index.client(&addr).await.is_none());
        assert!(!index.unset(&addr, Source::Whois).await);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let index = SharedRuntimeIndex::new();
        let other = index.clone();

        let mut rc = ClientRuntime::new(IpAddr::from([192, 0, 2, 5])).unwrap();
        rc.set_info(Source::HostsFile, vec!["router".into()]);
        other.add(rc).await;

        assert_eq!(index.snapshot().await.len(), 1);
        assert_eq!(index.delete_by_source(Source::HostsFile).await, 1);
        assert!(other.is_empty().await);
    }
}
