//! Runtime client index
//!
//! The index maps client addresses to their [`ClientRuntime`] records. It has
//! no internal synchronization; share it through [`SharedRuntimeIndex`] when
//! several tasks need access.
//!
//! ## Usage
//!
//! ```rust
//! use clientinfo_core::{ClientRuntime, RuntimeIndex, Source};
//! use std::net::IpAddr;
//!
//! let mut index = RuntimeIndex::new();
//!
//! let mut rc = ClientRuntime::new(IpAddr::from([192, 0, 2, 1])).unwrap();
//! rc.set_info(Source::Arp, vec!["printer".to_string()]);
//! index.add(rc);
//!
//! // The ARP source got disabled
//! assert_eq!(index.delete_by_source(Source::Arp), 1);
//! assert_eq!(index.size(), 0);
//! ```

pub mod shared;

pub use shared::SharedRuntimeIndex;

use crate::runtime::ClientRuntime;
use crate::source::Source;
use std::collections::HashMap;
use std::net::IpAddr;
use std::ops::ControlFlow;
use tracing::debug;

/// Index of runtime clients keyed by address
#[derive(Debug, Clone, Default)]
pub struct RuntimeIndex {
    /// Runtime clients by address
    index: HashMap<IpAddr, ClientRuntime>,
}

impl RuntimeIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Runtime client stored for `addr`, if any
    pub fn client(&self, addr: &IpAddr) -> Option<&ClientRuntime> {
        self.index.get(addr)
    }

    /// Mutable access to the runtime client stored for `addr`
    pub fn client_mut(&mut self, addr: &IpAddr) -> Option<&mut ClientRuntime> {
        self.index.get_mut(addr)
    }

    /// Store a runtime client under its own address.
    ///
    /// A client already stored for the same address is replaced, not merged.
    pub fn add(&mut self, rc: ClientRuntime) {
        self.index.insert(rc.addr(), rc);
    }

    /// Number of runtime clients
    pub fn size(&self) -> usize {
        self.index.len()
    }

    /// Whether the index holds no clients
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Call `visit` for each runtime client in an undefined order.
    ///
    /// Iteration stops as soon as `visit` returns [`ControlFlow::Break`]. The
    /// index is borrowed for the whole walk, so `visit` cannot modify it.
    pub fn range<F>(&self, mut visit: F)
    where
        F: FnMut(&ClientRuntime) -> ControlFlow<()>,
    {
        for rc in self.index.values() {
            if visit(rc).is_break() {
                return;
            }
        }
    }

    /// Remove the runtime client stored for `addr`
    pub fn delete(&mut self, addr: &IpAddr) {
        self.index.remove(addr);
    }

    /// Drop the information from `source` on every client.
    ///
    /// Clients left without any information are removed. Returns the number
    /// of removed clients.
    pub fn delete_by_source(&mut self, source: Source) -> usize {
        let before = self.index.len();

        self.index.retain(|addr, rc| {
            rc.unset(source);
            if rc.is_empty() {
                debug!("Removing runtime client {} after clearing {:?}", addr, source);
                return false;
            }
            true
        });

        before - self.index.len()
    }
}
