//! Test doubles and common utilities for registry contract tests

#![allow(dead_code)]

use clientinfo_core::traits::{HintEvent, HintFeed};
use clientinfo_core::{ClientRuntime, EngineEvent, Source};
use std::net::IpAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::Stream;

/// A controlled HintFeed that emits events on demand
pub struct ControlledFeed {
    /// Initial table returned by initial()
    initial: Vec<HintEvent>,
    /// Receiver for the engine's watch stream
    engine_rx: Arc<std::sync::Mutex<Option<mpsc::UnboundedReceiver<HintEvent>>>>,
}

impl ControlledFeed {
    /// Create a new controlled feed
    pub fn new(initial: Vec<HintEvent>) -> (Self, mpsc::UnboundedSender<HintEvent>) {
        let (test_tx, engine_rx) = mpsc::unbounded_channel();

        let feed = Self {
            initial,
            engine_rx: Arc::new(std::sync::Mutex::new(Some(engine_rx))),
        };

        (feed, test_tx)
    }
}

#[async_trait::async_trait]
impl HintFeed for ControlledFeed {
    fn name(&self) -> &str {
        "controlled"
    }

    async fn initial(&self) -> clientinfo_core::Result<Vec<HintEvent>> {
        Ok(self.initial.clone())
    }

    fn watch(&self) -> Pin<Box<dyn Stream<Item = HintEvent> + Send + 'static>> {
        let rx = self
            .engine_rx
            .lock()
            .unwrap()
            .take()
            .expect("watch() can only be called once");

        Box::pin(tokio_stream::wrappers::UnboundedReceiverStream::new(rx))
    }
}

/// A feed whose initial table cannot be read
pub struct BrokenFeed;

#[async_trait::async_trait]
impl HintFeed for BrokenFeed {
    fn name(&self) -> &str {
        "broken"
    }

    async fn initial(&self) -> clientinfo_core::Result<Vec<HintEvent>> {
        Err(clientinfo_core::Error::feed("table unavailable"))
    }

    fn watch(&self) -> Pin<Box<dyn Stream<Item = HintEvent> + Send + 'static>> {
        Box::pin(tokio_stream::empty())
    }
}

/// Address in the documentation range 192.0.2.0/24
pub fn addr(last: u8) -> IpAddr {
    IpAddr::from([192, 0, 2, last])
}

/// Build a host list
pub fn hosts(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Build a runtime client with one host per source
pub fn client_with(last: u8, sources: &[Source]) -> ClientRuntime {
    let mut rc = ClientRuntime::new(addr(last)).expect("documentation address is valid");
    for source in sources {
        rc.set_info(*source, vec![format!("{}-{}", source.name(), last)]);
    }
    rc
}

/// Wait until the engine reports an event matching `pred`
pub async fn wait_for_event<F>(events: &mut mpsc::Receiver<EngineEvent>, mut pred: F) -> EngineEvent
where
    F: FnMut(&EngineEvent) -> bool,
{
    let wait = async {
        while let Some(event) = events.recv().await {
            if pred(&event) {
                return event;
            }
        }
        panic!("engine event channel closed");
    };

    tokio::time::timeout(tokio::time::Duration::from_secs(5), wait)
        .await
        .expect("engine event arrives within 5 seconds")
}
