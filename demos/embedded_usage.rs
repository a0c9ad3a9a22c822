//! Minimal embedding example for clientinfo-core
//!
//! A custom discovery feed reports client host names; the application reads
//! resolved names from the shared index while the engine keeps writing.

use clientinfo_core::{
    ClientEngine, ClientsConfig, HintEvent, HintFeed, Result, SharedRuntimeIndex, Source,
    WhoisInfo,
};
use std::net::IpAddr;
use std::pin::Pin;
use tokio::sync::mpsc;
use tokio_stream::Stream;

/// Custom feed standing in for a DHCP lease tracker
struct EmbeddedLeaseFeed {
    leases: Vec<(IpAddr, String)>,
    rx: std::sync::Mutex<Option<mpsc::UnboundedReceiver<HintEvent>>>,
}

impl EmbeddedLeaseFeed {
    fn new(leases: Vec<(IpAddr, String)>) -> (Self, mpsc::UnboundedSender<HintEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                leases,
                rx: std::sync::Mutex::new(Some(rx)),
            },
            tx,
        )
    }
}

#[async_trait::async_trait]
impl HintFeed for EmbeddedLeaseFeed {
    fn name(&self) -> &str {
        "embedded-dhcp"
    }

    async fn initial(&self) -> Result<Vec<HintEvent>> {
        Ok(self
            .leases
            .iter()
            .map(|(addr, host)| HintEvent::hosts(*addr, Source::Dhcp, vec![host.clone()]))
            .collect())
    }

    fn watch(&self) -> Pin<Box<dyn Stream<Item = HintEvent> + Send + 'static>> {
        match self.rx.lock().ok().and_then(|mut guard| guard.take()) {
            Some(rx) => Box::pin(tokio_stream::wrappers::UnboundedReceiverStream::new(rx)),
            None => Box::pin(tokio_stream::empty()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    println!("=== Embedded clientinfo-core Example ===\n");

    let laptop = IpAddr::from([192, 0, 2, 10]);
    let printer = IpAddr::from([192, 0, 2, 20]);

    let (feed, hint_tx) = EmbeddedLeaseFeed::new(vec![(laptop, "laptop.lan".to_string())]);
    let index = SharedRuntimeIndex::new();

    println!("1. Creating engine...");
    let (engine, mut event_rx) =
        ClientEngine::new(Box::new(feed), index.clone(), ClientsConfig::new())?;

    let event_listener = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            println!("[Event] {:?}", event);
        }
    });

    println!("2. Starting engine in background...");
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let engine_handle =
        tokio::spawn(async move { engine.run_with_shutdown(Some(shutdown_rx)).await });

    // Other discovery mechanisms report through the same feed
    let _ = hint_tx.send(HintEvent::hosts(printer, Source::Arp, vec!["printer".into()]));
    let _ = hint_tx.send(HintEvent::Whois {
        addr: printer,
        info: WhoisInfo::new().with_orgname("Example Org"),
    });
    let _ = hint_tx.send(HintEvent::hosts(laptop, Source::HostsFile, vec!["".into()]));

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    println!("\n3. Resolved names:");
    for addr in [laptop, printer] {
        let (source, host) = index.info(&addr).await;
        println!("   {} -> {:?} ({:?})", addr, host, source);
    }

    println!("\n4. ARP source turned off...");
    let _ = hint_tx.send(HintEvent::SourceDisabled {
        source: Source::Arp,
    });
    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    println!("   {} client(s) left", index.size().await);

    println!("\n5. Stopping engine...");
    let _ = shutdown_tx.send(());
    engine_handle
        .await
        .map_err(|e| clientinfo_core::Error::Other(e.to_string()))??;
    let _ = tokio::time::timeout(tokio::time::Duration::from_millis(100), event_listener).await;

    println!("\n=== Embedding Successful ===");

    Ok(())
}
