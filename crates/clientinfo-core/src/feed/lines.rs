//! JSON-lines hint feed
//!
//! Reads one [`HintEvent`] per line from an async reader. Blank lines are
//! skipped; malformed lines are logged and skipped so a single bad report
//! cannot stall the feed.

use std::pin::Pin;
use std::sync::Mutex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_stream::wrappers::LinesStream;
use tokio_stream::{Stream, StreamExt};
use tracing::warn;

use crate::error::Result;
use crate::traits::{HintEvent, HintFeed};

/// Hint feed reading JSON lines
///
/// The reader is consumed by the first call to [`HintFeed::watch`]; later
/// calls yield an empty stream.
pub struct LinesFeed<R> {
    name: String,
    reader: Mutex<Option<R>>,
}

impl<R> LinesFeed<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    /// Create a feed over `reader`
    pub fn new(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            reader: Mutex::new(Some(reader)),
        }
    }
}

/// Parse one line, `None` for blank input
pub fn parse_line(line: &str) -> Result<Option<HintEvent>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    Ok(Some(serde_json::from_str(line)?))
}

#[async_trait::async_trait]
impl<R> HintFeed for LinesFeed<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn watch(&self) -> Pin<Box<dyn Stream<Item = HintEvent> + Send + 'static>> {
        let reader = match self.reader.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        let Some(reader) = reader else {
            warn!("Feed {} watched more than once", self.name);
            return Box::pin(tokio_stream::empty());
        };

        let name = self.name.clone();
        let stream = LinesStream::new(reader.lines()).filter_map(move |line| match line {
            Ok(line) => match parse_line(&line) {
                Ok(event) => event,
                Err(e) => {
                    warn!("Feed {} sent malformed hint {:?}: {}", name, line.trim(), e);
                    None
                }
            },
            Err(e) => {
                warn!("Feed {} read error: {}", name, e);
                None
            }
        });

        Box::pin(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;
    use std::net::IpAddr;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn test_lines_feed_parses_and_skips() {
        let reader = tokio_test::io::Builder::new()
            .read(b"{\"kind\":\"hosts\",\"addr\":\"192.0.2.1\",\"source\":\"ARP\",\"hosts\":[\"a\"]}\n")
            .read(b"\n")
            .read(b"not json\n")
            .read(b"{\"kind\":\"remove\",\"addr\":\"192.0.2.1\"}\n")
            .build();

        let feed = LinesFeed::new("test", BufReader::new(reader));
        assert_eq!(feed.name(), "test");
        assert!(feed.initial().await.unwrap().is_empty());

        let events: Vec<HintEvent> = feed.watch().collect().await;
        assert_eq!(
            events,
            vec![
                HintEvent::hosts(IpAddr::from([192, 0, 2, 1]), Source::Arp, vec!["a".into()]),
                HintEvent::Remove {
                    addr: IpAddr::from([192, 0, 2, 1])
                },
            ]
        );

        // Reader already consumed
        let events: Vec<HintEvent> = feed.watch().collect().await;
        assert!(events.is_empty());
    }

    #[test]
    fn test_parse_line() {
        assert!(parse_line("   ").unwrap().is_none());

        let event = parse_line(r#" {"kind":"unset","addr":"192.0.2.2","source":"rDNS"} "#)
            .unwrap()
            .unwrap();
        assert_eq!(event.source(), Some(Source::Rdns));

        let err = parse_line(r#"{"kind":"hosts","addr":"192.0.2.2","source":"persistent"}"#)
            .unwrap_err();
        assert!(matches!(err, crate::Error::Json(_)));
    }

    #[tokio::test]
    async fn test_lines_feed_survives_read_error() {
        let reader = tokio_test::io::Builder::new()
            .read_error(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset"))
            .read(b"{\"kind\":\"source_disabled\",\"source\":\"DHCP\"}\n")
            .build();

        let feed = LinesFeed::new("flaky", BufReader::new(reader));
        let events: Vec<HintEvent> = feed.watch().collect().await;
        assert_eq!(
            events,
            vec![HintEvent::SourceDisabled {
                source: Source::Dhcp
            }]
        );
    }
}
