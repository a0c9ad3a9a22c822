//! Core traits for the client registry
//!
//! - [`HintFeed`]: Deliver client information from discovery mechanisms

pub mod hint_feed;

pub use hint_feed::{HintEvent, HintFeed};
