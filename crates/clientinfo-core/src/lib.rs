// # clientinfo-core
//
// Core library for runtime client information.
//
// ## Architecture Overview
//
// This library keeps, per client address, the host names reported by each
// discovery mechanism and resolves them into one display name:
// - **Source**: The discovery mechanisms, ordered by priority
// - **ClientRuntime**: Per-address record with one slot per source
// - **RuntimeIndex**: Address-keyed collection of records
// - **SharedRuntimeIndex**: The index behind a single lock, for services
// - **HintFeed**: Trait through which discovery mechanisms report
// - **ClientEngine**: Single writer applying feed reports to the index
//
// ## Design Principles
//
// 1. **Priority as Data**: Resolution walks `Source::RESOLUTION_ORDER`
// 2. **Explicit Absence**: Absent and empty host lists are different states
// 3. **Permissive Dispatch**: Unsupported sources are ignored, not errors
// 4. **Library-First**: The daemon is a thin wrapper around this crate

pub mod config;
pub mod engine;
pub mod error;
pub mod feed;
pub mod index;
pub mod runtime;
pub mod source;
pub mod traits;
pub mod whois;

// Re-export core types for convenience
pub use config::{ClientsConfig, EngineConfig, RuntimeSourcesConfig};
pub use engine::{ClientEngine, EngineEvent};
pub use error::{Error, Result};
pub use feed::LinesFeed;
pub use index::{RuntimeIndex, SharedRuntimeIndex};
pub use runtime::ClientRuntime;
pub use source::{Source, source_name};
pub use traits::{HintEvent, HintFeed};
pub use whois::WhoisInfo;
