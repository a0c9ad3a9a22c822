//! Hint feed implementations

pub mod lines;

pub use lines::{LinesFeed, parse_line};
