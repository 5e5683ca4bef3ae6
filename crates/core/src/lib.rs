pub mod config;
pub mod document;
pub mod error;

pub use config::{Config, SegmenterConfig};
pub use document::*;
pub use error::*;
