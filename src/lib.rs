pub mod client;
pub mod config;
pub mod error;
pub mod server;
pub mod tools;
pub mod types;

pub use client::GrokipediaClient;
pub use config::{ClientConfig, PageConfig, SearchConfig};
pub use error::{GrokipediaError, Result};
pub use tools::GrokipediaTools;
pub use types::{Citation, Image, Metadata, Page, SearchResult};
