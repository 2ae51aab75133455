//! Light Archive Common Library
//!
//! Shared types, relatedness ranking, and the Supabase/OpenAI clients behind
//! the Light Archive MCP server.

pub mod config;
pub mod error;
pub mod llm;
pub mod related;
pub mod storage;
pub mod store;
pub mod supabase;
pub mod types;

#[cfg(test)]
mod config_test;
#[cfg(test)]
mod error_test;
#[cfg(test)]
mod related_test;
#[cfg(test)]
mod types_test;

pub use config::Config;
pub use error::{Error, Result};
pub use llm::{OpenAiClient, TextGenerator};
pub use related::{rank, RelatedArchive};
pub use storage::ObjectStore;
pub use store::ArchiveStore;
pub use supabase::SupabaseClient;
pub use types::{ArchiveCategory, ArchiveItem, ArchiveStatus, ResponseFormat};
