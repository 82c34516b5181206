//! # WhatsFlow dashboard server
//!
//! Wires storage, aggregates, and the subscriber registry behind an axum
//! HTTP/WebSocket surface. Viewers connect over `/ws`, get one full snapshot,
//! and then receive incremental `update` frames as events are ingested.

pub mod config;
pub mod ingest;
pub mod query;
pub mod registry;
pub mod server;
pub mod state;
pub mod wire;

pub use config::ServerConfig;
pub use ingest::EventIngestor;
pub use query::QueryService;
pub use registry::{SubscriberId, SubscriberRegistry};
pub use server::{router, run_server};
pub use state::AppState;
pub use wire::{PushFrame, WireMessage};
