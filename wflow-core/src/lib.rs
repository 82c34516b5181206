//! Core crate for the WhatsFlow dashboard: shared types, errors, logging.
//!
//! ## Modules
//!
//! - [`types`] – MessageStatus and shared constants
//! - [`error`] – FlowError and Result alias
//! - [`logger`] – tracing initialization (console + file)

mod error;
mod logger;
mod types;

pub use error::{FlowError, Result};
pub use logger::init_tracing;
pub use types::{MessageStatus, BOT_SENDER};
