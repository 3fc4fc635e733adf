//! # Contracts
//!
//! Shared data model and interface traits for the conversion relay.
//! Every other crate depends on this one; reverse dependencies are prohibited.
//!
//! ## Time Model
//! - `event_time` is Unix seconds taken when the payload is built

mod config;
mod context;
mod error;
mod event;
mod inspect;
mod transport;

pub use config::*;
pub use context::{RequestContext, FBC_COOKIE, FBP_COOKIE};
pub use error::*;
pub use event::*;
pub use inspect::Inspector;
pub use transport::*;
