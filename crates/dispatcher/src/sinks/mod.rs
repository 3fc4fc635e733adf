//! Output implementations
//!
//! Contains the Graph API transport and the debug inspectors.

mod graph_api;
mod inspect;

pub use self::graph_api::GraphApiTransport;
pub use self::inspect::{BufferInspector, LogInspector, StdoutInspector};
