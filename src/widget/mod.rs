//! Embed Widget Runtime
//!
//! Model of the self-contained script injected into third-party host
//! pages: configuration from the script tag, a Closed/Open controller
//! driving a launcher button and a sandboxed content frame, and the
//! durable visitor identity. All host-page ambience is injected through
//! [`host::HostEnv`]; a browser shim routes real DOM events into
//! [`runtime::WidgetRuntime::on_event`].

pub mod config;
pub mod host;
pub mod runtime;
pub mod visitor;

pub use config::{EmbedConfig, Position, Theme};
pub use host::{HostEnv, HostEvent, NodeId, TimerId};
pub use runtime::{WidgetRuntime, CLOSE_DELAY_MS};
