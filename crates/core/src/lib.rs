//! # Cogwork Core
//!
//! Domain types, traits, and error definitions for the Cogwork agent runtime.
//! This crate has **zero framework dependencies** — it defines the domain
//! model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every subsystem is defined as a trait here. Implementations live in their
//! respective crates. This enables:
//! - Swapping model backends via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod event;
pub mod gateway;
pub mod memory;
pub mod schema;
pub mod tool;
pub mod turn;

// Re-export key types at crate root for ergonomics
pub use error::{Error, GatewayError, Result, ToolError};
pub use event::{AgentEvent, EventBus};
pub use gateway::{Gateway, GatewayResponse, Usage};
pub use memory::ConversationMemory;
pub use tool::{Tool, ToolCatalog, ToolDescriptor, ToolInvocation, ToolResult};
pub use turn::{Role, Turn};
