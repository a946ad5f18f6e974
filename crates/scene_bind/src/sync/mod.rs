//! # Synchronization
//!
//! The engine that turns declarative node state into scene-graph calls.
//!
//! ## Organization
//!
//! - **Tokens**: the change vocabulary and its dispatch table
//! - **Changes**: per-node accumulation between flushes
//! - **Nodes**: owning-node records and their lifecycle state
//! - **Engine**: host API, apply passes, notification routing
//! - **Bindings**: resource attachment, literal fallbacks, value fan-out
//! - **Structure**: content-child re-parenting

mod token;
mod changes;
mod node;
mod report;
mod engine;
mod bindings;
mod structure;

#[cfg(test)]
mod tests;

pub use token::{Branch, ChangeToken, LiteralSlot, StructuralKind};
pub use changes::{ChangeSet, Pass};
pub use node::{NodeKind, NodeOptions, NodeState, OwningNode};
pub use report::ApplyReport;
pub use engine::SyncEngine;
