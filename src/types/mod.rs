//! This module defines the core, strongly-typed data representations used
//! throughout the xbase codec.
//!
//! It includes the closed `WireType` enum for on-disk type codes, the decoded
//! `SemanticType`, and the `Value` carried between the codec and its callers.

pub mod value;
pub mod wire_type;

// Re-export the main type(s) for easier access.
pub use value::{ElementType, Value};
pub use wire_type::{SemanticType, WireType};
