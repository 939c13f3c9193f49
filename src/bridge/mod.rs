// In: src/bridge/mod.rs

// ====================================================================================
// OVERVIEW: The Arrow Bridge
// ====================================================================================
//
// The bridge is the boundary between DBF tables and Arrow, the generic tabular
// interface used on both sides of the codec.
//
// Reading:
//
//   [Table] --(to_record_batch)--> [RecordBatch]
//
//   Each field is decoded column by column into a nullable Arrow array whose
//   type follows the field's semantic type (see `SemanticType::to_arrow_type`).
//
// Writing:
//
//   [RecordBatch] --(impl TabularSource)--> [table::write]
//
//   A record batch reports its columns and cell values through the
//   `TabularSource` trait, so it can be handed straight to the writer. Arrow
//   types without a DBF mapping surface as `ElementType::Other` and are
//   rendered through Arrow's display formatter.
//
// ====================================================================================
pub(crate) mod arrow_impl;

pub use arrow_impl::{arrow_schema, to_record_batch};

#[cfg(test)]
mod tests;
