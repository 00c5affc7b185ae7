//! Database row structs.
//!
//! Each submodule holds a `FromRow` struct matching the table row and the
//! conversion into the corresponding `treeshop_core` domain type.

pub mod tree;
