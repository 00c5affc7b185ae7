//! Domain logic for the TreeShop catalog.
//!
//! Everything here is free of HTTP and SQL: the image resolver, the upload
//! policy, and the record lifecycle manager that drives a [`tree::TreeStore`].

pub mod error;
pub mod image;
pub mod tree;
pub mod types;
pub mod upload;
