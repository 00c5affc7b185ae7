pub mod pages;
pub mod trees;
