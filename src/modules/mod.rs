//! Infrastructure adapters
//!
//! Holds the content store that keeps uploaded file bytes.

pub mod storage;
