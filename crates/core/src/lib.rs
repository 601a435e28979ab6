//! Core logic for the Shanti Himalaya backend.
//!
//! This crate contains the image storage pipeline used by the admin forms,
//! with ZERO web framework dependencies.
//!
//! # Modules
//!
//! - `storage` - Remote object storage with inline fallback and best-effort deletion

pub mod storage;
