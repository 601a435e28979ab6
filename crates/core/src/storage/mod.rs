//! Image storage for admin-managed content.
//!
//! Uploads go to Cloudflare R2 through its REST API. When the remote store is
//! unreachable or misconfigured the upload degrades to an inline `data:` URI so
//! content authors are never blocked. Deletion is best-effort and routed by the
//! kind of reference that was stored.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        UploadService                          │
//! ├──────────────────────────────┬───────────────────────────────┤
//! │ ObjectStore (R2Client)       │ InlineEncoder                 │
//! │ PUT    {objects}/{key}       │ data:{mime};base64,{payload}  │
//! │ DELETE {objects}/{key}       │ delete is a no-op             │
//! │ GET    {objects}             │                               │
//! └──────────────────────────────┴───────────────────────────────┘
//! ```

mod config;
mod error;
mod fallback;
mod key;
mod reference;
mod remote;
mod service;
mod types;

pub use config::R2Config;
pub use error::StorageError;
pub use fallback::InlineEncoder;
pub use key::{StorageKey, sanitize_file_name};
pub use reference::StoredReference;
pub use remote::{ObjectStore, R2Client};
pub use service::UploadService;
pub use types::{DeleteOutcome, StoredObject, UploadRequest};
