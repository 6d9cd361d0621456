//! Cart engine: state store, snapshot persistence and rendering.
//!
//! # Modules
//!
//! - `store` - [`CartStore`], the owned cart with its mutate/persist/render cycle
//! - `snapshot` - JSON snapshot written to storage
//! - `storage` - Key/value backends (memory, file)
//! - `render` - Projections and render targets (HTML fragments)
//! - `format` - Price and total formatting

pub mod format;
pub mod render;
pub mod snapshot;
pub mod storage;
pub mod store;

pub use format::PriceFormat;
pub use render::{BadgeView, CartItemView, CartView, Fragments, HtmlSurface, RenderTarget};
pub use snapshot::{STORAGE_KEY, Snapshot, SnapshotError};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::CartStore;
