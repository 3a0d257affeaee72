//! Editable site content.
//!
//! Each section of the site (header, hero, menus, ...) is one independently
//! replaceable value. The [`ContentStore`] holds the current [`Snapshot`] of
//! all sections and writes it through to a [`SnapshotStorage`] on every
//! mutation.
//!
//! ```text
//! admin surface ─get_section──▶ ContentStore ◀──load── storage blob
//!               ─update_section─▶      └──write-through──▶ storage blob
//! ```
//!
//! [`SnapshotStorage`]: crate::persistence::SnapshotStorage

pub mod defaults;
pub mod image;
pub mod menu;
pub mod section;
pub mod snapshot;
pub mod store;
pub mod types;

pub use image::{ImageRef, ImageSource, InlineImage};
pub use menu::{MenuEditor, MenuError, MenuField};
pub use section::{Section, SectionKind, SectionValue};
pub use snapshot::{Snapshot, SNAPSHOT_VERSION};
pub use store::{ContentStore, LoadSource, WriteThrough, DEFAULT_STORAGE_KEY};
pub use types::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("section kind mismatch: expected {expected}, got {found}")]
    KindMismatch {
        expected: SectionKind,
        found: SectionKind,
    },
}

#[cfg(test)]
mod tests;
