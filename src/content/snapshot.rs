//! Full-site snapshot and its persisted envelope.
//!
//! On-disk layout (JSON):
//! `{ "version": u32, "savedAt": RFC 3339, "checksum": crc32(content), "content": Snapshot }`
//!
//! The checksum covers the serialized `content` text exactly as written, so
//! a hand-edited or truncated blob is detected and treated as corrupt.

use super::section::{SectionKind, SectionValue};
use super::types::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use thiserror::Error;

/// Current snapshot layout. Bump before any field-shape change ships.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub header: HeaderContent,
    pub hero: HeroContent,
    pub highlights: HighlightsContent,
    pub features: FeaturesContent,
    pub vibe: VibeContent,
    pub testimonials: TestimonialsContent,
    pub battery: BatteryContent,
    pub footer: FooterContent,
    pub food_menu: Vec<MenuCategory>,
    pub drinks_menu: DrinksMenu,
    pub gallery: GalleryContent,
}

impl Snapshot {
    pub fn get(&self, kind: SectionKind) -> SectionValue {
        match kind {
            SectionKind::Header => SectionValue::Header(self.header.clone()),
            SectionKind::Hero => SectionValue::Hero(self.hero.clone()),
            SectionKind::Highlights => SectionValue::Highlights(self.highlights.clone()),
            SectionKind::Features => SectionValue::Features(self.features.clone()),
            SectionKind::Vibe => SectionValue::Vibe(self.vibe.clone()),
            SectionKind::Testimonials => SectionValue::Testimonials(self.testimonials.clone()),
            SectionKind::Battery => SectionValue::Battery(self.battery.clone()),
            SectionKind::Footer => SectionValue::Footer(self.footer.clone()),
            SectionKind::FoodMenu => SectionValue::FoodMenu(self.food_menu.clone()),
            SectionKind::DrinksMenu => SectionValue::DrinksMenu(self.drinks_menu.clone()),
            SectionKind::Gallery => SectionValue::Gallery(self.gallery.clone()),
        }
    }

    /// Replace one section wholesale.
    pub fn set(&mut self, value: SectionValue) {
        match value {
            SectionValue::Header(v) => self.header = v,
            SectionValue::Hero(v) => self.hero = v,
            SectionValue::Highlights(v) => self.highlights = v,
            SectionValue::Features(v) => self.features = v,
            SectionValue::Vibe(v) => self.vibe = v,
            SectionValue::Testimonials(v) => self.testimonials = v,
            SectionValue::Battery(v) => self.battery = v,
            SectionValue::Footer(v) => self.footer = v,
            SectionValue::FoodMenu(v) => self.food_menu = v,
            SectionValue::DrinksMenu(v) => self.drinks_menu = v,
            SectionValue::Gallery(v) => self.gallery = v,
        }
    }

    /// Count and total text size of inline images embedded in the snapshot.
    pub fn inline_image_stats(&self) -> (usize, usize) {
        let mut refs = vec![
            &self.header.logo_url,
            &self.hero.background_image_url,
            &self.highlights.main_image_url,
            &self.highlights.side_image_url,
            &self.features.experience.image,
            &self.vibe.image1,
            &self.vibe.image2,
            &self.vibe.big_image,
        ];
        refs.extend(self.features.grid.items.iter().map(|c| &c.image));
        refs.extend(self.testimonials.items.iter().map(|t| &t.avatar));
        refs.extend(self.drinks_menu.header_image_url.iter());
        refs.extend(self.gallery.images.iter().map(|g| &g.url));

        refs.into_iter()
            .filter(|r| r.is_inline())
            .fold((0, 0), |(count, bytes), r| (count + 1, bytes + r.stored_len()))
    }
}

/// Why a persisted blob could not be turned back into a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("checksum mismatch: stored {stored:08x}, computed {computed:08x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    #[error("unsupported snapshot version {found} (this build reads up to {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeOut<'a> {
    version: u32,
    saved_at: DateTime<Utc>,
    checksum: u32,
    content: &'a RawValue,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeIn {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
    checksum: Option<u32>,
    /// Absent for bare snapshots, which predate the envelope.
    content: Option<Box<RawValue>>,
}

/// Serialize a snapshot into its persisted envelope.
pub fn encode(snapshot: &Snapshot) -> serde_json::Result<String> {
    let content = serde_json::to_string(snapshot)?;
    let raw = RawValue::from_string(content)?;
    let envelope = EnvelopeOut {
        version: SNAPSHOT_VERSION,
        saved_at: Utc::now(),
        checksum: crc32fast::hash(raw.get().as_bytes()),
        content: &raw,
    };
    serde_json::to_string(&envelope)
}

/// Decoded snapshot plus envelope metadata.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub snapshot: Snapshot,
    pub version: u32,
    pub saved_at: Option<DateTime<Utc>>,
}

/// Parse a persisted blob.
///
/// A bare snapshot object (no envelope) is read as version 0 without a
/// checksum. Enveloped blobs newer than [`SNAPSHOT_VERSION`] are refused.
pub fn decode(blob: &str) -> Result<Decoded, SnapshotError> {
    let envelope: EnvelopeIn = serde_json::from_str(blob)?;

    let Some(content) = envelope.content else {
        return Ok(Decoded {
            snapshot: serde_json::from_str(blob)?,
            version: 0,
            saved_at: None,
        });
    };

    if envelope.version > SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: envelope.version,
            supported: SNAPSHOT_VERSION,
        });
    }

    if let Some(stored) = envelope.checksum {
        let computed = crc32fast::hash(content.get().as_bytes());
        if stored != computed {
            return Err(SnapshotError::ChecksumMismatch { stored, computed });
        }
    }

    let snapshot: Snapshot = serde_json::from_str(content.get())?;
    Ok(Decoded {
        snapshot,
        version: envelope.version,
        saved_at: envelope.saved_at,
    })
}
