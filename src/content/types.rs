//! Field sets for every editable section of the site.
//!
//! Field names serialize in camelCase, matching the bare snapshot objects
//! the site's browser front end saves; those decode as version 0.

use super::image::ImageRef;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HeaderContent {
    pub logo_url: ImageRef,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HeroContent {
    pub badge_text: String,
    pub heading_text: String,
    pub sub_text: String,
    pub button_text: String,
    pub background_image_url: ImageRef,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HighlightsContent {
    pub heading: String,
    pub subtext: String,
    pub main_image_url: ImageRef,
    pub side_image_url: ImageRef,
    pub feature_list_title: String,
    pub feature_list: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeaturesContent {
    pub experience: ExperienceBlock,
    pub occasions: OccasionsBlock,
    pub grid: GridBlock,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ExperienceBlock {
    pub label: String,
    pub heading: String,
    pub text: String,
    pub image: ImageRef,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OccasionsBlock {
    pub heading: String,
    pub text: String,
    pub items: Vec<OccasionCard>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OccasionCard {
    pub title: String,
    pub text: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GridBlock {
    pub heading: String,
    pub items: Vec<GridCard>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GridCard {
    pub title: String,
    pub description: String,
    pub image: ImageRef,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VibeContent {
    pub label: String,
    pub heading: String,
    pub text: String,
    pub image1: ImageRef,
    pub image2: ImageRef,
    pub bottom_heading: String,
    pub bottom_text: String,
    pub big_image: ImageRef,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TestimonialsContent {
    pub heading: String,
    pub subtext: String,
    pub items: Vec<Testimonial>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Testimonial {
    pub name: String,
    pub quote: String,
    pub avatar: ImageRef,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BatteryContent {
    pub stat_prefix: String,
    pub stat_number: String,
    pub stat_suffix: String,
    pub sub_text: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FooterContent {
    pub cta_heading: String,
    pub cta_text: String,
    pub cta_button_text: String,
}

/// Stable identity for a menu item, assigned when the item is created.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Deterministic id, used for compiled defaults.
    pub const fn fixed(seq: u128) -> Self {
        Self(Uuid::from_u128(seq))
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for ItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Older snapshots carry no ids; those items get a fresh one on load.
    #[serde(default)]
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Display price, without currency symbol.
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl MenuItem {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            description: description.into(),
            price: price.into(),
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Placeholder row the dashboard inserts for "add item".
    pub fn placeholder() -> Self {
        Self::new("New Item", "Description here", "0")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MenuCategory {
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub items: Vec<MenuItem>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DrinksMenu {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_image_url: Option<ImageRef>,
    #[serde(rename = "cocktailsData")]
    pub cocktails: Vec<MenuCategory>,
    #[serde(default)]
    pub bottles: Vec<BottleCategory>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BottleCategory {
    pub category: String,
    pub items: Vec<BottleItem>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BottleItem {
    pub name: String,
    pub prices: Vec<SizedPrice>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SizedPrice {
    pub size: String,
    pub price: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GalleryContent {
    pub heading: String,
    pub subtext: String,
    pub images: Vec<GalleryImage>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GalleryImage {
    #[serde(default)]
    pub id: ItemId,
    pub url: ImageRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}
