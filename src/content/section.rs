//! The closed set of content sections and the typed bridge into it.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Header,
    Hero,
    Highlights,
    Features,
    Vibe,
    Testimonials,
    Battery,
    Footer,
    FoodMenu,
    DrinksMenu,
    Gallery,
}

impl SectionKind {
    pub const ALL: [SectionKind; 11] = [
        SectionKind::Header,
        SectionKind::Hero,
        SectionKind::Highlights,
        SectionKind::Features,
        SectionKind::Vibe,
        SectionKind::Testimonials,
        SectionKind::Battery,
        SectionKind::Footer,
        SectionKind::FoodMenu,
        SectionKind::DrinksMenu,
        SectionKind::Gallery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Header => "header",
            SectionKind::Hero => "hero",
            SectionKind::Highlights => "highlights",
            SectionKind::Features => "features",
            SectionKind::Vibe => "vibe",
            SectionKind::Testimonials => "testimonials",
            SectionKind::Battery => "battery",
            SectionKind::Footer => "footer",
            SectionKind::FoodMenu => "foodMenu",
            SectionKind::DrinksMenu => "drinksMenu",
            SectionKind::Gallery => "gallery",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown section: {0}")]
pub struct UnknownSection(pub String);

impl FromStr for SectionKind {
    type Err = UnknownSection;

    /// Accepts the camelCase key as well as the dashboard tab names
    /// (`food`, `drinks`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', '_'], "");
        let kind = match key.as_str() {
            "header" => SectionKind::Header,
            "hero" => SectionKind::Hero,
            "highlights" => SectionKind::Highlights,
            "features" => SectionKind::Features,
            "vibe" => SectionKind::Vibe,
            "testimonials" => SectionKind::Testimonials,
            "battery" => SectionKind::Battery,
            "footer" => SectionKind::Footer,
            "food" | "foodmenu" => SectionKind::FoodMenu,
            "drinks" | "drinksmenu" => SectionKind::DrinksMenu,
            "gallery" => SectionKind::Gallery,
            _ => return Err(UnknownSection(s.to_string())),
        };
        Ok(kind)
    }
}

/// One section's complete value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum SectionValue {
    Header(HeaderContent),
    Hero(HeroContent),
    Highlights(HighlightsContent),
    Features(FeaturesContent),
    Vibe(VibeContent),
    Testimonials(TestimonialsContent),
    Battery(BatteryContent),
    Footer(FooterContent),
    FoodMenu(Vec<MenuCategory>),
    DrinksMenu(DrinksMenu),
    Gallery(GalleryContent),
}

impl SectionValue {
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionValue::Header(_) => SectionKind::Header,
            SectionValue::Hero(_) => SectionKind::Hero,
            SectionValue::Highlights(_) => SectionKind::Highlights,
            SectionValue::Features(_) => SectionKind::Features,
            SectionValue::Vibe(_) => SectionKind::Vibe,
            SectionValue::Testimonials(_) => SectionKind::Testimonials,
            SectionValue::Battery(_) => SectionKind::Battery,
            SectionValue::Footer(_) => SectionKind::Footer,
            SectionValue::FoodMenu(_) => SectionKind::FoodMenu,
            SectionValue::DrinksMenu(_) => SectionKind::DrinksMenu,
            SectionValue::Gallery(_) => SectionKind::Gallery,
        }
    }

    /// Parse the bare section body (no `kind` tag) as the given kind.
    pub fn from_json(kind: SectionKind, body: &str) -> serde_json::Result<Self> {
        let value = match kind {
            SectionKind::Header => SectionValue::Header(serde_json::from_str(body)?),
            SectionKind::Hero => SectionValue::Hero(serde_json::from_str(body)?),
            SectionKind::Highlights => SectionValue::Highlights(serde_json::from_str(body)?),
            SectionKind::Features => SectionValue::Features(serde_json::from_str(body)?),
            SectionKind::Vibe => SectionValue::Vibe(serde_json::from_str(body)?),
            SectionKind::Testimonials => SectionValue::Testimonials(serde_json::from_str(body)?),
            SectionKind::Battery => SectionValue::Battery(serde_json::from_str(body)?),
            SectionKind::Footer => SectionValue::Footer(serde_json::from_str(body)?),
            SectionKind::FoodMenu => SectionValue::FoodMenu(serde_json::from_str(body)?),
            SectionKind::DrinksMenu => SectionValue::DrinksMenu(serde_json::from_str(body)?),
            SectionKind::Gallery => SectionValue::Gallery(serde_json::from_str(body)?),
        };
        Ok(value)
    }

    /// Serialize the bare section body.
    pub fn body_json(&self) -> serde_json::Result<String> {
        match self {
            SectionValue::Header(v) => serde_json::to_string_pretty(v),
            SectionValue::Hero(v) => serde_json::to_string_pretty(v),
            SectionValue::Highlights(v) => serde_json::to_string_pretty(v),
            SectionValue::Features(v) => serde_json::to_string_pretty(v),
            SectionValue::Vibe(v) => serde_json::to_string_pretty(v),
            SectionValue::Testimonials(v) => serde_json::to_string_pretty(v),
            SectionValue::Battery(v) => serde_json::to_string_pretty(v),
            SectionValue::Footer(v) => serde_json::to_string_pretty(v),
            SectionValue::FoodMenu(v) => serde_json::to_string_pretty(v),
            SectionValue::DrinksMenu(v) => serde_json::to_string_pretty(v),
            SectionValue::Gallery(v) => serde_json::to_string_pretty(v),
        }
    }
}

/// Typed access to a single section.
pub trait Section: Clone + Sized {
    const KIND: SectionKind;

    fn from_value(value: SectionValue) -> Option<Self>;
    fn into_value(self) -> SectionValue;
}

macro_rules! impl_section {
    ($ty:ty, $variant:ident) => {
        impl Section for $ty {
            const KIND: SectionKind = SectionKind::$variant;

            fn from_value(value: SectionValue) -> Option<Self> {
                match value {
                    SectionValue::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn into_value(self) -> SectionValue {
                SectionValue::$variant(self)
            }
        }
    };
}

impl_section!(HeaderContent, Header);
impl_section!(HeroContent, Hero);
impl_section!(HighlightsContent, Highlights);
impl_section!(FeaturesContent, Features);
impl_section!(VibeContent, Vibe);
impl_section!(TestimonialsContent, Testimonials);
impl_section!(BatteryContent, Battery);
impl_section!(FooterContent, Footer);
impl_section!(Vec<MenuCategory>, FoodMenu);
impl_section!(DrinksMenu, DrinksMenu);
impl_section!(GalleryContent, Gallery);
