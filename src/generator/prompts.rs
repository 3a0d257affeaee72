//! The three background styles offered for the hero section.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Used when the hero heading is blank.
pub const FALLBACK_CONTEXT: &str = "Karaoke Club";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StyleVariant {
    Party,
    Luxury,
    Abstract,
}

impl StyleVariant {
    /// Prompt order is fixed; it is also the order branches are issued in.
    pub const ALL: [StyleVariant; 3] = [
        StyleVariant::Party,
        StyleVariant::Luxury,
        StyleVariant::Abstract,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleVariant::Party => "party",
            StyleVariant::Luxury => "luxury",
            StyleVariant::Abstract => "abstract",
        }
    }

    fn scene(&self) -> &'static str {
        match self {
            StyleVariant::Party => {
                "Photorealistic wide shot of a high-energy karaoke club scene in London."
            }
            StyleVariant::Luxury => {
                "Interior design photography of a luxury private karaoke suite."
            }
            StyleVariant::Abstract => "Abstract digital art wallpaper for a music venue.",
        }
    }

    fn mood(&self) -> &'static str {
        match self {
            StyleVariant::Party => {
                "Neon pink and blue laser lights, happy crowd, cyberpunk party atmosphere. \
                 8k resolution, cinematic lighting, 16:9 aspect ratio."
            }
            StyleVariant::Luxury => {
                "Plush velvet sofas, gold accents, dim moody lighting, champagne on table. \
                 Sophisticated, exclusive, elegant. 8k resolution, 16:9 aspect ratio."
            }
            StyleVariant::Abstract => {
                "Vibrant sound waves, musical notes, neon geometric shapes against a dark \
                 background, dynamic motion. Modern, artistic, 8k resolution, 16:9 aspect ratio."
            }
        }
    }

    /// Full prompt text with the context interpolated between scene and mood.
    pub fn prompt(&self, context: &str) -> String {
        let context = context.trim();
        let context = if context.is_empty() { FALLBACK_CONTEXT } else { context };
        format!("{} {}. {}", self.scene(), context, self.mood())
    }
}

impl fmt::Display for StyleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One prompt per style, in [`StyleVariant::ALL`] order.
pub fn build_all(context: &str) -> Vec<(StyleVariant, String)> {
    StyleVariant::ALL.iter().map(|v| (*v, v.prompt(context))).collect()
}
