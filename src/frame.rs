//! # Frame Catalog
//!
//! Named decorative frame treatments. A [`FrameCatalog`] maps a frame id to
//! its [`FrameSpec`] and always carries a zero-border fallback, so resolving
//! an id never fails.
//!
//! Catalogs are plain values: build one of the built-ins, load one from JSON,
//! and share it behind an `Arc`. Several catalogs can coexist.
//!
//! | id | border | radius | accent | decoration |
//! |----|--------|--------|--------|------------|
//! | celebration | 60 | 20 | `#FF1493` | stars + hearts |
//! | tropical | 70 | 15 | `#00BFFF` | waves + stars |
//! | rainbow | 65 | 25 | `#FF6B35` | rainbow bars |
//! | party | 75 | 10 | `#8A2BE2` | confetti + stars |
//! | festive | 55 | 30 | `#FF4500` | hearts + confetti |
//!
//! ## Usage
//!
//! ```
//! use marco::frame::FrameCatalog;
//!
//! let catalog = FrameCatalog::festive();
//! assert_eq!(catalog.resolve("party").border_width, 75);
//! assert_eq!(catalog.resolve("nope"), catalog.resolve("none"));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::canvas::Rgba;
use crate::error::MarcoError;

/// Id of the fallback "no frame" entry.
pub const NONE: &str = "none";

/// Widest border a catalog file may declare.
pub const MAX_BORDER_WIDTH: u32 = 1000;

/// Which decorative sequence a frame draws behind the photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Decoration {
    Celebration,
    Tropical,
    Rainbow,
    Party,
    Festive,
    /// Gradient and inset border only.
    #[default]
    Plain,
}

/// Geometric and visual parameters of one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSpec {
    /// Border thickness in pixels on every side.
    pub border_width: u32,
    /// Drop-shadow description for the displaying client (CSS syntax).
    #[serde(default = "default_shadow")]
    pub shadow: String,
    /// Corner radius hint for the displaying client.
    #[serde(default)]
    pub corner_radius: u32,
    /// Accent color used by the gradient, control border and watermark.
    pub accent: Rgba,
    #[serde(default)]
    pub decoration: Decoration,
}

fn default_shadow() -> String {
    "none".to_string()
}

impl FrameSpec {
    /// The "no frame" spec: no border, no shadow.
    pub fn none() -> Self {
        Self {
            border_width: 0,
            shadow: default_shadow(),
            corner_radius: 0,
            accent: Rgba::WHITE,
            decoration: Decoration::Plain,
        }
    }

    fn new(border_width: u32, shadow: &str, corner_radius: u32, accent: Rgba, decoration: Decoration) -> Self {
        Self {
            border_width,
            shadow: shadow.to_string(),
            corner_radius,
            accent,
            decoration,
        }
    }
}

/// Registry of frames keyed by id.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameCatalog {
    frames: BTreeMap<String, FrameSpec>,
    /// Display order (registration order, `none` first).
    order: Vec<String>,
    fallback: FrameSpec,
}

impl Default for FrameCatalog {
    fn default() -> Self {
        Self::empty()
    }
}

impl FrameCatalog {
    /// A catalog holding only the fallback entry.
    pub fn empty() -> Self {
        let fallback = FrameSpec::none();
        let mut frames = BTreeMap::new();
        frames.insert(NONE.to_string(), fallback.clone());
        Self {
            frames,
            order: vec![NONE.to_string()],
            fallback,
        }
    }

    /// The party-themed catalog: celebration, tropical, rainbow, party, festive.
    pub fn festive() -> Self {
        Self::empty()
            .with_frame(
                "celebration",
                FrameSpec::new(60, "0 12px 40px rgba(255,20,147,0.4)", 20, Rgba::rgb(0xFF, 0x14, 0x93), Decoration::Celebration),
            )
            .with_frame(
                "tropical",
                FrameSpec::new(70, "0 15px 45px rgba(0,191,255,0.3)", 15, Rgba::rgb(0x00, 0xBF, 0xFF), Decoration::Tropical),
            )
            .with_frame(
                "rainbow",
                FrameSpec::new(65, "0 10px 35px rgba(255,165,0,0.4)", 25, Rgba::rgb(0xFF, 0x6B, 0x35), Decoration::Rainbow),
            )
            .with_frame(
                "party",
                FrameSpec::new(75, "0 20px 50px rgba(138,43,226,0.5)", 10, Rgba::rgb(0x8A, 0x2B, 0xE2), Decoration::Party),
            )
            .with_frame(
                "festive",
                FrameSpec::new(55, "0 8px 30px rgba(255,69,0,0.4)", 30, Rgba::rgb(0xFF, 0x45, 0x00), Decoration::Festive),
            )
    }

    /// The understated catalog: classic, modern, vintage, elegant, gold.
    /// These frames carry no procedural decorations.
    pub fn classic() -> Self {
        Self::empty()
            .with_frame(
                "classic",
                FrameSpec::new(40, "0 8px 24px rgba(0,0,0,0.3)", 4, Rgba::rgb(0x8B, 0x45, 0x13), Decoration::Plain),
            )
            .with_frame(
                "modern",
                FrameSpec::new(30, "0 4px 16px rgba(0,0,0,0.2)", 0, Rgba::rgb(0x2F, 0x4F, 0x4F), Decoration::Plain),
            )
            .with_frame(
                "vintage",
                FrameSpec::new(50, "0 10px 30px rgba(112,66,20,0.4)", 8, Rgba::rgb(0xD2, 0xB4, 0x8C), Decoration::Plain),
            )
            .with_frame(
                "elegant",
                FrameSpec::new(45, "0 12px 36px rgba(0,0,0,0.35)", 12, Rgba::rgb(0x4B, 0x00, 0x82), Decoration::Plain),
            )
            .with_frame(
                "gold",
                FrameSpec::new(55, "0 10px 35px rgba(218,165,32,0.45)", 16, Rgba::rgb(0xDA, 0xA5, 0x20), Decoration::Plain),
            )
    }

    /// Register (or replace) a frame. `none` cannot be replaced.
    pub fn with_frame(mut self, id: &str, spec: FrameSpec) -> Self {
        let id = id.trim().to_lowercase();
        if id == NONE {
            return self;
        }
        if self.frames.insert(id.clone(), spec).is_none() {
            self.order.push(id);
        }
        self
    }

    /// Parse a catalog from a JSON object of `id -> spec`.
    ///
    /// ```
    /// use marco::frame::FrameCatalog;
    ///
    /// let catalog = FrameCatalog::from_json(
    ///     r##"{ "gold": { "border_width": 40, "accent": "#DAA520" } }"##,
    /// ).unwrap();
    /// assert_eq!(catalog.ids(), vec!["none", "gold"]);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, MarcoError> {
        // serde_json keeps object order only with preserve_order, so sort by id
        let entries: BTreeMap<String, FrameSpec> = serde_json::from_str(json)
            .map_err(|e| MarcoError::Config(format!("Invalid frame catalog: {}", e)))?;
        if let Some((id, spec)) = entries.iter().find(|(_, spec)| spec.border_width > MAX_BORDER_WIDTH) {
            return Err(MarcoError::Config(format!(
                "Frame '{}': border_width {} exceeds {}",
                id, spec.border_width, MAX_BORDER_WIDTH
            )));
        }
        Ok(entries
            .into_iter()
            .fold(Self::empty(), |catalog, (id, spec)| catalog.with_frame(&id, spec)))
    }

    /// Look up a frame; unknown ids and `none` resolve to the fallback.
    pub fn resolve(&self, id: &str) -> &FrameSpec {
        self.get(id).unwrap_or(&self.fallback)
    }

    /// Look up a registered frame.
    pub fn get(&self, id: &str) -> Option<&FrameSpec> {
        self.frames.get(&id.trim().to_lowercase())
    }

    /// Whether `id` names a registered frame other than `none`.
    pub fn is_framed(&self, id: &str) -> bool {
        let id = id.trim().to_lowercase();
        id != NONE && self.frames.contains_key(&id)
    }

    /// All ids in display order, `none` first.
    pub fn ids(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Iterate `(id, spec)` in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FrameSpec)> {
        self.order
            .iter()
            .filter_map(|id| self.frames.get(id).map(|spec| (id.as_str(), spec)))
    }

    pub fn fallback(&self) -> &FrameSpec {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unknown_resolves_to_none() {
        let catalog = FrameCatalog::festive();
        assert_eq!(catalog.resolve("nonexistent"), catalog.resolve("none"));
        assert_eq!(catalog.resolve("none").border_width, 0);
        assert_eq!(catalog.resolve("none").shadow, "none");
    }

    #[test]
    fn test_festive_values() {
        let catalog = FrameCatalog::festive();
        assert_eq!(
            catalog.ids(),
            vec!["none", "celebration", "tropical", "rainbow", "party", "festive"]
        );
        let borders: Vec<u32> = catalog.iter().map(|(_, s)| s.border_width).collect();
        assert_eq!(borders, vec![0, 60, 70, 65, 75, 55]);
        assert_eq!(catalog.resolve("tropical").accent, Rgba::rgb(0, 191, 255));
        assert_eq!(catalog.resolve("rainbow").decoration, Decoration::Rainbow);
    }

    #[test]
    fn test_classic_ids() {
        let catalog = FrameCatalog::classic();
        assert_eq!(
            catalog.ids(),
            vec!["none", "classic", "modern", "vintage", "elegant", "gold"]
        );
        assert!(catalog.iter().all(|(_, s)| s.decoration == Decoration::Plain));
        // The other catalog's ids are unknown here
        assert_eq!(catalog.resolve("party"), catalog.fallback());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = FrameCatalog::festive();
        assert_eq!(catalog.resolve("PARTY").border_width, 75);
        assert!(catalog.is_framed(" Party "));
        assert!(!catalog.is_framed("none"));
        assert!(!catalog.is_framed("bogus"));
    }

    #[test]
    fn test_none_cannot_be_replaced() {
        let catalog = FrameCatalog::empty().with_frame(
            "none",
            FrameSpec {
                border_width: 99,
                ..FrameSpec::none()
            },
        );
        assert_eq!(catalog.resolve("none").border_width, 0);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_from_json() {
        let json = r##"{
            "sunset": {
                "border_width": 48,
                "shadow": "0 6px 20px rgba(0,0,0,0.3)",
                "corner_radius": 12,
                "accent": "#FF7F50",
                "decoration": "festive"
            },
            "mono": { "border_width": 10, "accent": "#000000" }
        }"##;
        let catalog = FrameCatalog::from_json(json).unwrap();
        assert_eq!(catalog.ids(), vec!["none", "mono", "sunset"]);
        let sunset = catalog.resolve("sunset");
        assert_eq!(sunset.border_width, 48);
        assert_eq!(sunset.accent, Rgba::rgb(0xFF, 0x7F, 0x50));
        assert_eq!(sunset.decoration, Decoration::Festive);
        let mono = catalog.resolve("mono");
        assert_eq!(mono.shadow, "none");
        assert_eq!(mono.decoration, Decoration::Plain);
    }

    #[test]
    fn test_from_json_rejects_bad_specs() {
        let err = FrameCatalog::from_json(r#"{ "x": { "border_width": 1, "accent": "pink" } }"#).unwrap_err();
        assert!(matches!(err, MarcoError::Config(_)));

        let err = FrameCatalog::from_json(r##"{ "wide": { "border_width": 4000000000, "accent": "#000000" } }"##)
            .unwrap_err();
        assert!(matches!(err, MarcoError::Config(ref m) if m.contains("wide")));
    }
}
