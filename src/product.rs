use serde::{Deserialize, Serialize};

/// Normalized product view handed to the template renderer.
///
/// Built fresh per request by the normalizer; every collection defaults to
/// empty so rendering only ever has to check emptiness, never presence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub hero_images: Vec<MediaItem>,
    pub features: Vec<Feature>,
    pub specs: Vec<SpecRow>,
    pub inclusions: Vec<String>,
    pub benefits: Vec<Benefit>,
    pub gallery: Vec<MediaItem>,
    pub certification_note: Option<String>,
    pub cta: Option<Cta>,
}

/// A resolved image reference. `url` is always absolute after normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub url: String,
    pub alt_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub title: String,
    pub description: String,
    pub image: Option<MediaItem>,
    /// Authoring choice: image-left instead of text-left.
    pub reverse_layout: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Benefit {
    pub title: String,
    pub description: String,
}

/// Call-to-action block. The button is rendered only when both label and
/// link are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cta {
    pub title: String,
    pub text: String,
    pub button_label: Option<String>,
    pub button_link: Option<String>,
}
