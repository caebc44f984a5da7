use serde_json::Value;
use url::Url;

use crate::product::{Benefit, Cta, Feature, MediaItem, ProductRecord, SpecRow};

/// Adapts a raw content-store record into a [`ProductRecord`].
///
/// Strapi serves two shapes for the same content: flat attributes directly on
/// the record, or relational `data`/`attributes` wrapping around media and
/// nested entities. Both are accepted by probing for the wrapper and falling
/// back to the flat field. All optional-field defaulting lives here; nothing
/// downstream has to distinguish "absent" from "empty".
pub fn normalize(slug: &str, record: &Value, media_base: &Url) -> ProductRecord {
    let data = attributes_of(record);

    ProductRecord {
        slug: slug.to_string(),
        title: text_field(data, "title"),
        summary: rich_text(data.get("summary")),
        hero_images: media_list(data.get("heroImages"), media_base),
        features: feature_list(data.get("features"), media_base),
        specs: spec_rows(data.get("specs")),
        inclusions: inclusion_items(data.get("inclusions")),
        benefits: benefit_list(data.get("benefits")),
        gallery: media_list(data.get("gallery"), media_base),
        certification_note: optional_text(data.get("certificationNote")),
        cta: call_to_action(data),
    }
}

/// Relational records carry their fields under an `attributes` object.
fn attributes_of(value: &Value) -> &Value {
    value
        .get("attributes")
        .filter(|attrs| attrs.is_object())
        .unwrap_or(value)
}

/// Relational collections carry their entries under a `data` array.
fn list_entries(value: Option<&Value>) -> Vec<&Value> {
    let Some(value) = value else {
        return Vec::new();
    };
    match value.get("data").unwrap_or(value) {
        Value::Array(entries) => entries.iter().collect(),
        _ => Vec::new(),
    }
}

fn text_field(value: &Value, name: &str) -> String {
    value
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn optional_text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Flattens a rich-text field to plain text. Strapi rich text arrives as an
/// array of paragraph nodes whose `children` are text runs; runs concatenate
/// within a paragraph and paragraphs join with a line break. Plain strings
/// pass through untouched.
fn rich_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(blocks)) => blocks
            .iter()
            .map(paragraph_text)
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}

fn paragraph_text(block: &Value) -> String {
    block
        .get("children")
        .and_then(Value::as_array)
        .map(|runs| {
            runs.iter()
                .filter_map(|run| run.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

/// Host-relative upload paths are joined onto the content-store origin so the
/// rendered document never references an image outside the origin that served
/// it. Already-absolute URLs pass through.
fn absolutize(url: &str, base: &Url) -> String {
    if Url::parse(url).is_ok() {
        return url.to_string();
    }
    base.join(url)
        .map(String::from)
        .unwrap_or_else(|_| url.to_string())
}

fn media_item(entry: &Value, base: &Url) -> Option<MediaItem> {
    let attrs = attributes_of(entry);
    let url = attrs.get("url").and_then(Value::as_str)?;
    let alt_name = attrs
        .get("alternativeText")
        .or_else(|| attrs.get("altName"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    Some(MediaItem {
        url: absolutize(url, base),
        alt_name: alt_name.to_string(),
    })
}

fn media_list(value: Option<&Value>, base: &Url) -> Vec<MediaItem> {
    list_entries(value)
        .into_iter()
        .filter_map(|entry| media_item(entry, base))
        .collect()
}

fn single_media(value: Option<&Value>, base: &Url) -> Option<MediaItem> {
    let unwrapped = value.map(|media| media.get("data").unwrap_or(media))?;
    if unwrapped.is_null() {
        return None;
    }
    media_item(unwrapped, base)
}

fn feature_list(value: Option<&Value>, base: &Url) -> Vec<Feature> {
    list_entries(value)
        .into_iter()
        .map(attributes_of)
        .map(|entry| Feature {
            title: text_field(entry, "title"),
            description: rich_text(entry.get("description")),
            image: single_media(entry.get("image"), base),
            reverse_layout: entry
                .get("reverseLayout")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        })
        .collect()
}

fn spec_rows(value: Option<&Value>) -> Vec<SpecRow> {
    list_entries(value)
        .into_iter()
        .map(attributes_of)
        .map(|entry| SpecRow {
            label: text_field(entry, "label"),
            value: text_field(entry, "value"),
        })
        .collect()
}

fn inclusion_items(value: Option<&Value>) -> Vec<String> {
    list_entries(value)
        .into_iter()
        .map(attributes_of)
        .map(|entry| text_field(entry, "item"))
        .filter(|item| !item.is_empty())
        .collect()
}

fn benefit_list(value: Option<&Value>) -> Vec<Benefit> {
    list_entries(value)
        .into_iter()
        .map(attributes_of)
        .map(|entry| Benefit {
            title: text_field(entry, "title"),
            description: rich_text(entry.get("description")),
        })
        .collect()
}

/// The CTA arrives either as a nested component or as flat `cta*` fields on
/// the record. A CTA without a title is treated as absent.
fn call_to_action(data: &Value) -> Option<Cta> {
    let cta = match data.get("cta").filter(|block| block.is_object()) {
        Some(block) => {
            let block = attributes_of(block);
            Cta {
                title: text_field(block, "title"),
                text: rich_text(block.get("text")),
                button_label: optional_text(block.get("buttonLabel")),
                button_link: optional_text(block.get("buttonLink")),
            }
        }
        None => Cta {
            title: text_field(data, "ctaTitle"),
            text: rich_text(data.get("ctaText")),
            button_label: optional_text(data.get("ctaButtonLabel")),
            button_link: optional_text(data.get("ctaButtonLink")),
        },
    };

    if cta.title.is_empty() {
        return None;
    }
    Some(cta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Url {
        Url::parse("http://localhost:1337").unwrap()
    }

    #[test]
    fn flat_and_relational_shapes_normalize_identically() {
        let flat = json!({
            "title": "Widget A",
            "summary": "Great widget",
            "heroImages": [
                { "url": "/uploads/hero.png", "alternativeText": "Hero shot" }
            ],
            "features": [
                {
                    "title": "Fast",
                    "description": "Very fast",
                    "image": { "url": "/uploads/fast.png", "alternativeText": "Speed" },
                    "reverseLayout": true
                }
            ],
            "specs": [ { "label": "Weight", "value": "2kg" } ]
        });

        let relational = json!({
            "id": 7,
            "attributes": {
                "title": "Widget A",
                "summary": "Great widget",
                "heroImages": {
                    "data": [
                        { "id": 1, "attributes": { "url": "/uploads/hero.png", "alternativeText": "Hero shot" } }
                    ]
                },
                "features": [
                    {
                        "title": "Fast",
                        "description": "Very fast",
                        "image": { "data": { "id": 2, "attributes": { "url": "/uploads/fast.png", "alternativeText": "Speed" } } },
                        "reverseLayout": true
                    }
                ],
                "specs": [ { "label": "Weight", "value": "2kg" } ]
            }
        });

        assert_eq!(
            normalize("widget-a", &flat, &base()),
            normalize("widget-a", &relational, &base())
        );
    }

    #[test]
    fn missing_optional_fields_default_to_empty() {
        let record = normalize("bare", &json!({ "title": "Bare" }), &base());

        assert_eq!(record.title, "Bare");
        assert_eq!(record.summary, "");
        assert!(record.hero_images.is_empty());
        assert!(record.features.is_empty());
        assert!(record.specs.is_empty());
        assert!(record.inclusions.is_empty());
        assert!(record.benefits.is_empty());
        assert!(record.gallery.is_empty());
        assert_eq!(record.certification_note, None);
        assert_eq!(record.cta, None);
    }

    #[test]
    fn slug_comes_from_the_caller_not_the_payload() {
        let record = normalize(
            "requested-slug",
            &json!({ "slug": "payload-slug", "title": "X" }),
            &base(),
        );
        assert_eq!(record.slug, "requested-slug");
    }

    #[test]
    fn rich_text_paragraphs_flatten_to_joined_lines() {
        let record = normalize(
            "rich",
            &json!({
                "title": "Rich",
                "summary": [
                    { "type": "paragraph", "children": [ { "type": "text", "text": "First " }, { "type": "text", "text": "line" } ] },
                    { "type": "paragraph", "children": [ { "type": "text", "text": "Second line" } ] }
                ]
            }),
            &base(),
        );
        assert_eq!(record.summary, "First line\nSecond line");
    }

    #[test]
    fn relative_media_urls_gain_the_content_store_origin() {
        let record = normalize(
            "media",
            &json!({
                "title": "Media",
                "gallery": [
                    { "url": "/uploads/a.png" },
                    { "url": "https://cdn.example.com/b.png", "alternativeText": "Hosted" }
                ]
            }),
            &base(),
        );

        assert_eq!(record.gallery[0].url, "http://localhost:1337/uploads/a.png");
        assert_eq!(record.gallery[1].url, "https://cdn.example.com/b.png");
        assert_eq!(record.gallery[1].alt_name, "Hosted");
    }

    #[test]
    fn flat_cta_fields_build_the_cta_block() {
        let record = normalize(
            "cta",
            &json!({
                "title": "X",
                "ctaTitle": "Buy now",
                "ctaText": "Limited stock",
                "ctaButtonLabel": "Order",
                "ctaButtonLink": "https://shop.example.com/widget-a"
            }),
            &base(),
        );

        let cta = record.cta.unwrap();
        assert_eq!(cta.title, "Buy now");
        assert_eq!(cta.text, "Limited stock");
        assert_eq!(cta.button_label.as_deref(), Some("Order"));
        assert_eq!(
            cta.button_link.as_deref(),
            Some("https://shop.example.com/widget-a")
        );
    }

    #[test]
    fn cta_without_a_title_is_absent() {
        let record = normalize(
            "cta",
            &json!({ "title": "X", "cta": { "text": "orphan", "buttonLabel": "Go" } }),
            &base(),
        );
        assert_eq!(record.cta, None);
    }

    #[test]
    fn null_feature_image_stays_absent() {
        let record = normalize(
            "feat",
            &json!({
                "title": "X",
                "features": [ { "title": "Plain", "description": "No image", "image": { "data": null } } ]
            }),
            &base(),
        );
        assert_eq!(record.features[0].image, None);
        assert!(!record.features[0].reverse_layout);
    }
}
