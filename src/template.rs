use crate::product::{Benefit, Cta, Feature, MediaItem, ProductRecord, SpecRow};

/// Tags serialized without a closing tag.
const VOID_TAGS: &[&str] = &["img", "meta", "br", "hr", "link"];

/// Inlined stylesheet so the document stays self-contained for PDF capture.
const STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 0; padding: 20px; line-height: 1.6; color: #1a1a1a; }
h1, h2 { color: #1a1a1a; }
p { white-space: pre-line; }
img { max-width: 100%; border-radius: 8px; }
.section { margin-bottom: 40px; }
.feature-block { display: flex; gap: 20px; align-items: center; }
.feature-block.reverse { flex-direction: row-reverse; }
.feature-text { flex: 1; }
.specs table { border-collapse: collapse; width: 100%; }
.specs th, .specs td { text-align: left; padding: 6px 10px; border-bottom: 1px solid #ddd; }
.inclusions ul { list-style: none; padding: 0; }
.inclusions li { margin-bottom: 6px; }
.gallery { display: flex; flex-wrap: wrap; gap: 10px; }
.cta-button { display: inline-block; margin-top: 10px; padding: 10px 20px; background: #007acc; color: #fff; text-decoration: none; border-radius: 4px; }
";

enum Node {
    Element(Element),
    Text(String),
    /// Static-only passthrough; dynamic content cannot reach it.
    Raw(&'static str),
}

/// A single element in the document tree. Text and attribute values are
/// escaped on write, so interpolated content can never break out of its
/// node.
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Element {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    pub fn child(mut self, element: Element) -> Self {
        self.children.push(Node::Element(element));
        self
    }

    pub fn children(mut self, elements: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(elements.into_iter().map(Node::Element));
        self
    }

    pub fn text(mut self, value: impl Into<String>) -> Self {
        self.children.push(Node::Text(value.into()));
        self
    }

    pub fn raw(mut self, value: &'static str) -> Self {
        self.children.push(Node::Raw(value));
        self
    }

    fn write(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            push_escaped(out, value);
            out.push('"');
        }

        if VOID_TAGS.contains(&self.tag) {
            out.push_str(" />");
            return;
        }
        out.push('>');

        for child in &self.children {
            match child {
                Node::Element(element) => element.write(out),
                Node::Text(text) => push_escaped(out, text),
                Node::Raw(raw) => out.push_str(raw),
            }
        }

        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

fn push_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

/// Renders a product into a complete, self-contained HTML document.
///
/// Section order is fixed: header (title, summary, hero images), feature
/// blocks, specifications, inclusions, benefits, gallery, certification
/// note, call-to-action. Sections backed by empty data are omitted entirely.
pub fn render(product: &ProductRecord) -> String {
    let mut sections = vec![header_section(product)];

    sections.extend(product.features.iter().map(feature_block));
    if !product.specs.is_empty() {
        sections.push(specs_table(&product.specs));
    }
    if !product.inclusions.is_empty() {
        sections.push(inclusions_list(&product.inclusions));
    }
    if !product.benefits.is_empty() {
        sections.push(benefits_section(&product.benefits));
    }
    if !product.gallery.is_empty() {
        sections.push(gallery_section(&product.gallery));
    }
    if let Some(note) = &product.certification_note {
        sections.push(certification_section(note));
    }
    if let Some(cta) = &product.cta {
        sections.push(cta_section(cta));
    }

    let document = Element::new("html")
        .child(
            Element::new("head")
                .child(Element::new("meta").attr("charset", "utf-8"))
                .child(Element::new("title").text(&product.title))
                .child(
                    Element::new("meta")
                        .attr("name", "viewport")
                        .attr("content", "width=device-width, initial-scale=1.0"),
                )
                .child(Element::new("style").raw(STYLE)),
        )
        .child(Element::new("body").children(sections));

    let mut out = String::from("<!DOCTYPE html>");
    document.write(&mut out);
    out
}

fn media_img(image: &MediaItem) -> Element {
    Element::new("img")
        .attr("src", &image.url)
        .attr("alt", &image.alt_name)
}

fn header_section(product: &ProductRecord) -> Element {
    let mut header = Element::new("header")
        .child(Element::new("h1").text(&product.title))
        .child(Element::new("p").class("summary").text(&product.summary));
    for image in &product.hero_images {
        header = header.child(media_img(image));
    }
    header
}

fn feature_block(feature: &Feature) -> Element {
    let class = if feature.reverse_layout {
        "section feature-block reverse"
    } else {
        "section feature-block"
    };

    let mut block = Element::new("div").class(class).child(
        Element::new("div")
            .class("feature-text")
            .child(Element::new("h2").text(&feature.title))
            .child(Element::new("p").text(&feature.description)),
    );
    if let Some(image) = &feature.image {
        block = block.child(media_img(image));
    }
    block
}

fn specs_table(specs: &[SpecRow]) -> Element {
    let rows = specs.iter().map(|row| {
        Element::new("tr")
            .child(Element::new("th").text(&row.label))
            .child(Element::new("td").text(&row.value))
    });

    Element::new("div")
        .class("section specs")
        .child(Element::new("h2").text("Specifications"))
        .child(Element::new("table").children(rows))
}

fn inclusions_list(inclusions: &[String]) -> Element {
    let items = inclusions
        .iter()
        .map(|item| Element::new("li").text(item));

    Element::new("div")
        .class("section inclusions")
        .child(Element::new("h2").text("What's Included"))
        .child(Element::new("ul").children(items))
}

fn benefits_section(benefits: &[Benefit]) -> Element {
    let entries = benefits.iter().map(|benefit| {
        Element::new("p")
            .child(Element::new("strong").text(format!("{}:", benefit.title)))
            .text(format!(" {}", benefit.description))
    });

    Element::new("div")
        .class("section benefits")
        .child(Element::new("h2").text("Key Benefits"))
        .children(entries)
}

fn gallery_section(gallery: &[MediaItem]) -> Element {
    Element::new("div")
        .class("section gallery")
        .children(gallery.iter().map(media_img))
}

fn certification_section(note: &str) -> Element {
    Element::new("div")
        .class("section certification-note")
        .child(Element::new("p").child(Element::new("strong").text(note)))
}

fn cta_section(cta: &Cta) -> Element {
    let mut section = Element::new("div")
        .class("section cta")
        .child(Element::new("h2").text(&cta.title))
        .child(Element::new("p").text(&cta.text));

    // Button needs both halves; a label without a destination is dropped.
    if let (Some(label), Some(link)) = (&cta.button_label, &cta.button_link) {
        section = section.child(
            Element::new("a")
                .class("cta-button")
                .attr("href", link)
                .text(label),
        );
    }
    section
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_product() -> ProductRecord {
        ProductRecord {
            slug: "widget-a".to_string(),
            title: "Widget A".to_string(),
            summary: "Great widget".to_string(),
            ..ProductRecord::default()
        }
    }

    #[test]
    fn empty_optionals_render_only_the_header() {
        let html = render(&minimal_product());

        assert!(html.contains("<h1>Widget A</h1>"));
        assert!(html.contains("Great widget"));
        assert!(!html.contains("class=\"section"));
    }

    #[test]
    fn render_is_deterministic() {
        let product = ProductRecord {
            specs: vec![SpecRow {
                label: "Weight".to_string(),
                value: "2kg".to_string(),
            }],
            gallery: vec![MediaItem {
                url: "http://localhost:1337/uploads/a.png".to_string(),
                alt_name: "A".to_string(),
            }],
            ..minimal_product()
        };
        assert_eq!(render(&product), render(&product));
    }

    #[test]
    fn spec_rows_render_as_a_table_without_other_sections() {
        let product = ProductRecord {
            specs: vec![SpecRow {
                label: "Weight".to_string(),
                value: "2kg".to_string(),
            }],
            ..minimal_product()
        };
        let html = render(&product);

        assert!(html.contains("class=\"section specs\""));
        assert!(html.contains("<tr><th>Weight</th><td>2kg</td></tr>"));
        assert!(!html.contains("class=\"section feature-block"));
        assert!(!html.contains("class=\"section benefits\""));
        assert!(!html.contains("class=\"section gallery\""));
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let product = ProductRecord {
            title: "<script>alert('x')</script>".to_string(),
            gallery: vec![MediaItem {
                url: "http://localhost:1337/a.png?x=\"1\"&y=2".to_string(),
                alt_name: "a & b".to_string(),
            }],
            ..minimal_product()
        };
        let html = render(&product);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(html.contains("x=&quot;1&quot;&amp;y=2"));
        assert!(html.contains("alt=\"a &amp; b\""));
    }

    #[test]
    fn reverse_layout_flips_the_feature_block() {
        let feature = |reverse| Feature {
            title: "F".to_string(),
            description: "D".to_string(),
            image: None,
            reverse_layout: reverse,
        };

        let html = render(&ProductRecord {
            features: vec![feature(false)],
            ..minimal_product()
        });
        assert!(html.contains("class=\"section feature-block\""));

        let html = render(&ProductRecord {
            features: vec![feature(true)],
            ..minimal_product()
        });
        assert!(html.contains("class=\"section feature-block reverse\""));
    }

    #[test]
    fn cta_button_requires_both_label_and_link() {
        let cta = |label: Option<&str>, link: Option<&str>| ProductRecord {
            cta: Some(Cta {
                title: "Buy now".to_string(),
                text: "Limited stock".to_string(),
                button_label: label.map(str::to_string),
                button_link: link.map(str::to_string),
            }),
            ..minimal_product()
        };

        let html = render(&cta(Some("Order"), Some("https://shop.example.com")));
        assert!(html.contains("class=\"cta-button\""));
        assert!(html.contains("href=\"https://shop.example.com\""));

        let html = render(&cta(Some("Order"), None));
        assert!(html.contains("class=\"section cta\""));
        assert!(!html.contains("class=\"cta-button\""));
    }

    #[test]
    fn sections_keep_their_fixed_order() {
        let product = ProductRecord {
            specs: vec![SpecRow {
                label: "Weight".to_string(),
                value: "2kg".to_string(),
            }],
            inclusions: vec!["Charger".to_string()],
            benefits: vec![Benefit {
                title: "Durable".to_string(),
                description: "Lasts".to_string(),
            }],
            certification_note: Some("CE certified".to_string()),
            ..minimal_product()
        };
        let html = render(&product);

        let specs = html.find("section specs").unwrap();
        let inclusions = html.find("section inclusions").unwrap();
        let benefits = html.find("section benefits").unwrap();
        let note = html.find("section certification-note").unwrap();
        assert!(specs < inclusions && inclusions < benefits && benefits < note);
    }
}
