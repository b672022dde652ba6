//! Shared test utilities: builders for delivery API JSON records.
//!
//! URLs are derived from the asset id and rendition name so assertions can
//! spell them out without a lookup table:
//!
//! ```text
//! asset "hero", rendition "Large" @ 800  →  /hero/large.jpg, /hero/large.webp
//! asset "hero", native 1600x900          →  /hero/native.jpg
//! ```

use serde_json::{Value, json};

// =========================================================================
// Assets
// =========================================================================

/// A format entry with a single `self` link.
pub fn format_json(format: &str, width: u32, href: &str) -> Value {
    json!({
        "format": format,
        "metadata": { "width": width },
        "links": [
            { "href": format!("{href}?download=true"), "rel": "download" },
            { "href": href, "rel": "self" },
        ],
    })
}

/// A rendition with jpg and webp formats at `width`.
pub fn rendition_json(asset_id: &str, name: &str, width: u32) -> Value {
    let base = format!("/{}/{}", asset_id, name.to_lowercase());
    json!({
        "name": name,
        "formats": [
            format_json("jpg", width, &format!("{base}.jpg")),
            format_json("webp", width, &format!("{base}.webp")),
        ],
    })
}

/// An expanded asset item with the given `(name, width)` renditions.
pub fn asset_json(id: &str, renditions: &[(&str, u32)], native: (u32, u32)) -> Value {
    let renditions: Vec<Value> = renditions
        .iter()
        .map(|(name, width)| rendition_json(id, name, *width))
        .collect();
    json!({
        "id": id,
        "fields": {
            "renditions": renditions,
            "native": { "links": [{ "href": format!("/{id}/native.jpg"), "rel": "self" }] },
            "metadata": { "width": native.0, "height": native.1 },
        },
    })
}

/// An asset item fetched without `fields.renditions` expanded.
pub fn bare_asset_json(id: &str, native: (u32, u32)) -> Value {
    json!({
        "id": id,
        "fields": {
            "native": { "links": [{ "href": format!("/{id}/native.jpg") }] },
            "metadata": { "width": native.0, "height": native.1 },
        },
    })
}

// =========================================================================
// Site and pages
// =========================================================================

/// The singleton site item with header/footer logos and navigation pages.
pub fn site_json(pages: &[&str]) -> Value {
    let pages: Vec<Value> = pages
        .iter()
        .enumerate()
        .map(|(i, slug)| json!({ "id": format!("page-{i}"), "slug": slug, "name": slug.to_uppercase() }))
        .collect();
    json!({
        "id": "site",
        "name": "minimalmain",
        "fields": {
            "headerlogo": asset_json("header", &[("Small", 200), ("Large", 400)], (800, 200)),
            "footerlogo": asset_json("footer", &[("Small", 100)], (400, 100)),
            "pages": pages,
        },
    })
}

/// A section, optionally referencing an image asset by id.
pub fn section_json(id: &str, image: Option<&str>) -> Value {
    let mut fields = json!({
        "heading": format!("Heading {id}"),
        "type": "text-left",
        "body": format!("<p>Body of {id}</p>"),
        "actions": [{ "name": "More", "link": format!("/{id}") }],
    });
    if let Some(asset_id) = image {
        fields["image"] = json!({ "id": asset_id });
    }
    json!({ "id": id, "fields": fields })
}

/// A page item with the given sections.
pub fn page_json(slug: &str, sections: Vec<Value>) -> Value {
    json!({
        "id": format!("id-{slug}"),
        "slug": slug,
        "name": slug.to_uppercase(),
        "fields": { "sections": sections },
    })
}
