//! Content records as delivered by the repository, and the resolved models
//! the pipeline hands to the rendering layer.
//!
//! Record types (`*Record`, `*Fields`) mirror the delivery API JSON and are
//! only deserialized. Model types (`SiteModel`, `PageModel`, `Section`,
//! `RenditionUrls`) are built fresh per invocation, never mutated after
//! resolution, and serialize with the camelCase keys the templates expect.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

// ============================================================================
// Asset records
// ============================================================================

/// A digital asset with its encoded renditions.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetRecord {
    #[serde(default)]
    pub id: String,
    pub fields: AssetFields,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetFields {
    /// Absent unless the item was fetched with `fields.renditions` expanded.
    #[serde(default)]
    pub renditions: Option<Vec<Rendition>>,
    pub native: NativeRendition,
    pub metadata: AssetMetadata,
}

/// A named, pre-encoded variant of an asset (`Thumbnail`, `Small`, `Large`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct Rendition {
    pub name: String,
    #[serde(default)]
    pub formats: Vec<RenditionFormat>,
}

/// One encoding of a rendition.
#[derive(Debug, Clone, Deserialize)]
pub struct RenditionFormat {
    /// Encoding type: `jpg`, `webp`, ...
    pub format: String,
    pub metadata: FormatMetadata,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FormatMetadata {
    pub width: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(default)]
    pub rel: Option<String>,
}

/// The unencoded upload.
#[derive(Debug, Clone, Deserialize)]
pub struct NativeRendition {
    #[serde(default)]
    pub links: Vec<Link>,
}

/// Intrinsic dimensions of the native upload.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AssetMetadata {
    pub width: u32,
    pub height: u32,
}

// ============================================================================
// Site and page records
// ============================================================================

/// The singleton site item: branding assets plus navigation.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub fields: SiteFields,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteFields {
    pub headerlogo: AssetRecord,
    pub footerlogo: AssetRecord,
    #[serde(default)]
    pub pages: Vec<NavPage>,
}

/// Navigation entry. Order in the site record is navigation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavPage {
    #[serde(default)]
    pub id: String,
    pub slug: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub name: String,
    pub fields: PageFields,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageFields {
    #[serde(default)]
    pub sections: Vec<SectionRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionRecord {
    #[serde(default)]
    pub id: String,
    pub fields: SectionFields,
}

/// Authored section content, passed through to the model untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Raw rich-text markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<AssetRef>,
}

/// Call-to-action button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub link: String,
}

/// Unexpanded reference to an asset item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    pub id: String,
}

// ============================================================================
// Resolved models
// ============================================================================

/// Responsive image descriptor for one asset.
///
/// `defaults` maps each lower-cased rendition name to its jpg URL and is
/// flattened into the top level on serialization, so a `Large` rendition shows
/// up as `"large": "..."` next to `srcset`. A rendition whose name matches one
/// of the fixed keys (`Native`, `Width`, ...) never shadows it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenditionUrls {
    /// `webp` candidates followed by the native upload.
    pub srcset: String,
    /// `jpg` candidates.
    pub jpg_srcset: String,
    pub native: String,
    pub width: u32,
    pub height: u32,
    #[serde(flatten)]
    pub defaults: BTreeMap<String, String>,
}

impl RenditionUrls {
    /// Top-level keys owned by the fixed fields.
    pub const FIXED_KEYS: [&'static str; 5] = ["srcset", "jpgSrcset", "native", "width", "height"];

    pub fn is_fixed_key(key: &str) -> bool {
        Self::FIXED_KEYS.contains(&key)
    }

    /// The jpg URL of a rendition, by lower-cased name.
    pub fn default_src(&self, rendition: &str) -> Option<&str> {
        self.defaults.get(rendition).map(String::as_str)
    }

    /// Image `src` for browsers that ignore both srcsets: the `large`
    /// rendition when present, otherwise the native upload.
    pub fn fallback_src(&self) -> &str {
        self.default_src("large").unwrap_or(&self.native)
    }

    /// Number of width-tagged candidates in `srcset`.
    pub fn candidate_count(&self) -> usize {
        self.srcset.split(',').filter(|c| !c.trim().is_empty()).count()
    }
}

impl Serialize for RenditionUrls {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let defaults: Vec<_> = self
            .defaults
            .iter()
            .filter(|(key, _)| !Self::is_fixed_key(key))
            .collect();

        let mut map = serializer.serialize_map(Some(Self::FIXED_KEYS.len() + defaults.len()))?;
        map.serialize_entry("srcset", &self.srcset)?;
        map.serialize_entry("jpgSrcset", &self.jpg_srcset)?;
        map.serialize_entry("native", &self.native)?;
        map.serialize_entry("width", &self.width)?;
        map.serialize_entry("height", &self.height)?;
        for (key, url) in defaults {
            map.serialize_entry(key, url)?;
        }
        map.end()
    }
}

/// Site-wide navigation and branding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteModel {
    pub id: String,
    pub name: String,
    pub pages: Vec<NavPage>,
    #[serde(rename = "headerRenditionURLs")]
    pub header_rendition_urls: RenditionUrls,
    #[serde(rename = "footerRenditionURLs")]
    pub footer_rendition_urls: RenditionUrls,
}

/// A page with its image references resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageModel {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub id: String,
    pub fields: SectionFields,
    /// Present only when the section references an image and it resolved.
    #[serde(rename = "renditionURLs", skip_serializing_if = "Option::is_none")]
    pub rendition_urls: Option<RenditionUrls>,
}

impl PageModel {
    pub fn image_count(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| s.rendition_urls.is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls() -> RenditionUrls {
        RenditionUrls {
            srcset: "/a.webp 800w,/a-native.jpg 1600w".into(),
            jpg_srcset: "/a.jpg 800w,".into(),
            native: "/a-native.jpg".into(),
            width: 1600,
            height: 900,
            defaults: BTreeMap::from([("large".to_string(), "/a.jpg".to_string())]),
        }
    }

    #[test]
    fn rendition_urls_flatten_defaults() {
        let json = serde_json::to_value(urls()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "large": "/a.jpg",
                "jpgSrcset": "/a.jpg 800w,",
                "srcset": "/a.webp 800w,/a-native.jpg 1600w",
                "native": "/a-native.jpg",
                "width": 1600,
                "height": 900,
            })
        );
    }

    #[test]
    fn rendition_named_like_fixed_key_does_not_shadow_it() {
        let mut clashing = urls();
        clashing.defaults.insert("native".into(), "/r.jpg".into());
        clashing.defaults.insert("width".into(), "/w.jpg".into());

        let text = serde_json::to_string(&clashing).unwrap();
        assert_eq!(text.matches("\"native\"").count(), 1);
        assert_eq!(text.matches("\"width\"").count(), 1);

        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["native"], "/a-native.jpg");
        assert_eq!(json["width"], 1600);
        assert_eq!(json["large"], "/a.jpg");
    }

    #[test]
    fn serialized_descriptor_reads_back() {
        let json = serde_json::to_value(urls()).unwrap();
        let back: RenditionUrls = serde_json::from_value(json).unwrap();
        assert_eq!(back, urls());
    }

    #[test]
    fn fallback_src_prefers_large() {
        assert_eq!(urls().fallback_src(), "/a.jpg");

        let mut no_large = urls();
        no_large.defaults.clear();
        assert_eq!(no_large.fallback_src(), "/a-native.jpg");
    }

    #[test]
    fn candidate_count_ignores_trailing_comma() {
        assert_eq!(urls().candidate_count(), 2);

        let mut empty = urls();
        empty.srcset.clear();
        assert_eq!(empty.candidate_count(), 0);
    }

    #[test]
    fn section_fields_keep_type_key() {
        let fields: SectionFields = serde_json::from_value(serde_json::json!({
            "heading": "Welcome",
            "type": "text-left",
            "body": "<p>Hello</p>",
            "actions": [{"name": "Go", "link": "/go"}],
        }))
        .unwrap();
        assert_eq!(fields.kind.as_deref(), Some("text-left"));
        assert_eq!(fields.actions.len(), 1);
        assert!(fields.image.is_none());

        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json["type"], "text-left");
        assert!(json.get("image").is_none());
    }

    #[test]
    fn section_without_image_omits_rendition_urls() {
        let section = Section {
            id: "s1".into(),
            fields: SectionFields::default(),
            rendition_urls: None,
        };
        let json = serde_json::to_value(&section).unwrap();
        assert!(json.get("renditionURLs").is_none());
    }
}
