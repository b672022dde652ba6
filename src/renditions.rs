//! Responsive image descriptors from asset renditions.
//!
//! An asset item carries a list of named renditions, each encoded in several
//! formats. [`resolve`] collapses them into one [`RenditionUrls`]:
//!
//! ```text
//! renditions: Small  [jpg 400 /s.jpg, webp 400 /s.webp]
//!             Large  [jpg 800 /l.jpg, webp 800 /l.webp]
//! native:     /n.jpg 1600x900
//!
//! srcset:     "/s.webp 400w,/l.webp 800w,/n.jpg 1600w"
//! jpgSrcset:  "/s.jpg 400w,/l.jpg 800w,"
//! small:      "/s.jpg"
//! large:      "/l.jpg"
//! ```
//!
//! Candidates keep the order of the source renditions; nothing is sorted or
//! deduplicated. The native upload is always the last `srcset` candidate and
//! carries no trailing comma. A rendition named like a fixed field (`Native`,
//! `Width`, ...) still contributes its candidates but gets no default entry. An asset without renditions resolves to empty
//! srcsets with the native fields filled in.

use crate::error::MalformedContent;
use crate::types::{AssetRecord, Rendition, RenditionUrls};
use std::collections::BTreeMap;

const JPG: &str = "jpg";
const WEBP: &str = "webp";
const SELF_REL: &str = "self";

/// Build the responsive descriptor for an asset.
///
/// Fails when a rendition lacks a `jpg` or `webp` format, a format lacks its
/// `self` link, or the native upload has no link. Pure: the same record always
/// yields the same descriptor.
pub fn resolve(asset: &AssetRecord) -> Result<RenditionUrls, MalformedContent> {
    let mut srcset = String::new();
    let mut jpg_srcset = String::new();
    let mut defaults = BTreeMap::new();

    let renditions = asset.fields.renditions.as_deref().unwrap_or_default();
    for rendition in renditions {
        let (url, width) = format_link(asset, rendition, JPG)?;
        let key = rendition.name.to_lowercase();
        if !RenditionUrls::is_fixed_key(&key) {
            defaults.insert(key, url.to_string());
        }
        push_candidate(&mut jpg_srcset, url, width);
        jpg_srcset.push(',');

        let (url, width) = format_link(asset, rendition, WEBP)?;
        push_candidate(&mut srcset, url, width);
        srcset.push(',');
    }

    let native = asset
        .fields
        .native
        .links
        .first()
        .map(|link| link.href.clone())
        .ok_or_else(|| MalformedContent::MissingNativeLink {
            asset: asset.id.clone(),
        })?;
    let metadata = asset.fields.metadata;

    if !renditions.is_empty() {
        push_candidate(&mut srcset, &native, metadata.width);
    }

    Ok(RenditionUrls {
        srcset,
        jpg_srcset,
        native,
        width: metadata.width,
        height: metadata.height,
        defaults,
    })
}

/// `self` URL and declared width of the first `format` entry of a rendition.
fn format_link<'a>(
    asset: &AssetRecord,
    rendition: &'a Rendition,
    format: &'static str,
) -> Result<(&'a str, u32), MalformedContent> {
    let entry = rendition
        .formats
        .iter()
        .find(|f| f.format == format)
        .ok_or_else(|| MalformedContent::MissingFormat {
            asset: asset.id.clone(),
            rendition: rendition.name.clone(),
            format,
        })?;

    let link = entry
        .links
        .iter()
        .find(|l| l.rel.as_deref() == Some(SELF_REL))
        .ok_or_else(|| MalformedContent::MissingSelfLink {
            asset: asset.id.clone(),
            rendition: rendition.name.clone(),
            format,
        })?;

    Ok((link.href.as_str(), entry.metadata.width))
}

fn push_candidate(srcset: &mut String, url: &str, width: u32) {
    srcset.push_str(url);
    srcset.push(' ');
    srcset.push_str(&width.to_string());
    srcset.push('w');
}
