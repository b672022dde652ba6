//! Markup for pipeline results that reach the presentation boundary.
//!
//! Three fragments live here: the error notice shown in place of a page whose
//! fetch failed, the `<picture>` element built from a [`RenditionUrls`], and
//! the section list of a page (`minimal-site page --html`). Everything else
//! about page layout belongs to the templates. Interpolation is auto-escaped
//! by Maud; section bodies are rich text from the repository and are inserted
//! as-is.

use crate::error::ContentError;
use crate::types::{PageModel, RenditionUrls};
use maud::{Markup, PreEscaped, html};

const NOT_FOUND_TEXT: &str = "Sorry, the item you are requesting has not been found.";

/// Error notice for a failed content request. A 404 gets a plain sentence;
/// anything else shows the error record.
pub fn error_notice(error: &ContentError) -> Markup {
    let detail = serde_json::to_string(error).unwrap_or_else(|_| error.to_string());
    html! {
        div.error {
            h1 { "Error !" }
            @if error.is_not_found() {
                p { (NOT_FOUND_TEXT) }
            } @else {
                p { (detail) }
            }
        }
    }
}

/// Responsive `<picture>`: webp candidates first, jpg candidates as the
/// fallback source, and an `<img>` with intrinsic dimensions.
pub fn picture(urls: &RenditionUrls, alt: &str) -> Markup {
    html! {
        picture {
            @if !urls.srcset.is_empty() {
                source type="image/webp" srcset=(urls.srcset);
            }
            @if !urls.jpg_srcset.is_empty() {
                source srcset=(urls.jpg_srcset);
            }
            img src=(urls.fallback_src()) alt=(alt) width=(urls.width) height=(urls.height);
        }
    }
}

/// Sections of a page in order. A section whose image lookup failed renders
/// without its `<picture>`.
pub fn page_sections(page: &PageModel) -> Markup {
    html! {
        @for entry in &page.sections {
            @let class = match &entry.fields.kind {
                Some(kind) => format!("section {kind}"),
                None => "section".to_string(),
            };
            section class=(class) id=(entry.id) {
                @if let Some(heading) = &entry.fields.heading {
                    h2 { (heading) }
                }
                @if let Some(urls) = &entry.rendition_urls {
                    (picture(urls, entry.fields.heading.as_deref().unwrap_or_default()))
                }
                @if let Some(body) = &entry.fields.body {
                    div.body { (PreEscaped(body)) }
                }
                @if !entry.fields.actions.is_empty() {
                    div.actions {
                        @for action in &entry.fields.actions {
                            a href=(action.link) { (action.name) }
                        }
                    }
                }
            }
        }
    }
}
