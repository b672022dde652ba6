//! # Minimal Site
//!
//! The data layer of a small content-managed website: a header and footer
//! with logos, a navigable set of pages, and per-page sections (text, image,
//! call to action) sourced from a headless content repository.
//!
//! # Architecture: Content Resolution Pipeline
//!
//! ```text
//! 1. Paths    site item          →  [PathParam]            (what to pre-generate)
//! 2. Site     site item + logos  →  SiteModel              (navigation + branding)
//! 3. Page     page item + assets →  PageModel              (sections + responsive images)
//! ```
//!
//! Each stage fetches fresh data; nothing is cached between invocations. Every
//! failed request is normalized into one [`error::ContentError`] and returned
//! as a value, so the rendering layer can branch on it instead of catching.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`client`] | `ContentClient` trait and the HTTP delivery API client |
//! | [`error`] | `ContentError` normalization, `MalformedContent`, `PipelineError` |
//! | [`renditions`] | Collapses asset renditions into srcset descriptors |
//! | [`fetch`] | Item, site, and page fetchers; concurrent image resolution |
//! | [`paths`] | Enumerates the paths to pre-generate |
//! | [`props`] | Assembles site + page data for one path |
//! | [`build`] | Writes the props of every path to disk |
//! | [`render`] | Error notice, `<picture>`, and page section markup using Maud |
//! | [`config`] | `config.toml` loading, validation, and merging |
//! | [`types`] | Content records and resolved models |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Errors Are Values, Malformed Content Is Not
//!
//! Network failures, timeouts, and HTTP statuses are expected at build time.
//! They become a `ContentError` that a template can render as a notice. A
//! record that breaks the content model (a rendition with no `webp` format,
//! say) means the repository and this code disagree about the schema; that is
//! reported as [`error::MalformedContent`] and never papered over with a
//! default image.
//!
//! ## Image Lookups Fan Out on Rayon
//!
//! Each section image needs its own asset request. Requests are blocking
//! `ureq` calls issued from rayon's pool and joined before the page is
//! returned. Results carry their section index and the section list is
//! rebuilt afterwards, so no section is mutated while lookups are in flight.
//! A failed lookup leaves its section without an image; the rest of the page
//! renders normally.

pub mod build;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod output;
pub mod paths;
pub mod props;
pub mod render;
pub mod renditions;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
