//! Item, site, and page fetchers.
//!
//! Every network call goes through [`fetch_item`] (or the rendition lookup,
//! which differs only in its log context and in not sending a locale), so a
//! failed request is normalized exactly once and reaches callers as
//! [`PipelineError::Content`].
//!
//! ## Page resolution
//!
//! ```text
//! fetch page ──► failed ──► Err(Content)
//!      │
//!      └─► ok ──► scan sections ──► N image lookups (par_iter) ──► all settled
//!                                                                      │
//!                                              rebuild sections by index ◄┘
//! ```
//!
//! A section whose image lookup fails with a content error is kept without
//! `renditionURLs`; its siblings are unaffected. A malformed asset record
//! fails the whole page once every lookup has settled.

use crate::client::{ContentClient, ItemLookup, ItemRequest};
use crate::config::SiteConfig;
use crate::error::{ContentError, MalformedContent, PipelineError, normalize};
use crate::renditions::resolve;
use crate::types::{
    AssetRecord, PageModel, PageRecord, RenditionUrls, Section, SiteModel, SiteRecord,
};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, warn};

/// Fields expanded on the site item.
pub const SITE_EXPAND: &str = "fields.headerlogo,fields.footerlogo,fields.pages";
/// Fields expanded on page items.
pub const PAGE_EXPAND: &str = "fields.sections";
/// Fields expanded on asset items during rendition lookups.
pub const RENDITIONS_EXPAND: &str = "fields.renditions";

const ITEM_CONTEXT: &str = "Fetching Item failed";
const RENDITION_CONTEXT: &str = "Fetching Rendition URLs failed";

/// Fetch one item in the given locale. Single attempt; failures come back
/// normalized.
pub fn fetch_item(
    client: &impl ContentClient,
    lookup: ItemLookup,
    expand: &str,
    language: &str,
) -> Result<Value, ContentError> {
    let request = ItemRequest {
        lookup,
        expand: expand.to_string(),
        language: Some(language.to_string()),
    };
    request_item(client, &request, ITEM_CONTEXT)
}

fn request_item(
    client: &impl ContentClient,
    request: &ItemRequest,
    context: &str,
) -> Result<Value, ContentError> {
    debug!("Requesting {} (expand: {})", request.lookup, request.expand);
    client
        .get_item(request)
        .map_err(|failure| normalize(context, &failure))
}

fn decode<T: DeserializeOwned>(record: &'static str, item: Value) -> Result<T, MalformedContent> {
    serde_json::from_value(item).map_err(|e| MalformedContent::Undecodable {
        record,
        reason: e.to_string(),
    })
}

/// Fetch the singleton site item and resolve its header and footer logos.
pub fn fetch_site(
    client: &impl ContentClient,
    config: &SiteConfig,
) -> Result<SiteModel, PipelineError> {
    let item = fetch_item(
        client,
        ItemLookup::Slug(config.site.slug.clone()),
        SITE_EXPAND,
        &config.server.language,
    )?;
    let record: SiteRecord = decode("site", item)?;

    let header_rendition_urls = resolve(&record.fields.headerlogo)?;
    let footer_rendition_urls = resolve(&record.fields.footerlogo)?;

    info!(
        "Fetched site {} ({} navigation pages)",
        config.site.slug,
        record.fields.pages.len()
    );

    Ok(SiteModel {
        id: record.id,
        name: record.name,
        pages: record.fields.pages,
        header_rendition_urls,
        footer_rendition_urls,
    })
}

/// Look up an asset by id with its renditions expanded and resolve it.
pub fn rendition_urls(
    client: &impl ContentClient,
    asset_id: &str,
) -> Result<RenditionUrls, PipelineError> {
    let request = ItemRequest {
        lookup: ItemLookup::Id(asset_id.to_string()),
        expand: RENDITIONS_EXPAND.to_string(),
        language: None,
    };
    let item = request_item(client, &request, RENDITION_CONTEXT)?;
    let asset: AssetRecord = decode("asset", item)?;
    Ok(resolve(&asset)?)
}

/// Fetch a page by slug and resolve every section image concurrently.
pub fn fetch_page(
    client: &impl ContentClient,
    config: &SiteConfig,
    slug: &str,
) -> Result<PageModel, PipelineError> {
    let item = fetch_item(
        client,
        ItemLookup::Slug(slug.to_string()),
        PAGE_EXPAND,
        &config.server.language,
    )?;
    let record: PageRecord = decode("page", item)?;
    let sections = record.fields.sections;

    let outcomes: Vec<(usize, Result<RenditionUrls, PipelineError>)> = sections
        .par_iter()
        .enumerate()
        .filter_map(|(index, section)| section.fields.image.as_ref().map(|image| (index, image)))
        .map(|(index, image)| (index, rendition_urls(client, &image.id)))
        .collect();

    let mut attached: Vec<Option<RenditionUrls>> = sections.iter().map(|_| None).collect();
    let mut malformed = None;
    for (index, outcome) in outcomes {
        match outcome {
            Ok(urls) => attached[index] = Some(urls),
            Err(PipelineError::Malformed(fault)) => {
                error!("Section {} of page {}: {}", sections[index].id, slug, fault);
                malformed.get_or_insert(fault);
            }
            Err(err) => {
                warn!(
                    "Section {} of page {} rendered without image: {}",
                    sections[index].id, slug, err
                );
            }
        }
    }
    if let Some(fault) = malformed {
        return Err(fault.into());
    }

    let sections: Vec<Section> = sections
        .into_iter()
        .zip(attached)
        .map(|(section, rendition_urls)| Section {
            id: section.id,
            fields: section.fields,
            rendition_urls,
        })
        .collect();

    let page = PageModel {
        id: record.id,
        slug: record.slug,
        name: record.name,
        sections,
    };
    info!(
        "Fetched page {} ({} sections, {} images)",
        slug,
        page.sections.len(),
        page.image_count()
    );
    Ok(page)
}
