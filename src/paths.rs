//! Enumeration of the pages to pre-generate.
//!
//! One path per navigation entry, in navigation order, followed by the root
//! path (empty slug list). The root serves the first navigation page. Slugs
//! are not deduplicated: a site listing the same page twice generates it
//! twice.

use crate::client::ContentClient;
use crate::config::SiteConfig;
use crate::error::PipelineError;
use crate::fetch::fetch_site;
use crate::types::SiteModel;
use serde::{Deserialize, Serialize};

/// Route parameters of one generated page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathParam {
    pub slug: Vec<String>,
}

impl PathParam {
    pub fn root() -> Self {
        Self { slug: Vec::new() }
    }

    pub fn page(slug: impl Into<String>) -> Self {
        Self {
            slug: vec![slug.into()],
        }
    }

    pub fn is_root(&self) -> bool {
        self.slug.is_empty()
    }

    /// URL path, `/` for the root.
    pub fn url(&self) -> String {
        format!("/{}", self.slug.join("/"))
    }

    /// File stem used when writing the page: `index` for the root.
    ///
    /// `None` when a slug segment could not stay a single file inside the
    /// output directory (empty, `.`/`..`, or containing a path separator).
    pub fn output_name(&self) -> Option<String> {
        if self.is_root() {
            return Some("index".to_string());
        }
        match self.slug.as_slice() {
            [segment] if is_file_safe(segment) => Some(segment.clone()),
            _ => None,
        }
    }
}

fn is_file_safe(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\', '\0'])
}

/// Paths for every navigation page of `site`, then the root.
pub fn site_paths(site: &SiteModel) -> Vec<PathParam> {
    site.pages
        .iter()
        .map(|page| PathParam::page(page.slug.clone()))
        .chain(std::iter::once(PathParam::root()))
        .collect()
}

/// Fetch the site and enumerate its paths.
pub fn enumerate_paths(
    client: &impl ContentClient,
    config: &SiteConfig,
) -> Result<Vec<PathParam>, PipelineError> {
    let site = fetch_site(client, config)?;
    Ok(site_paths(&site))
}
