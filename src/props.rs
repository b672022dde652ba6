//! Assembly of everything one generated page needs.
//!
//! For each path the site is fetched fresh, the path is mapped to a page slug
//! (the root maps to the first navigation page) and the page is fetched.
//! Paths outside the site map are rejected rather than rendered on demand.

use crate::client::ContentClient;
use crate::config::SiteConfig;
use crate::error::PipelineError;
use crate::fetch::{fetch_page, fetch_site};
use crate::paths::PathParam;
use crate::types::{NavPage, PageModel, RenditionUrls, SiteModel};
use serde::Serialize;

/// Data handed to the templates for one page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageProps {
    #[serde(rename = "headerRenditionURLs")]
    pub header_rendition_urls: RenditionUrls,
    #[serde(rename = "footerRenditionURLs")]
    pub footer_rendition_urls: RenditionUrls,
    pub pages: Vec<NavPage>,
    pub page_data: PageModel,
}

/// Map a path to the slug of the page it serves.
pub fn resolve_slug<'a>(site: &'a SiteModel, path: &'a PathParam) -> Result<&'a str, PipelineError> {
    match path.slug.as_slice() {
        [] => site
            .pages
            .first()
            .map(|page| page.slug.as_str())
            .ok_or(PipelineError::EmptySite),
        [slug] if site.pages.iter().any(|page| &page.slug == slug) => Ok(slug.as_str()),
        _ => Err(PipelineError::UnknownPath(path.slug.join("/"))),
    }
}

/// Fetch the site and page for `path` and bundle them.
pub fn page_props(
    client: &impl ContentClient,
    config: &SiteConfig,
    path: &PathParam,
) -> Result<PageProps, PipelineError> {
    let site = fetch_site(client, config)?;
    let slug = resolve_slug(&site, path)?;
    let page_data = fetch_page(client, config, slug)?;

    Ok(PageProps {
        header_rendition_urls: site.header_rendition_urls,
        footer_rendition_urls: site.footer_rendition_urls,
        pages: site.pages,
        page_data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::MockClient;
    use crate::test_helpers::*;

    fn config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.server.url = "https://cms.example.com".into();
        config
    }

    fn client() -> MockClient {
        MockClient::new()
            .with_slug("minimalmain", site_json(&["home", "about"]))
            .with_slug(
                "home",
                page_json("home", vec![section_json("hero", Some("hero-img"))]),
            )
            .with_slug("about", page_json("about", vec![section_json("text", None)]))
            .with_id("hero-img", asset_json("hero-img", &[("Large", 800)], (1600, 900)))
    }

    #[test]
    fn root_path_serves_first_page() {
        let props = page_props(&client(), &config(), &PathParam::root()).unwrap();
        assert_eq!(props.page_data.slug, "home");
        assert_eq!(props.pages.len(), 2);
        assert_eq!(props.page_data.image_count(), 1);
    }

    #[test]
    fn slug_path_serves_that_page() {
        let props = page_props(&client(), &config(), &PathParam::page("about")).unwrap();
        assert_eq!(props.page_data.slug, "about");
        assert_eq!(props.page_data.image_count(), 0);
    }

    #[test]
    fn unknown_path_is_rejected_without_fetching_page() {
        let client = client();
        let err = page_props(&client, &config(), &PathParam::page("nowhere")).unwrap_err();
        assert!(matches!(err, PipelineError::UnknownPath(ref p) if p == "nowhere"));
        assert_eq!(client.get_requests().len(), 1);
    }

    #[test]
    fn nested_path_is_rejected() {
        let client = client();
        let path = PathParam {
            slug: vec!["home".into(), "deeper".into()],
        };
        assert!(matches!(
            page_props(&client, &config(), &path),
            Err(PipelineError::UnknownPath(_))
        ));
    }

    #[test]
    fn root_of_empty_site_is_error() {
        let client = MockClient::new().with_slug("minimalmain", site_json(&[]));
        assert!(matches!(
            page_props(&client, &config(), &PathParam::root()),
            Err(PipelineError::EmptySite)
        ));
    }

    #[test]
    fn props_serialize_with_template_keys() {
        let props = page_props(&client(), &config(), &PathParam::root()).unwrap();
        let json = serde_json::to_value(&props).unwrap();
        assert!(json.get("headerRenditionURLs").is_some());
        assert!(json.get("footerRenditionURLs").is_some());
        assert_eq!(json["pageData"]["slug"], "home");
        assert_eq!(
            json["pageData"]["sections"][0]["renditionURLs"]["large"],
            "/hero-img/large.jpg"
        );
    }
}
