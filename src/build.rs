//! Pre-generation of every page as JSON props.
//!
//! Enumerates the site paths, assembles the props of each path concurrently,
//! then writes them to the output directory:
//!
//! ```text
//! dist/
//! ├── home.json      # PageProps for /home
//! ├── about.json     # PageProps for /about
//! ├── index.json     # PageProps for / (first navigation page)
//! └── broken.html    # error notice for a path whose page fetch failed
//! ```
//!
//! A content error on one page is written as that page's error notice and the
//! build continues. A slug that cannot be a file name inside the output
//! directory (`../x`, `docs/intro`) is skipped without fetching and reported
//! as rejected. A malformed record or an unusable site aborts the build.

use crate::client::ContentClient;
use crate::config::SiteConfig;
use crate::error::PipelineError;
use crate::output::BuildEntry;
use crate::paths::enumerate_paths;
use crate::props::page_props;
use crate::render::error_notice;
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

pub fn build(
    client: &impl ContentClient,
    config: &SiteConfig,
    output_dir: &Path,
) -> Result<Vec<BuildEntry>, BuildError> {
    let paths = enumerate_paths(client, config)?;
    info!("Building {} paths into {}", paths.len(), output_dir.display());

    let results: Vec<_> = paths
        .par_iter()
        .map(|path| {
            let name = path.output_name();
            let props = name.is_some().then(|| page_props(client, config, path));
            (path, name, props)
        })
        .collect();

    fs::create_dir_all(output_dir)?;
    let mut entries = Vec::with_capacity(results.len());
    for (path, name, props) in results {
        let (Some(name), Some(result)) = (name, props) else {
            warn!("Skipping {}: slug is not a valid file name", path.url());
            entries.push(BuildEntry::Rejected {
                path: path.clone(),
                reason: format!("slug {:?} is not a valid file name", path.slug.join("/")),
            });
            continue;
        };
        match result {
            Ok(props) => {
                let file = format!("{name}.json");
                fs::write(output_dir.join(&file), serde_json::to_string_pretty(&props)?)?;
                entries.push(BuildEntry::Written {
                    path: path.clone(),
                    file,
                });
            }
            Err(PipelineError::Content(err)) => {
                let file = format!("{name}.html");
                fs::write(output_dir.join(&file), error_notice(&err).into_string())?;
                entries.push(BuildEntry::Failed {
                    path: path.clone(),
                    file,
                    reason: err.to_string(),
                });
            }
            Err(other) => return Err(other.into()),
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientFailure;
    use crate::client::tests::MockClient;
    use crate::paths::PathParam;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.server.url = "https://cms.example.com".into();
        config
    }

    #[test]
    fn writes_one_file_per_path() {
        let tmp = TempDir::new().unwrap();
        let client = MockClient::new()
            .with_slug("minimalmain", site_json(&["home", "about"]))
            .with_slug("home", page_json("home", vec![section_json("s1", Some("img"))]))
            .with_slug("about", page_json("about", vec![]))
            .with_id("img", asset_json("img", &[("Large", 800)], (1600, 900)));

        let entries = build(&client, &config(), tmp.path()).unwrap();
        assert_eq!(entries.len(), 3);
        assert!(tmp.path().join("home.json").exists());
        assert!(tmp.path().join("about.json").exists());
        assert!(tmp.path().join("index.json").exists());

        let index: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(tmp.path().join("index.json")).unwrap())
                .unwrap();
        assert_eq!(index["pageData"]["slug"], "home");
        assert_eq!(index["pages"][1]["slug"], "about");
    }

    #[test]
    fn failed_page_writes_error_notice_and_continues() {
        let tmp = TempDir::new().unwrap();
        let client = MockClient::new()
            .with_slug("minimalmain", site_json(&["home", "gone"]))
            .with_slug("home", page_json("home", vec![]))
            .failing_slug("gone", ClientFailure::status(404, "Not Found"));

        let entries = build(&client, &config(), tmp.path()).unwrap();
        assert!(matches!(
            &entries[1],
            BuildEntry::Failed { path, file, .. } if *path == PathParam::page("gone") && file == "gone.html"
        ));
        let notice = fs::read_to_string(tmp.path().join("gone.html")).unwrap();
        assert!(notice.contains("has not been found"));
        assert!(tmp.path().join("index.json").exists());
    }

    #[test]
    fn site_failure_aborts_build() {
        let tmp = TempDir::new().unwrap();
        let client =
            MockClient::new().failing_slug("minimalmain", ClientFailure::status(500, "Internal Server Error"));
        let result = build(&client, &config(), &tmp.path().join("dist"));
        assert!(matches!(
            result,
            Err(BuildError::Pipeline(PipelineError::Content(_)))
        ));
        assert!(!tmp.path().join("dist").exists());
    }

    #[test]
    fn traversal_slug_is_rejected_and_nothing_escapes() {
        let tmp = TempDir::new().unwrap();
        let dist = tmp.path().join("dist");
        let client = MockClient::new()
            .with_slug("minimalmain", site_json(&["home", "../escaped"]))
            .with_slug("home", page_json("home", vec![]))
            .with_slug("../escaped", page_json("../escaped", vec![]));

        let entries = build(&client, &config(), &dist).unwrap();
        assert_eq!(entries.len(), 3);
        assert!(matches!(
            &entries[1],
            BuildEntry::Rejected { path, .. } if *path == PathParam::page("../escaped")
        ));
        assert!(!tmp.path().join("escaped.json").exists());
        assert!(dist.join("home.json").exists());
        assert!(dist.join("index.json").exists());
    }

    #[test]
    fn nested_slug_is_rejected_without_aborting() {
        let tmp = TempDir::new().unwrap();
        let client = MockClient::new()
            .with_slug("minimalmain", site_json(&["docs/intro", "home"]))
            .with_slug("docs/intro", page_json("docs/intro", vec![]))
            .with_slug("home", page_json("home", vec![]));

        let entries = build(&client, &config(), tmp.path()).unwrap();
        assert!(matches!(&entries[0], BuildEntry::Rejected { .. }));
        assert!(matches!(&entries[1], BuildEntry::Written { file, .. } if file == "home.json"));
        assert!(matches!(&entries[2], BuildEntry::Written { file, .. } if file == "index.json"));
        assert!(!tmp.path().join("docs").exists());

        // The root still serves the first navigation page under a safe name.
        let index: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(tmp.path().join("index.json")).unwrap())
                .unwrap();
        assert_eq!(index["pageData"]["slug"], "docs/intro");
    }
}
