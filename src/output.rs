//! CLI output formatting for pipeline results.
//!
//! Output follows the same two-level pattern everywhere: a header line with a
//! positional index and the entity's identity, then indented context lines.
//!
//! ## Paths
//!
//! ```text
//! 001 /home
//! 002 /about
//! 003 / (root)
//! ```
//!
//! ## Site
//!
//! ```text
//! Site minimalmain
//!     Header logo: 800x200, 3 candidates
//!     Footer logo: 400x100, 2 candidates
//! Pages
//! 001 Home → home
//! 002 About → about
//! ```
//!
//! ## Page
//!
//! ```text
//! Page Home (home)
//! 001 Welcome [text-left]
//!     Image: 1600x900, 2 candidates
//!     Actions: Learn more → /learn
//! 002 Contact [text-right]
//! ```
//!
//! Each `format_*` function is pure and returns lines; the `print_*` wrappers
//! write them to stdout.

use crate::paths::PathParam;
use crate::types::{PageModel, RenditionUrls, SiteModel};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn image_summary(urls: &RenditionUrls) -> String {
    let count = urls.candidate_count();
    let noun = if count == 1 { "candidate" } else { "candidates" };
    format!("{}x{}, {} {}", urls.width, urls.height, count, noun)
}

// ============================================================================
// Paths
// ============================================================================

pub fn format_paths(paths: &[PathParam]) -> Vec<String> {
    paths
        .iter()
        .enumerate()
        .map(|(i, path)| {
            if path.is_root() {
                format!("{} {} (root)", format_index(i + 1), path.url())
            } else {
                format!("{} {}", format_index(i + 1), path.url())
            }
        })
        .collect()
}

pub fn print_paths(paths: &[PathParam]) {
    for line in format_paths(paths) {
        println!("{}", line);
    }
}

// ============================================================================
// Site
// ============================================================================

pub fn format_site(site: &SiteModel) -> Vec<String> {
    let mut lines = vec![format!("Site {}", site.name)];
    lines.push(format!(
        "{}Header logo: {}",
        indent(1),
        image_summary(&site.header_rendition_urls)
    ));
    lines.push(format!(
        "{}Footer logo: {}",
        indent(1),
        image_summary(&site.footer_rendition_urls)
    ));

    lines.push("Pages".to_string());
    for (i, page) in site.pages.iter().enumerate() {
        lines.push(format!("{} {} → {}", format_index(i + 1), page.name, page.slug));
    }
    lines
}

pub fn print_site(site: &SiteModel) {
    for line in format_site(site) {
        println!("{}", line);
    }
}

// ============================================================================
// Page
// ============================================================================

pub fn format_page(page: &PageModel) -> Vec<String> {
    let mut lines = vec![format!("Page {} ({})", page.name, page.slug)];

    for (i, section) in page.sections.iter().enumerate() {
        let heading = section.fields.heading.as_deref().unwrap_or(&section.id);
        match &section.fields.kind {
            Some(kind) => lines.push(format!("{} {} [{}]", format_index(i + 1), heading, kind)),
            None => lines.push(format!("{} {}", format_index(i + 1), heading)),
        }

        match (&section.rendition_urls, &section.fields.image) {
            (Some(urls), _) => {
                lines.push(format!("{}Image: {}", indent(1), image_summary(urls)));
            }
            (None, Some(image)) => {
                lines.push(format!("{}Image: {} unavailable", indent(1), image.id));
            }
            (None, None) => {}
        }

        if !section.fields.actions.is_empty() {
            let actions: Vec<String> = section
                .fields
                .actions
                .iter()
                .map(|a| format!("{} → {}", a.name, a.link))
                .collect();
            lines.push(format!("{}Actions: {}", indent(1), actions.join(", ")));
        }
    }
    lines
}

pub fn print_page(page: &PageModel) {
    for line in format_page(page) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Result of writing one path during `build`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEntry {
    /// Page data written to `file`.
    Written { path: PathParam, file: String },
    /// The page fetch failed; the error notice was written to `file`.
    Failed {
        path: PathParam,
        file: String,
        reason: String,
    },
    /// The slug cannot name a file inside the output directory; nothing was
    /// fetched or written.
    Rejected { path: PathParam, reason: String },
}

pub fn format_build_output(entries: &[BuildEntry]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut failed = 0;

    for (i, entry) in entries.iter().enumerate() {
        match entry {
            BuildEntry::Written { path, file } => {
                lines.push(format!("{} {} → {}", format_index(i + 1), path.url(), file));
            }
            BuildEntry::Failed { path, file, reason } => {
                failed += 1;
                lines.push(format!("{} {} → {}", format_index(i + 1), path.url(), file));
                lines.push(format!("{}Error: {}", indent(1), reason));
            }
            BuildEntry::Rejected { path, reason } => {
                failed += 1;
                lines.push(format!("{} {} (skipped)", format_index(i + 1), path.url()));
                lines.push(format!("{}Error: {}", indent(1), reason));
            }
        }
    }

    let written = entries.len() - failed;
    lines.push(String::new());
    if failed == 0 {
        lines.push(format!("Generated {} pages", written));
    } else {
        lines.push(format!(
            "Generated {} pages, {} failed",
            written, failed
        ));
    }
    lines
}

pub fn print_build_output(entries: &[BuildEntry]) {
    for line in format_build_output(entries) {
        println!("{}", line);
    }
}
