use indexmap::IndexMap;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::samples::{preview_filename, slugify};
use crate::types::{PreviewIndex, RunStatus};

/// Markdown report filename.
pub const MARKDOWN_REPORT: &str = "previews.md";
/// HTML report filename.
pub const HTML_REPORT: &str = "previews.html";
/// JSON index filename.
pub const INDEX_REPORT: &str = "previews.json";

/// Cell content for a failed (style, prompt) pair.
pub const FAILURE_GLYPH: &str = "❌";

const STYLESHEET: &str = "td { vertical-align: middle; }\ntd { min-width: 128px; }";

/// Render the Markdown table: one column per prompt label, one row per
/// style, in the order styles were encountered during the run. Success
/// cells embed a repository-relative image reference, failures the glyph.
/// Every pair gets a cell.
pub fn render_markdown(status: &RunStatus, labels: &[&str]) -> String {
    let mut out = String::from("# Style Previews\n\n| style ");
    for label in labels {
        out.push_str(&format!("| {} ", label));
    }
    out.push_str("|\n");
    for _ in 0..labels.len() + 1 {
        out.push_str("| --- ");
    }
    out.push_str("|\n");

    for (style_name, prompt_status) in status {
        let slug = slugify(style_name);
        out.push_str(&format!("| {} ", style_name));
        for label in labels {
            if prompt_status.get(*label).copied().unwrap_or(false) {
                out.push_str(&format!(
                    "| ![{} {} preview](/images/{}?raw=true) ",
                    style_name,
                    label,
                    preview_filename(&slug, label)
                ));
            } else {
                out.push_str(&format!("| {} ", FAILURE_GLYPH));
            }
        }
        out.push_str("|\n");
    }
    out
}

/// Render the HTML table with its embedded minimal stylesheet. Same shape
/// as the Markdown table, but image cells use absolute CDN URLs.
pub fn render_html(status: &RunStatus, labels: &[&str], cdn_prefix: &str) -> String {
    let mut out = format!(
        "<style>\n{}\n</style>\n<h1>Style Previews</h1>\n<table>\n  <thead><tr>\n    <td>style</td>",
        STYLESHEET
    );
    for label in labels {
        out.push_str(&format!("\n    <td>{}</td>", label));
    }
    out.push_str("\n  </tr></thead>\n  <tbody>");

    for (style_name, prompt_status) in status {
        let slug = slugify(style_name);
        out.push_str(&format!("\n    <tr>\n      <td>{}</td>", style_name));
        for label in labels {
            if prompt_status.get(*label).copied().unwrap_or(false) {
                out.push_str(&format!(
                    "\n      <td><img src=\"{}/{}\" alt=\"{}\"></td>",
                    cdn_prefix,
                    preview_filename(&slug, label),
                    style_name
                ));
            } else {
                out.push_str(&format!("\n      <td>{}</td>", FAILURE_GLYPH));
            }
        }
        out.push_str("\n    </tr>");
    }
    out.push_str("\n  </tbody>\n</table>");
    out
}

/// Build the sparse style → label → URL index. A pair appears iff the run
/// marked it successful; failed pairs are omitted entirely.
pub fn build_index(status: &RunStatus, cdn_prefix: &str) -> PreviewIndex {
    let mut index = PreviewIndex::new();
    for (style_name, prompt_status) in status {
        let slug = slugify(style_name);
        let mut entries = IndexMap::new();
        for (label, ok) in prompt_status {
            if *ok {
                entries.insert(
                    label.clone(),
                    format!("{}/{}", cdn_prefix, preview_filename(&slug, label)),
                );
            }
        }
        index.insert(style_name.clone(), entries);
    }
    index
}

/// Write all three artifacts into `out_dir`, fully replacing previous runs.
pub fn write_reports(
    status: &RunStatus,
    labels: &[&str],
    cdn_prefix: &str,
    out_dir: impl AsRef<Path>,
) -> Result<()> {
    let out_dir = out_dir.as_ref();
    fs::write(out_dir.join(MARKDOWN_REPORT), render_markdown(status, labels))?;
    fs::write(
        out_dir.join(HTML_REPORT),
        render_html(status, labels, cdn_prefix),
    )?;
    let index = build_index(status, cdn_prefix);
    fs::write(
        out_dir.join(INDEX_REPORT),
        serde_json::to_string_pretty(&index)?,
    )?;
    Ok(())
}
