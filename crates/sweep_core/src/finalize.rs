//! Terminal page texts and the bulk address export.

use crate::markers::text_len;
use crate::status::{FinalLabel, JobId};

pub const NO_RESULTS: &str = "No successful results found.";

/// Reserved room between an export chunk and the hard limit.
pub const EXPORT_MARGIN: usize = 200;
const EXPORT_FIRST_HEADER: &str = "To copy all addresses, tap the code block below:\n```\n";
const EXPORT_CONTINUATION_HEADER: &str = "Continuation of addresses\n\n```\n";
const EXPORT_FOOTER: &str = "\n```";

/// Produce the final page texts from a terminal render.
///
/// With zero successes the first page collapses to a "no results" body. The
/// label lands on the last page exactly once.
pub fn finalize_pages(
    mut pages: Vec<String>,
    title: &str,
    has_successes: bool,
    label: FinalLabel,
) -> Vec<String> {
    if pages.is_empty() {
        pages.push(String::new());
    }
    if !has_successes {
        pages[0] = format!("**{title}**\n{NO_RESULTS}");
    }
    if let Some(last) = pages.last_mut() {
        *last = with_final_label(last, label);
    }
    pages
}

/// Append the label suffix unless the text already ends with it.
pub fn with_final_label(text: &str, label: FinalLabel) -> String {
    let suffix = label.suffix();
    if text.ends_with(&suffix) {
        text.to_string()
    } else {
        format!("{text}{suffix}")
    }
}

/// Pack addresses greedily into copyable code-block messages, each strictly
/// below `hard_limit - EXPORT_MARGIN` characters.
pub fn export_chunks(addresses: &[String], hard_limit: usize) -> Vec<String> {
    let budget = hard_limit.saturating_sub(EXPORT_MARGIN);
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut body_len = 0usize;

    for address in addresses {
        let header = header_for(chunks.is_empty());
        let joined = if current.is_empty() {
            text_len(address)
        } else {
            body_len + 1 + text_len(address)
        };
        let projected = text_len(header) + joined + text_len(EXPORT_FOOTER);
        if projected > budget && !current.is_empty() {
            chunks.push(wrap_chunk(header, &current));
            current = vec![address.as_str()];
            body_len = text_len(address);
        } else {
            current.push(address.as_str());
            body_len = joined;
        }
    }
    if !current.is_empty() {
        chunks.push(wrap_chunk(header_for(chunks.is_empty()), &current));
    }
    chunks
}

fn header_for(first: bool) -> &'static str {
    if first {
        EXPORT_FIRST_HEADER
    } else {
        EXPORT_CONTINUATION_HEADER
    }
}

fn wrap_chunk(header: &str, addresses: &[&str]) -> String {
    format!("{header}{}{EXPORT_FOOTER}", addresses.join("\n"))
}

/// One file-style export attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub body: String,
}

/// Plain-text and delimited exports of the full list; same lines in both.
pub fn export_files(job: JobId, addresses: &[String]) -> Vec<ExportFile> {
    let stem = format!("successful_{}", job.short());
    let body = addresses.join("\n");
    vec![
        ExportFile {
            filename: format!("{stem}.txt"),
            body: body.clone(),
        },
        ExportFile {
            filename: format!("{stem}.csv"),
            body,
        },
    ]
}
