//! Bounded-size rendering of a job's results into report pages.

use crate::aggregator::display_order;
use crate::layout::PageLayout;
use crate::markers::{keycap_number, text_len};
use crate::result::CheckResult;
use crate::status::JobStatus;

pub const PAUSED_BANNER: &str = "\n\n**Operation paused. Resume to continue.**";

/// Everything the paginator needs to render one snapshot of a job.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub title: &'a str,
    pub successes: &'a [CheckResult],
    pub checked: usize,
    pub total: usize,
    pub status: JobStatus,
    /// Number of domains or ranges the candidates were drawn from.
    pub source_count: usize,
}

/// Render the job into page texts. Page 0 always exists.
///
/// Every page stays within `layout.capacity()`; the safety margin absorbs the
/// paused banner and the final status label.
pub fn render_pages(input: &RenderInput<'_>, layout: &PageLayout) -> Vec<String> {
    let counts = format!(
        "Checked: {}/{} | Successful: {}",
        input.checked,
        input.total,
        input.successes.len()
    );
    let tag_by_source = input.source_count > 1;
    let capacity = layout.capacity();
    let title = bounded_title(input.title, layout);
    let heading = title.lines().next().unwrap_or_default();

    let mut pages = Vec::new();
    let mut current = page_header(&title, &counts, true);
    let mut entries = 0usize;

    for (position, result) in display_order(input.successes, layout.display_order())
        .into_iter()
        .enumerate()
    {
        let marker = match result.provenance.index() {
            Some(idx) if tag_by_source => keycap_number(idx + 1),
            _ => keycap_number(position + 1),
        };
        let block = format!("```{marker}\n{}```", result.detail_line());

        let projected = text_len(&current) + 1 + text_len(&block);
        if entries > 0 && (entries >= layout.max_entries() || projected > capacity) {
            pages.push(std::mem::replace(
                &mut current,
                page_header(heading, &counts, false),
            ));
            entries = 0;
        }

        let room = capacity.saturating_sub(text_len(&current) + 1);
        current.push('\n');
        current.push_str(&truncate_chars(&block, room));
        entries += 1;
    }
    pages.push(current);

    if input.status == JobStatus::Paused {
        if let Some(first) = pages.first_mut() {
            first.push_str(PAUSED_BANNER);
        }
    }
    pages
}

/// Page 0 carries the full title; continuation pages only its heading line.
fn page_header(title: &str, counts: &str, first: bool) -> String {
    if first {
        format!("**{title}**\n{counts}\n---")
    } else {
        format!("**Continuation {title}**\n{counts}\n---")
    }
}

/// The title as page 0 shows it: at most half the page capacity, so results
/// always have room. A source listing that does not fit is cut off with an
/// "… and N more" line.
pub fn bounded_title(title: &str, layout: &PageLayout) -> String {
    fit_title(title, layout.capacity() / 2)
}

fn fit_title(title: &str, budget: usize) -> String {
    if text_len(title) <= budget {
        return title.to_string();
    }
    let mut lines = title.lines();
    let heading = lines.next().unwrap_or_default();
    let listing: Vec<&str> = lines.collect();
    let more = |left: usize| format!("\n… and {left} more");

    let reserve = if listing.is_empty() {
        0
    } else {
        text_len(&more(listing.len()))
    };
    let mut fitted = truncate_chars(heading, budget.saturating_sub(reserve));
    for (i, line) in listing.iter().enumerate() {
        let left_after = listing.len() - i - 1;
        let reserve = if left_after > 0 {
            text_len(&more(left_after))
        } else {
            0
        };
        if text_len(&fitted) + 1 + text_len(line) + reserve > budget {
            fitted.push_str(&more(listing.len() - i));
            break;
        }
        fitted.push('\n');
        fitted.push_str(line);
    }
    fitted
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text_len(text) <= max {
        text.to_string()
    } else {
        text.chars().take(max).collect()
    }
}

/// Title listing several sources, each prefixed with its keycap marker.
pub fn source_listing_title<S: AsRef<str>>(heading: &str, sources: &[(usize, S)]) -> String {
    let mut title = heading.to_string();
    for (idx, label) in sources {
        title.push('\n');
        title.push_str(&format!("{} `{}`", keycap_number(idx + 1), label.as_ref()));
    }
    title
}
