//! ipsweep core: pure job state, aggregation and report pagination.
mod address;
mod aggregator;
mod candidate;
mod countries;
mod finalize;
mod job;
mod layout;
mod markers;
mod page_cache;
mod paginator;
mod result;
mod status;

pub use address::{
    expand_range, extract_addresses, host_value, sort_for_export, validate_domain, DomainError,
    RangeError, MAX_RANGE_ADDRESSES,
};
pub use aggregator::{display_order, ResultAggregator};
pub use candidate::{normalize_address, Candidate, CandidateSet, Provenance};
pub use countries::{country_name, ALL_COUNTRIES, COUNTRIES};
pub use finalize::{
    export_chunks, export_files, finalize_pages, with_final_label, ExportFile, EXPORT_MARGIN,
    NO_RESULTS,
};
pub use job::{JobProgress, JobState};
pub use layout::{
    reserved_suffix_len, DisplayOrder, LayoutError, PageLayout, DEFAULT_MAX_ENTRIES,
    DEFAULT_SAFETY_MARGIN, HARD_LIMIT,
};
pub use markers::{keycap_number, text_len};
pub use page_cache::{PageCache, PageChange, RenderedPage};
pub use paginator::{bounded_title, render_pages, source_listing_title, RenderInput, PAUSED_BANNER};
pub use result::{meta_keys, CheckResult, MetaValue};
pub use status::{Controls, FinalLabel, JobId, JobStatus, TransitionError};
