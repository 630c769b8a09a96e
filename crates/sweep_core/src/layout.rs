use crate::markers::text_len;
use crate::paginator::PAUSED_BANNER;
use crate::status::FinalLabel;

/// Hard maximum length of one message on the messaging surface.
pub const HARD_LIMIT: usize = 4096;
pub const DEFAULT_SAFETY_MARGIN: usize = 100;
/// Result blocks per page; the surface caps formatted entities per message.
pub const DEFAULT_MAX_ENTRIES: usize = 45;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayOrder {
    /// Order in which results arrived.
    Arrival,
    /// Ascending risk score; results without a score keep arrival order at the end.
    #[default]
    RiskAscending,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("safety margin {margin} must cover the {required}-character status suffix")]
    MarginTooSmall { margin: usize, required: usize },
    #[error("safety margin {margin} leaves no room within limit {limit}")]
    NoCapacity { margin: usize, limit: usize },
    #[error("pages must hold at least one entry")]
    ZeroEntries,
}

/// Size constraints for rendered report pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    hard_limit: usize,
    safety_margin: usize,
    max_entries: usize,
    display_order: DisplayOrder,
}

impl PageLayout {
    pub fn new(
        hard_limit: usize,
        safety_margin: usize,
        max_entries: usize,
        display_order: DisplayOrder,
    ) -> Result<Self, LayoutError> {
        let required = reserved_suffix_len();
        if safety_margin < required {
            return Err(LayoutError::MarginTooSmall {
                margin: safety_margin,
                required,
            });
        }
        if safety_margin >= hard_limit {
            return Err(LayoutError::NoCapacity {
                margin: safety_margin,
                limit: hard_limit,
            });
        }
        if max_entries == 0 {
            return Err(LayoutError::ZeroEntries);
        }
        Ok(Self {
            hard_limit,
            safety_margin,
            max_entries,
            display_order,
        })
    }

    pub fn hard_limit(&self) -> usize {
        self.hard_limit
    }

    pub fn safety_margin(&self) -> usize {
        self.safety_margin
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn display_order(&self) -> DisplayOrder {
        self.display_order
    }

    /// Characters available to header and result blocks on one page.
    pub fn capacity(&self) -> usize {
        self.hard_limit - self.safety_margin
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            hard_limit: HARD_LIMIT,
            safety_margin: DEFAULT_SAFETY_MARGIN,
            max_entries: DEFAULT_MAX_ENTRIES,
            display_order: DisplayOrder::default(),
        }
    }
}

/// Longest text ever appended after pagination: the paused banner or a final label.
pub fn reserved_suffix_len() -> usize {
    [
        text_len(PAUSED_BANNER),
        text_len(&FinalLabel::Completed.suffix()),
        text_len(&FinalLabel::Cancelled.suffix()),
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
}
