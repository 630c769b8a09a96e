//! Per-page record of what was last delivered to the messaging surface.
//!
//! Every render is diffed against these records before anything is sent, so
//! unchanged pages never produce an edit.

use sha2::{Digest, Sha256};

use crate::status::Controls;

/// A page that exists on the messaging surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage<H> {
    pub index: usize,
    pub last_text: String,
    pub controls: Controls,
    pub handle: H,
    digest: [u8; 32],
}

/// What has to happen for the surface to show a freshly rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageChange {
    Create {
        index: usize,
        text: String,
        controls: Controls,
    },
    Edit {
        index: usize,
        text: String,
        controls: Controls,
    },
    /// Text is current; only the interactive controls have to go.
    ClearControls { index: usize },
}

#[derive(Debug, Clone)]
pub struct PageCache<H> {
    pages: Vec<RenderedPage<H>>,
}

impl<H> Default for PageCache<H> {
    fn default() -> Self {
        Self { pages: Vec::new() }
    }
}

impl<H> PageCache<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn pages(&self) -> &[RenderedPage<H>] {
        &self.pages
    }

    pub fn handle(&self, index: usize) -> Option<&H> {
        self.pages.get(index).map(|page| &page.handle)
    }

    pub fn last_texts(&self) -> Vec<String> {
        self.pages.iter().map(|page| page.last_text.clone()).collect()
    }

    /// Diff rendered texts against the cache. Only page 0 carries controls.
    pub fn plan(&self, rendered: &[String], first_page_controls: Controls) -> Vec<PageChange> {
        let mut changes = Vec::new();
        for (index, text) in rendered.iter().enumerate() {
            let controls = if index == 0 {
                first_page_controls
            } else {
                Controls::None
            };
            let Some(page) = self.pages.get(index) else {
                changes.push(PageChange::Create {
                    index,
                    text: text.clone(),
                    controls,
                });
                continue;
            };
            if page.digest == digest(text, controls) {
                continue;
            }
            if page.last_text == *text && controls == Controls::None {
                changes.push(PageChange::ClearControls { index });
            } else {
                changes.push(PageChange::Edit {
                    index,
                    text: text.clone(),
                    controls,
                });
            }
        }
        changes
    }

    /// Record a newly created page. Pages are only ever appended in order.
    pub fn record_created(&mut self, handle: H, text: &str, controls: Controls) -> usize {
        let index = self.pages.len();
        self.pages.push(RenderedPage {
            index,
            last_text: text.to_string(),
            controls,
            handle,
            digest: digest(text, controls),
        });
        index
    }

    /// Record a successful in-place update of an existing page.
    pub fn record_updated(&mut self, index: usize, text: &str, controls: Controls) {
        if let Some(page) = self.pages.get_mut(index) {
            page.last_text = text.to_string();
            page.controls = controls;
            page.digest = digest(text, controls);
        }
    }
}

fn digest(text: &str, controls: Controls) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([controls.tag()]);
    hasher.update(text.as_bytes());
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_pages_produce_no_changes() {
        let mut cache = PageCache::new();
        cache.record_created(10u32, "page zero", Controls::PauseCancel);
        cache.record_created(11u32, "page one", Controls::None);

        let rendered = vec!["page zero".to_string(), "page one".to_string()];
        assert!(cache.plan(&rendered, Controls::PauseCancel).is_empty());
    }

    #[test]
    fn new_pages_are_created_and_existing_edited() {
        let mut cache = PageCache::new();
        cache.record_created(1u32, "old", Controls::PauseCancel);

        let rendered = vec!["new".to_string(), "second".to_string()];
        assert_eq!(
            cache.plan(&rendered, Controls::PauseCancel),
            vec![
                PageChange::Edit {
                    index: 0,
                    text: "new".into(),
                    controls: Controls::PauseCancel
                },
                PageChange::Create {
                    index: 1,
                    text: "second".into(),
                    controls: Controls::None
                },
            ]
        );
    }

    #[test]
    fn controls_only_change_is_a_clear() {
        let mut cache = PageCache::new();
        cache.record_created(1u32, "same", Controls::ResumeCancel);

        let rendered = vec!["same".to_string()];
        assert_eq!(
            cache.plan(&rendered, Controls::None),
            vec![PageChange::ClearControls { index: 0 }]
        );
        assert_eq!(
            cache.plan(&rendered, Controls::PauseCancel),
            vec![PageChange::Edit {
                index: 0,
                text: "same".into(),
                controls: Controls::PauseCancel
            }]
        );

        cache.record_updated(0, "same", Controls::None);
        assert!(cache.plan(&rendered, Controls::None).is_empty());
        assert_eq!(cache.pages()[0].controls, Controls::None);
    }
}
