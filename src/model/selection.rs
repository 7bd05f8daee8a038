//! Page selection state for subset extraction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::PageExtraction;

/// Which pages the user has chosen for extraction.
///
/// Pure state with explicit transition functions; no presentation concerns.
/// Invariant: every selected page is within `1..=total_pages` and the set
/// holds no duplicates (guaranteed by the set representation).
///
/// The select-all flag is recomputed against `total_pages`, not the preview
/// count: previews may cover fewer pages than the document has, and a
/// selection covering every real page is "all" regardless of how many pages
/// were previewed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSelectionModel {
    total_pages: u32,
    previews: Vec<PageExtraction>,
    selected: BTreeSet<u32>,
    select_all: bool,
}

impl PageSelectionModel {
    /// Initialize from preview data. All pages `1..=total_pages` start
    /// selected, including pages without a rendered preview.
    pub fn new(previews: Vec<PageExtraction>, total_pages: u32) -> Self {
        Self {
            total_pages,
            previews,
            selected: (1..=total_pages).collect(),
            select_all: true,
        }
    }

    /// Flip membership of one page. Out-of-range page numbers are ignored.
    pub fn toggle(&mut self, page_number: u32) {
        if page_number < 1 || page_number > self.total_pages {
            return;
        }
        if !self.selected.remove(&page_number) {
            self.selected.insert(page_number);
        }
        self.select_all = self.selected.len() as u32 == self.total_pages;
    }

    /// Select every page `1..=total_pages`.
    pub fn select_all(&mut self) {
        self.selected = (1..=self.total_pages).collect();
        self.select_all = true;
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.select_all = false;
    }

    /// Selected pages, ascending (the order extraction consumes).
    pub fn selected(&self) -> &BTreeSet<u32> {
        &self.selected
    }

    /// Whether every page is currently selected.
    pub fn is_all_selected(&self) -> bool {
        self.select_all
    }

    /// Number of selected pages.
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// True document page count.
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Preview records this model was initialized with.
    pub fn previews(&self) -> &[PageExtraction] {
        &self.previews
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn previews(n: u32) -> Vec<PageExtraction> {
        (1..=n)
            .map(|i| PageExtraction::from_text(i, format!("page {i}")))
            .collect()
    }

    #[test]
    fn test_initialize_selects_all_pages() {
        // 20 previews but 30 real pages: all 30 selected
        let model = PageSelectionModel::new(previews(20), 30);
        assert_eq!(model.selected_count(), 30);
        assert!(model.is_all_selected());
        assert!(model.selected().contains(&30));
    }

    #[test]
    fn test_toggle_removes_and_restores() {
        let mut model = PageSelectionModel::new(previews(5), 5);

        model.toggle(3);
        assert_eq!(model.selected_count(), 4);
        assert!(!model.selected().contains(&3));
        assert!(!model.is_all_selected());

        model.toggle(3);
        assert_eq!(model.selected_count(), 5);
        assert!(model.is_all_selected());
    }

    #[test]
    fn test_select_all_flag_uses_total_pages_not_preview_count() {
        // Previews truncated to 2 of 4 pages; deselecting and reselecting a
        // page must still be able to reach the "all selected" state.
        let mut model = PageSelectionModel::new(previews(2), 4);
        model.toggle(4);
        assert!(!model.is_all_selected());
        model.toggle(4);
        assert!(model.is_all_selected());
    }

    #[test]
    fn test_toggle_ignores_out_of_range() {
        let mut model = PageSelectionModel::new(previews(3), 3);
        model.toggle(0);
        model.toggle(4);
        assert_eq!(model.selected_count(), 3);
        assert!(model.is_all_selected());
    }

    #[test]
    fn test_clear_and_select_all() {
        let mut model = PageSelectionModel::new(previews(3), 3);
        model.clear();
        assert_eq!(model.selected_count(), 0);
        assert!(!model.is_all_selected());

        model.select_all();
        assert_eq!(model.selected_count(), 3);
        assert!(model.is_all_selected());
    }

    #[test]
    fn test_selected_iterates_ascending() {
        let mut model = PageSelectionModel::new(previews(5), 5);
        model.clear();
        model.toggle(4);
        model.toggle(1);
        model.toggle(3);
        let order: Vec<u32> = model.selected().iter().copied().collect();
        assert_eq!(order, vec![1, 3, 4]);
    }
}
