// Currency Basics - List View State
// Search box, filtered rows and selection of the currency list modal

use crate::currency::CurrencyRecord;
use crate::filter::filter_currencies;

pub const SEARCH_PLACEHOLDER: &str = "Search currencies...";
pub const CLEAR_SYMBOL: &str = "✕";

/// Rows moved by page up / page down
const PAGE_SIZE: usize = 20;

/// Why the list shows no rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The query filtered everything out
    NoMatches,
    /// There was nothing to show in the first place
    NoData,
}

impl EmptyState {
    pub fn headline(&self) -> &'static str {
        "No currencies found"
    }

    pub fn hint(&self) -> &'static str {
        match self {
            EmptyState::NoMatches => "Try a different search term",
            EmptyState::NoData => "No data available",
        }
    }
}

/// A searchable currency list.
///
/// `filtered` is always recomputed from the full list and the current query.
#[derive(Debug, Clone)]
pub struct CurrencyListView {
    title: String,
    records: Vec<CurrencyRecord>,
    filtered: Vec<CurrencyRecord>,
    query: String,
    search_active: bool,
    selected: Option<usize>,
}

impl CurrencyListView {
    pub fn new(title: impl Into<String>, records: Vec<CurrencyRecord>) -> Self {
        let mut view = Self {
            title: title.into(),
            filtered: records.clone(),
            records,
            query: String::new(),
            search_active: false,
            selected: None,
        };
        view.reset_selection();
        view
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn records(&self) -> &[CurrencyRecord] {
        &self.records
    }

    pub fn filtered(&self) -> &[CurrencyRecord] {
        &self.filtered
    }

    /// Swap in a new full list, keeping the current query applied
    pub fn set_records(&mut self, records: Vec<CurrencyRecord>) {
        self.records = records;
        self.refilter();
    }

    // ========================================================================
    // SEARCH
    // ========================================================================

    /// The search input received focus
    pub fn focus_search(&mut self) {
        self.search_active = true;
    }

    pub fn is_search_active(&self) -> bool {
        self.search_active
    }

    /// Replace the query with the input's current text
    pub fn handle_search(&mut self, query: &str) {
        self.query = query.to_string();
        self.refilter();
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.refilter();
    }

    pub fn pop_char(&mut self) {
        if self.query.pop().is_some() {
            self.refilter();
        }
    }

    /// Empty the query, restore the full list and drop focus
    pub fn clear_search(&mut self) {
        self.query.clear();
        self.search_active = false;
        self.refilter();
    }

    /// The clear affordance shows once the input was focused or holds text
    pub fn show_clear_button(&self) -> bool {
        self.search_active || !self.query.is_empty()
    }

    /// `None` while there are rows to show
    pub fn empty_state(&self) -> Option<EmptyState> {
        if !self.filtered.is_empty() {
            None
        } else if self.query.is_empty() {
            Some(EmptyState::NoData)
        } else {
            Some(EmptyState::NoMatches)
        }
    }

    fn refilter(&mut self) {
        self.filtered = filter_currencies(&self.records, &self.query);
        self.reset_selection();
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_record(&self) -> Option<&CurrencyRecord> {
        self.selected.and_then(|i| self.filtered.get(i))
    }

    fn reset_selection(&mut self) {
        self.selected = if self.filtered.is_empty() { None } else { Some(0) };
    }

    pub fn next(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        });
    }

    pub fn previous(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) => len - 1,
            Some(i) => i - 1,
            None => 0,
        });
    }

    pub fn page_down(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        let next = self.selected.map(|i| i + PAGE_SIZE).unwrap_or(0);
        self.selected = Some(next.min(len - 1));
    }

    pub fn page_up(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        self.selected = Some(self.selected.map(|i| i.saturating_sub(PAGE_SIZE)).unwrap_or(0));
    }

    pub fn first(&mut self) {
        self.reset_selection();
    }

    pub fn last(&mut self) {
        if !self.filtered.is_empty() {
            self.selected = Some(self.filtered.len() - 1);
        }
    }
}
