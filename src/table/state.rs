use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::model::Record;

use super::{filter_records, page_numbers, paginate, total_pages, PageSize};

/// Everything the table view derives from. Transitions consume the state and
/// hand back a new one; filtering and paging are recomputed on every call.
#[derive(Clone, Debug)]
pub struct ViewState {
    records: Arc<[Record]>,
    loading: bool,
    search_term: String,
    current_page: usize,
    page_size: PageSize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            records: Arc::from(Vec::new()),
            loading: true,
            search_term: String::new(),
            current_page: 1,
            page_size: PageSize::default(),
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loaded(self, records: Vec<Record>) -> Self {
        Self {
            records: Arc::from(records),
            loading: false,
            ..self
        }
    }

    // the page is left alone on purpose, a shrinking result can strand it
    pub fn with_search(self, term: impl Into<String>) -> Self {
        Self {
            search_term: term.into(),
            ..self
        }
    }

    pub fn with_page(self, page: usize) -> Self {
        Self {
            current_page: page,
            ..self
        }
    }

    pub fn with_page_size(self, page_size: PageSize) -> Self {
        Self {
            page_size,
            current_page: 1,
            ..self
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn filtered(&self) -> Vec<&Record> {
        filter_records(&self.records, &self.search_term)
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered().len(), self.page_size.get())
    }

    /// The page-window view: what is on screen and what gets exported.
    pub fn current_items(&self) -> Vec<&Record> {
        let filtered = self.filtered();
        paginate(&filtered, self.current_page, self.page_size.get()).to_vec()
    }

    pub fn page_numbers(&self) -> RangeInclusive<usize> {
        page_numbers(self.total_pages())
    }

    pub fn is_page_out_of_range(&self) -> bool {
        let total = self.total_pages();
        total > 0 && self.current_page > total
    }
}
