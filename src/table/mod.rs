pub mod state;

use std::fmt;
use std::ops::RangeInclusive;

use crate::model::Record;

pub use state::ViewState;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PageSize {
    Five,
    #[default]
    Ten,
    Fifteen,
    Twenty,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Five,
        PageSize::Ten,
        PageSize::Fifteen,
        PageSize::Twenty,
    ];

    pub fn get(self) -> usize {
        match self {
            PageSize::Five => 5,
            PageSize::Ten => 10,
            PageSize::Fifteen => 15,
            PageSize::Twenty => 20,
        }
    }

    pub fn from_count(count: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.get() == count)
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        let count: usize = value
            .trim()
            .parse()
            .map_err(|_| format!("invalid page size '{}'", value.trim()))?;
        Self::from_count(count)
            .ok_or_else(|| format!("unsupported page size {count}, expected 5, 10, 15 or 20"))
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Records whose title contains `term`, ignoring case. An empty term keeps everything.
pub fn filter_records<'a>(records: &'a [Record], term: &str) -> Vec<&'a Record> {
    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|r| r.title_text().to_lowercase().contains(&needle))
        .collect()
}

pub fn total_pages(len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    len.div_ceil(per_page)
}

// 1-based page window; out of range pages come back empty
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    if page == 0 || per_page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(per_page).min(items.len());
    let end = page.saturating_mul(per_page).min(items.len());
    &items[start..end]
}

pub fn page_numbers(total: usize) -> RangeInclusive<usize> {
    1..=total
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn titled(titles: &[&str]) -> Vec<Record> {
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| Record {
                id: Some(json!(i + 1)),
                title: Some(json!(t)),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn empty_term_keeps_all_records_in_order() {
        let records = titled(&["Beta", "alpha", "Gamma"]);
        let filtered = filter_records(&records, "");
        assert_eq!(filtered.len(), 3);
        assert_eq!(filtered[0].title_text(), "Beta");
        assert_eq!(filtered[2].title_text(), "Gamma");
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let records = titled(&["Alpha", "Beta", "PALM", "beta max"]);
        let titles: Vec<String> = filter_records(&records, "aL")
            .iter()
            .map(|r| r.title_text())
            .collect();
        assert_eq!(titles, vec!["Alpha", "PALM"]);
        assert_eq!(filter_records(&records, "BETA").len(), 2);
        assert!(filter_records(&records, "zeta").is_empty());
    }

    #[test]
    fn missing_title_never_matches_non_empty_term() {
        let mut records = titled(&["Alpha"]);
        records.push(Record::default());
        assert_eq!(filter_records(&records, "a").len(), 1);
        assert_eq!(filter_records(&records, "").len(), 2);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(7, 5), 2);
        assert_eq!(total_pages(10, 5), 2);
        assert_eq!(total_pages(23, 10), 3);
        assert_eq!(total_pages(3, 0), 0);
    }

    #[test]
    fn pages_partition_the_sequence() {
        let items: Vec<usize> = (0..23).collect();
        for per_page in [5, 10, 15, 20] {
            let pages = total_pages(items.len(), per_page);
            let mut joined = Vec::new();
            for page in page_numbers(pages) {
                let window = paginate(&items, page, per_page);
                let expected = per_page.min(items.len() - (page - 1) * per_page);
                assert_eq!(window.len(), expected);
                joined.extend_from_slice(window);
            }
            assert_eq!(joined, items);
        }
    }

    #[test]
    fn last_page_holds_the_remainder() {
        let items: Vec<usize> = (0..23).collect();
        assert_eq!(paginate(&items, 3, 10), &[20, 21, 22]);
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let items: Vec<usize> = (0..7).collect();
        assert!(paginate(&items, 0, 5).is_empty());
        assert!(paginate(&items, 3, 5).is_empty());
        assert!(paginate(&items, usize::MAX, 20).is_empty());
    }

    #[test]
    fn page_size_parsing() {
        assert_eq!(PageSize::parse("15").unwrap(), PageSize::Fifteen);
        assert_eq!(PageSize::parse(" 5 ").unwrap().get(), 5);
        assert!(PageSize::parse("12").is_err());
        assert!(PageSize::parse("ten").is_err());
        assert_eq!(PageSize::default(), PageSize::Ten);
    }

    #[test]
    fn no_page_controls_without_records() {
        assert!(page_numbers(0).is_empty());
        assert_eq!(page_numbers(3).collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
