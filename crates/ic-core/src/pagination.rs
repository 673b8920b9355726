//! Lenient page-number handling for listing views.

use serde::Serialize;

/// A resolved page position: always a valid page for the current total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Resolves a raw `?page=` value against `total` rows.
    ///
    /// Anything that is not an integer yields the first page; numbers outside
    /// `1..=num_pages` yield the last page.
    pub fn resolve(raw: Option<&str>, per_page: u32, total: u64) -> Self {
        let per_page = per_page.max(1);
        let last = num_pages(total, per_page);
        let number = match raw.map(str::trim).and_then(|s| s.parse::<i64>().ok()) {
            None => 1,
            Some(n) if n < 1 || n > i64::from(last) => last,
            Some(n) => n as u32,
        };
        Self { number, per_page }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.number - 1) * i64::from(self.per_page)
    }
}

fn num_pages(total: u64, per_page: u32) -> u32 {
    let pages = total.div_ceil(u64::from(per_page));
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

/// One page of results plus what the templates need for navigation.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u32,
    pub per_page: u32,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            number: request.number,
            per_page: request.per_page,
            total,
        }
    }

    pub fn num_pages(&self) -> u32 {
        num_pages(self.total, self.per_page)
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_number(&self) -> u32 {
        self.number + 1
    }

    pub fn previous_number(&self) -> u32 {
        self.number.saturating_sub(1).max(1)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
