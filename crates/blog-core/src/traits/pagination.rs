//! Page requests, pages, and post listing filters

use serde::Serialize;

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub const DEFAULT_PER_PAGE: u32 = 10;

    pub fn new(page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: Self::DEFAULT_PER_PAGE,
        }
    }

    #[inline]
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    #[inline]
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1)
    }
}

/// One page of results plus the total count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
        }
    }

    /// Number of pages, at least 1 so an empty listing still has a first page
    pub fn num_pages(&self) -> u32 {
        if self.total <= 0 || self.per_page == 0 {
            return 1;
        }
        let per_page = i64::from(self.per_page);
        ((self.total + per_page - 1) / per_page) as u32
    }

    pub fn is_out_of_range(&self) -> bool {
        self.page > self.num_pages()
    }

    pub fn has_next(&self) -> bool {
        self.page < self.num_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Filter for published post listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    /// Case-insensitive substring matched against title or content
    pub query: Option<String>,
}

impl PostFilter {
    /// Build a filter from a raw query string; blank means no filter
    pub fn search(query: Option<&str>) -> Self {
        let query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(ToString::to_string);
        Self { query }
    }

    /// `ILIKE` pattern with `\`, `%` and `_` escaped
    pub fn like_pattern(&self) -> Option<String> {
        self.query.as_ref().map(|q| {
            let mut pattern = String::with_capacity(q.len() + 2);
            pattern.push('%');
            for c in q.chars() {
                if matches!(c, '\\' | '%' | '_') {
                    pattern.push('\\');
                }
                pattern.push(c);
            }
            pattern.push('%');
            pattern
        })
    }

    /// In-memory equivalent of the SQL match
    pub fn matches(&self, title: &str, content: &str) -> bool {
        match &self.query {
            None => true,
            Some(q) => {
                let q = q.to_lowercase();
                title.to_lowercase().contains(&q) || content.to_lowercase().contains(&q)
            }
        }
    }
}
