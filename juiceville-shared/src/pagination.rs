use serde::Serialize;

/// One page of an ordered result set.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub num_pages: usize,
    pub per_page: usize,
    pub total: usize,
}

impl<T> Page<T> {
    /// Slices `items` into the requested page.
    ///
    /// A missing or non-numeric page number yields the first page, a number
    /// past the end (or below one) yields the last page. An empty input
    /// still has one (empty) page.
    pub fn from_request(items: Vec<T>, requested: Option<&str>, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let total = items.len();
        let num_pages = total.div_ceil(per_page).max(1);

        let number = match requested.map(str::trim).map(str::parse::<i64>) {
            None | Some(Err(_)) => 1,
            Some(Ok(n)) if n < 1 || n as usize > num_pages => num_pages,
            Some(Ok(n)) => n as usize,
        };

        let items = items
            .into_iter()
            .skip((number - 1) * per_page)
            .take(per_page)
            .collect();

        Self {
            items,
            number,
            num_pages,
            per_page,
            total,
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn is_paginated(&self) -> bool {
        self.num_pages > 1
    }
}
