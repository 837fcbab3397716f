/// Fixed-size pages over an already-ranked slice.
///
/// The paginator only borrows its input, so restarting is free and the
/// underlying order is never disturbed. A page size of zero is treated as one.
#[derive(Debug, Clone)]
pub struct Paginator<'a, T> {
    items: &'a [T],
    page_size: usize,
    cursor: usize,
}

/// Start paging through `items`.
#[must_use]
pub fn paginate<T>(items: &[T], page_size: usize) -> Paginator<'_, T> {
    Paginator::new(items, page_size)
}

impl<'a, T> Paginator<'a, T> {
    #[must_use]
    pub fn new(items: &'a [T], page_size: usize) -> Self {
        Self {
            items,
            page_size: page_size.max(1),
            cursor: 0,
        }
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.items.len().div_ceil(self.page_size)
    }

    /// Zero-based random access. Out-of-range pages are empty.
    #[must_use]
    pub fn page(&self, index: usize) -> &'a [T] {
        let Some(start) = index.checked_mul(self.page_size) else {
            return &[];
        };
        if start >= self.items.len() {
            return &[];
        }
        let end = start.saturating_add(self.page_size).min(self.items.len());
        &self.items[start..end]
    }

    /// The next unread page; empty once everything has been consumed.
    pub fn next_page(&mut self) -> &'a [T] {
        let page = self.page(self.cursor);
        if !page.is_empty() {
            self.cursor += 1;
        }
        page
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.cursor < self.page_count()
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}

impl<'a, T> Iterator for Paginator<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<Self::Item> {
        let page = self.next_page();
        (!page.is_empty()).then_some(page)
    }
}
