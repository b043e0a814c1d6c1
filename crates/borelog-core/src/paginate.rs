//! Page slicing over ordered result sets.

use serde::Serialize;

/// Page size used by every listing endpoint.
pub const PAGE_SIZE: usize = 5;

/// Position of a page within its result set; flattened into list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
  pub total_pages:  usize,
  pub current_page: usize,
  pub has_prev:     bool,
  pub has_next:     bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
  pub items: Vec<T>,
  pub meta:  PageMeta,
}

impl<T> Page<T> {
  /// Convert every item, keeping the page position.
  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
    Page { items: self.items.into_iter().map(f).collect(), meta: self.meta }
  }
}

/// Slice `items` into the `requested` page of `page_size` items.
///
/// An empty set still has one (empty) page. Requests outside
/// `1..=total_pages` are clamped to the nearest valid page rather than
/// rejected, so page `0` yields the first page (Django's `get_page(0)` would
/// yield the last).
pub fn paginate<T>(items: Vec<T>, page_size: usize, requested: usize) -> Page<T> {
  let page_size = page_size.max(1);
  let total_pages = items.len().div_ceil(page_size).max(1);
  let current_page = requested.clamp(1, total_pages);

  let items = items
    .into_iter()
    .skip((current_page - 1) * page_size)
    .take(page_size)
    .collect();

  Page {
    items,
    meta: PageMeta {
      total_pages,
      current_page,
      has_prev: current_page > 1,
      has_next: current_page < total_pages,
    },
  }
}
