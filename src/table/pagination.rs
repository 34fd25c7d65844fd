//! Page arithmetic for list tables.

use std::ops::Range;

/// Number of placeholder rows that keep the table height stable.
///
/// The first page never gets filler rows. Later pages get
/// `min(rows_per_page, total_count - page * rows_per_page)`, floored at zero.
pub fn empty_rows(page: usize, rows_per_page: usize, total_count: usize) -> usize {
    if page == 0 {
        return 0;
    }

    let consumed = page.saturating_mul(rows_per_page);
    rows_per_page.min(total_count.saturating_sub(consumed))
}

/// Index range of the rows shown on `page`, clamped to `len`.
pub fn visible_range(page: usize, rows_per_page: usize, len: usize) -> Range<usize> {
    let start = page.saturating_mul(rows_per_page).min(len);
    let end = start.saturating_add(rows_per_page).min(len);
    start..end
}

/// Number of pages needed for `len` rows. Zero rows still make one page.
pub fn page_count(rows_per_page: usize, len: usize) -> usize {
    if rows_per_page == 0 {
        return 1;
    }
    len.div_ceil(rows_per_page).max(1)
}
