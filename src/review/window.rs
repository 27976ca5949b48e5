use std::ops::Range;

pub const DEFAULT_WINDOW_SIZE: usize = 9;
pub const DEFAULT_WINDOW_LEAD: usize = 2;

/// Slice of the list shown around the cursor: up to `lead` rows above it,
/// at most `size` rows in total.
pub fn visible_window(len: usize, cursor: usize, size: usize, lead: usize) -> Range<usize> {
    let start = cursor.saturating_sub(lead).min(len);
    let end = len.min(start.saturating_add(size));
    start..end
}
