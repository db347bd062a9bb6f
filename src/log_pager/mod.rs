use std::ops::Range;

/// Lines shown per page when nothing else is asked for.
pub const DEFAULT_PAGE_SIZE: usize = 27;

/// Scroll position over a trace of `total` lines, `page_size` at a time.
/// `top` always stays within `[0, max(0, total - page_size)]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPager {
    top: usize,
    page_size: usize,
    total: usize,
}

impl LogPager {
    pub fn new(total: usize, page_size: usize) -> Self {
        Self {
            top: 0,
            page_size: page_size.max(1),
            total,
        }
    }

    pub fn top(&self) -> usize {
        self.top
    }

    fn last_top(&self) -> usize {
        self.total.saturating_sub(self.page_size)
    }

    pub fn line_down(&mut self) {
        if self.top + self.page_size < self.total {
            self.top += 1;
        }
    }

    pub fn line_up(&mut self) {
        self.top = self.top.saturating_sub(1);
    }

    pub fn page_down(&mut self) {
        self.top = (self.top + self.page_size).min(self.last_top());
    }

    pub fn page_up(&mut self) {
        self.top = self.top.saturating_sub(self.page_size);
    }

    pub fn is_at_end(&self) -> bool {
        self.top >= self.last_top()
    }

    pub fn visible(&self) -> Range<usize> {
        self.top..(self.top + self.page_size).min(self.total)
    }

    pub fn footer(&self) -> String {
        let visible = self.visible();
        if visible.is_empty() {
            return format!("Lines 0-0 / {}", self.total);
        }
        format!("Lines {}-{} / {}", visible.start + 1, visible.end, self.total)
    }
}
