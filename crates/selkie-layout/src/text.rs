//! Deterministic text footprint estimation.
//!
//! Layout only needs a stable, monotone estimate of how much room a label
//! takes — not font-accurate metrics. Widths are derived from terminal
//! display cells (`unicode-width`) scaled by a per-glyph factor, so CJK and
//! other wide scripts get roughly double the room of Latin text.

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextScale {
    pub font_size: f64,
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl Default for TextScale {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            char_width_factor: 0.6,
            line_height_factor: 1.2,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub line_count: usize,
}

impl TextScale {
    pub fn line_height(&self) -> f64 {
        self.font_size.max(1.0) * self.line_height_factor.max(0.1)
    }

    fn cell_width(&self) -> f64 {
        self.font_size.max(1.0) * self.char_width_factor.max(0.1)
    }

    /// Measures text as-is; embedded newlines produce multiple lines.
    pub fn measure(&self, text: &str) -> TextMetrics {
        let mut max_cells = 0usize;
        let mut line_count = 0usize;
        for line in text.split('\n') {
            max_cells = max_cells.max(line.width());
            line_count += 1;
        }
        let line_count = line_count.max(1);
        TextMetrics {
            width: max_cells as f64 * self.cell_width(),
            height: line_count as f64 * self.line_height(),
            line_count,
        }
    }

    /// Number of lines the text occupies after greedy word wrapping at
    /// `max_width`. A single word wider than the limit still takes one line;
    /// the estimate never reports zero lines for non-empty text.
    pub fn wrapped_line_count(&self, text: &str, max_width: f64) -> usize {
        let cell = self.cell_width();
        let max_cells = (max_width.max(cell) / cell).floor() as usize;

        let mut lines = 0usize;
        for raw_line in text.split('\n') {
            let mut used = 0usize;
            let mut line_open = false;
            for word in raw_line.split_whitespace() {
                let w = word.width();
                let needed = if line_open { used + 1 + w } else { w };
                if line_open && needed > max_cells {
                    lines += 1;
                    used = w;
                } else {
                    used = needed;
                    line_open = true;
                }
            }
            lines += 1;
        }
        lines.max(1)
    }
}
