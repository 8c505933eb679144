//! Millimeter grid arithmetic for the contact sheet.
//!
//! All rectangles use a top-left origin in millimeters; the PDF writer
//! flips to PDF's bottom-left coordinates at the last moment. Keeping the
//! math here pure makes pagination and cell placement testable without a
//! PDF backend.

/// Page dimensions in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

/// ISO A4 portrait.
pub const A4_PORTRAIT: PageSize = PageSize {
    width: 210.0,
    height: 297.0,
};

/// Axis-aligned rectangle, top-left origin, millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Grid geometry knobs. Defaults reproduce the 2-column x 4-row review
/// layout on A4 portrait.
#[derive(Debug, Clone)]
pub struct GridOptions {
    pub page: PageSize,
    /// Outer page margin on all sides.
    pub margin: f64,
    /// Spacing between neighboring cells.
    pub gutter: f64,
    pub columns: usize,
    pub rows: usize,
    /// Band across the top of every page for title / page number / notes.
    pub header_height: f64,
    /// Strip at the bottom of each cell reserved for caption text.
    pub caption_height: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            page: A4_PORTRAIT,
            margin: 12.0,
            gutter: 6.0,
            columns: 2,
            rows: 4,
            header_height: 14.0,
            caption_height: 10.0,
        }
    }
}

/// Resolved grid: assigns every image index a page and a cell rectangle.
#[derive(Debug, Clone)]
pub struct GridLayout {
    opts: GridOptions,
}

impl GridLayout {
    pub fn new(mut opts: GridOptions) -> Self {
        opts.columns = opts.columns.max(1);
        opts.rows = opts.rows.max(1);
        Self { opts }
    }

    pub fn options(&self) -> &GridOptions {
        &self.opts
    }

    pub fn page_size(&self) -> PageSize {
        self.opts.page
    }

    /// Cells per page.
    pub fn per_page(&self) -> usize {
        self.opts.columns * self.opts.rows
    }

    /// Pages needed for `count` images.
    pub fn page_count(&self, count: usize) -> usize {
        count.div_ceil(self.per_page()).max(1)
    }

    /// Header band of a page.
    pub fn header_rect(&self) -> Rect {
        Rect {
            x: self.opts.margin,
            y: self.opts.margin,
            width: self.opts.page.width - 2.0 * self.opts.margin,
            height: self.opts.header_height,
        }
    }

    fn cell_size(&self) -> (f64, f64) {
        let o = &self.opts;
        let content_w = o.page.width - 2.0 * o.margin;
        let content_h = o.page.height - 2.0 * o.margin - o.header_height;
        let cell_w = (content_w - o.gutter * (o.columns as f64 - 1.0)) / o.columns as f64;
        let cell_h = (content_h - o.gutter * (o.rows as f64 - 1.0)) / o.rows as f64;
        (cell_w, cell_h)
    }

    /// Page index and cell rectangle for image `index`.
    pub fn slot(&self, index: usize) -> (usize, Rect) {
        let o = &self.opts;
        let page = index / self.per_page();
        let within = index % self.per_page();
        let col = within % o.columns;
        let row = within / o.columns;
        let (cell_w, cell_h) = self.cell_size();
        let rect = Rect {
            x: o.margin + col as f64 * (cell_w + o.gutter),
            y: o.margin + o.header_height + row as f64 * (cell_h + o.gutter),
            width: cell_w,
            height: cell_h,
        };
        (page, rect)
    }

    /// The part of a cell the thumbnail may occupy (cell minus the
    /// caption strip).
    pub fn image_box(&self, cell: &Rect) -> Rect {
        Rect {
            x: cell.x,
            y: cell.y,
            width: cell.width,
            height: (cell.height - self.opts.caption_height).max(0.0),
        }
    }

    /// Baselines (top-left origin) for the two caption lines of a cell.
    pub fn caption_baselines(&self, cell: &Rect) -> (f64, f64) {
        let top = cell.y + cell.height - self.opts.caption_height;
        (top + 4.0, top + 8.5)
    }
}

/// Largest rectangle with the aspect ratio of a `px_w` x `px_h` image
/// that fits inside `bounds`, centered.
pub fn fit_rect(bounds: &Rect, px_w: u32, px_h: u32) -> Rect {
    if px_w == 0 || px_h == 0 || bounds.width <= 0.0 || bounds.height <= 0.0 {
        return Rect {
            x: bounds.x,
            y: bounds.y,
            width: 0.0,
            height: 0.0,
        };
    }
    let w = px_w as f64;
    let h = px_h as f64;
    let scale = (bounds.width / w).min(bounds.height / h);
    let draw_w = w * scale;
    let draw_h = h * scale;
    Rect {
        x: bounds.x + (bounds.width - draw_w) / 2.0,
        y: bounds.y + (bounds.height - draw_h) / 2.0,
        width: draw_w,
        height: draw_h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> GridLayout {
        GridLayout::new(GridOptions::default())
    }

    #[test]
    fn test_page_count_rounds_up() {
        let layout = layout();
        assert_eq!(layout.per_page(), 8);
        assert_eq!(layout.page_count(1), 1);
        assert_eq!(layout.page_count(8), 1);
        assert_eq!(layout.page_count(9), 2);
        assert_eq!(layout.page_count(0), 1);
    }

    #[test]
    fn test_cells_stay_inside_the_page() {
        let layout = layout();
        let page = layout.page_size();
        for i in 0..20 {
            let (_, cell) = layout.slot(i);
            assert!(cell.x >= 0.0 && cell.y >= 0.0, "cell {} origin", i);
            assert!(
                cell.x + cell.width <= page.width + 1e-9,
                "cell {} overflows right edge",
                i
            );
            assert!(
                cell.y + cell.height <= page.height + 1e-9,
                "cell {} overflows bottom edge",
                i
            );
        }
    }

    #[test]
    fn test_fit_rect_preserves_aspect_and_centers() {
        let bounds = Rect {
            x: 10.0,
            y: 20.0,
            width: 80.0,
            height: 40.0,
        };
        // 1000x500 pixels: same 2:1 aspect as the bounds, fills them.
        let full = fit_rect(&bounds, 1000, 500);
        assert!((full.width - 80.0).abs() < 1e-9);
        assert!((full.height - 40.0).abs() < 1e-9);

        // Tall image is height-limited and horizontally centered.
        let tall = fit_rect(&bounds, 100, 200);
        assert!((tall.height - 40.0).abs() < 1e-9);
        assert!((tall.width - 20.0).abs() < 1e-9);
        assert!((tall.x - (10.0 + 30.0)).abs() < 1e-9);
    }

    #[test]
    fn test_fit_rect_degenerate_input() {
        let bounds = Rect {
            x: 0.0,
            y: 0.0,
            width: 50.0,
            height: 50.0,
        };
        let empty = fit_rect(&bounds, 0, 100);
        assert_eq!(empty.width, 0.0);
    }
}
