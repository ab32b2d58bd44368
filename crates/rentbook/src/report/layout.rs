//! Page geometry and pagination for vehicle reports.
//!
//! All measurements are millimetres from the top-left corner of the page.
//! The PDF backend flips them into its bottom-left coordinate space.

use crate::record::VehicleRecord;

/// Millimetres per typographic point.
const MM_PER_PT: f32 = 0.3528;

/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH_EM: f32 = 0.5;

/// Cells holding at most this many glyphs get no side padding.
const PADDED_CAPACITY: usize = 6;

/// Index of the record id column.
pub const ID_COLUMN: usize = 0;

/// Number of table columns.
pub const COLUMN_COUNT: usize = VehicleRecord::COLUMNS.len();

/// Fixed page and table geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    /// Page width.
    pub page_width: f32,
    /// Page height.
    pub page_height: f32,
    /// Left and top margin.
    pub margin: f32,
    /// Space kept free at the bottom of each page.
    pub bottom_margin: f32,
    /// Height of one title line.
    pub title_line_height: f32,
    /// Where the table starts on the first page.
    pub table_top: f32,
    /// Height of every table row.
    pub row_height: f32,
    /// Column widths, in [`VehicleRecord::COLUMNS`] order.
    pub column_widths: [f32; COLUMN_COUNT],
    /// Title font size in points.
    pub title_font_size: f32,
    /// Table font size in points.
    pub body_font_size: f32,
    /// Header image left edge.
    pub image_x: f32,
    /// Header image top edge.
    pub image_y: f32,
    /// Header image width; height follows the image's aspect ratio.
    pub image_width: f32,
}

impl Default for ReportLayout {
    /// A4 portrait with a 190 mm table.
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin: 10.0,
            bottom_margin: 20.0,
            title_line_height: 10.0,
            table_top: 50.0,
            row_height: 10.0,
            column_widths: [10.0, 30.0, 20.0, 30.0, 30.0, 40.0, 30.0],
            title_font_size: 14.0,
            body_font_size: 10.0,
            image_x: 10.0,
            image_y: 8.0,
            image_width: 30.0,
        }
    }
}

/// What a table row shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// The column header row.
    Header,
    /// The record at this index of the input slice.
    Record(usize),
}

/// A row positioned on a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedRow {
    /// Row contents.
    pub kind: RowKind,
    /// Top edge of the row.
    pub top: f32,
}

/// The rows drawn on one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagePlan {
    /// Rows in drawing order.
    pub rows: Vec<PlacedRow>,
}

impl ReportLayout {
    /// Total table width.
    #[must_use]
    pub fn table_width(&self) -> f32 {
        self.column_widths.iter().sum()
    }

    /// Left edge of each column.
    #[must_use]
    pub fn column_lefts(&self) -> [f32; COLUMN_COUNT] {
        let mut lefts = [0.0; COLUMN_COUNT];
        let mut x = self.margin;
        for (left, width) in lefts.iter_mut().zip(self.column_widths) {
            *left = x;
            x += width;
        }
        lefts
    }

    /// Lowest point a row may reach before it moves to the next page.
    fn page_limit(&self) -> f32 {
        self.page_height - self.bottom_margin
    }

    /// Place the header row and `record_count` record rows on pages.
    ///
    /// The header row opens the table on the first page. A row that would
    /// cross the bottom margin starts a new page at the top margin. There is
    /// always at least one page.
    #[must_use]
    pub fn paginate(&self, record_count: usize) -> Vec<PagePlan> {
        let rows = std::iter::once(RowKind::Header).chain((0..record_count).map(RowKind::Record));

        let mut pages = vec![PagePlan::default()];
        let mut top = self.table_top;
        for kind in rows {
            if top + self.row_height > self.page_limit() {
                pages.push(PagePlan::default());
                top = self.margin;
            }
            if let Some(page) = pages.last_mut() {
                page.rows.push(PlacedRow { kind, top });
            }
            top += self.row_height;
        }
        pages
    }

    /// Estimated rendered width of `text` at `font_size` points.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn text_width(text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * MM_PER_PT * AVG_GLYPH_WIDTH_EM
    }

    /// Shorten `text` so it fits in a cell `width` wide, marking the cut
    /// with `...`.
    ///
    /// Cells wide enough for more than six glyphs keep one glyph of padding
    /// on each side; narrower cells use their full width.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn fit_text(text: &str, width: f32, font_size: f32) -> String {
        let glyph = font_size * MM_PER_PT * AVG_GLYPH_WIDTH_EM;
        let raw = (width / glyph).floor() as usize;
        let capacity = if raw > PADDED_CAPACITY {
            raw - 2
        } else {
            raw
        };
        if text.chars().count() <= capacity {
            return text.to_string();
        }
        let keep = capacity.saturating_sub(3);
        let mut fitted: String = text.chars().take(keep).collect();
        fitted.push_str("...");
        fitted
    }

    /// Text and font size for the cell in `column`.
    ///
    /// The id column is never cut: an id too wide for it is drawn at a
    /// smaller size instead. Other columns keep the body font size and are
    /// truncated by [`ReportLayout::fit_text`].
    #[must_use]
    pub fn fit_cell(&self, column: usize, text: &str) -> (String, f32) {
        let size = self.body_font_size;
        let width = self.column_widths.get(column).copied().unwrap_or(0.0);
        if column != ID_COLUMN {
            return (Self::fit_text(text, width, size), size);
        }

        let natural = Self::text_width(text, size);
        if natural <= width || natural <= 0.0 {
            (text.to_string(), size)
        } else {
            (text.to_string(), size * width / natural)
        }
    }

    /// Vertical offset from a row's top edge to its text baseline.
    #[must_use]
    pub fn baseline_offset(&self, font_size: f32) -> f32 {
        self.row_height / 2.0 + font_size * MM_PER_PT * 0.35
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_rows(page: &PagePlan) -> usize {
        page.rows
            .iter()
            .filter(|r| matches!(r.kind, RowKind::Record(_)))
            .count()
    }

    #[test]
    fn test_default_table_fits_page() {
        let layout = ReportLayout::default();
        assert!((layout.table_width() - 190.0).abs() < f32::EPSILON);
        assert!(layout.margin + layout.table_width() <= layout.page_width);
    }

    #[test]
    fn test_column_lefts() {
        let lefts = ReportLayout::default().column_lefts();
        assert_eq!(lefts, [10.0, 20.0, 50.0, 70.0, 100.0, 130.0, 170.0]);
    }

    #[test]
    fn test_paginate_empty_has_header_only() {
        let pages = ReportLayout::default().paginate(0);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].rows.len(), 1);
        assert_eq!(pages[0].rows[0].kind, RowKind::Header);
        assert!((pages[0].rows[0].top - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_paginate_two_records() {
        let pages = ReportLayout::default().paginate(2);
        assert_eq!(pages.len(), 1);
        let kinds: Vec<_> = pages[0].rows.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![RowKind::Header, RowKind::Record(0), RowKind::Record(1)]
        );
    }

    #[test]
    fn test_first_page_capacity() {
        // Rows from 50 mm down to the 277 mm limit: header plus 21 records.
        let layout = ReportLayout::default();
        assert_eq!(layout.paginate(21).len(), 1);

        let pages = layout.paginate(22);
        assert_eq!(pages.len(), 2);
        assert_eq!(record_rows(&pages[0]), 21);
        assert_eq!(pages[1].rows[0].kind, RowKind::Record(21));
        assert!((pages[1].rows[0].top - layout.margin).abs() < f32::EPSILON);
    }

    #[test]
    fn test_continuation_page_capacity() {
        // 26 rows fit between the 10 mm top margin and the limit.
        let layout = ReportLayout::default();
        let pages = layout.paginate(21 + 26 + 1);
        assert_eq!(pages.len(), 3);
        assert_eq!(record_rows(&pages[1]), 26);
        assert_eq!(record_rows(&pages[2]), 1);
    }

    #[test]
    fn test_paginate_keeps_every_record_once_in_order() {
        let pages = ReportLayout::default().paginate(100);
        let indices: Vec<usize> = pages
            .iter()
            .flat_map(|p| &p.rows)
            .filter_map(|r| match r.kind {
                RowKind::Record(i) => Some(i),
                RowKind::Header => None,
            })
            .collect();
        assert_eq!(indices, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_rows_stay_above_bottom_margin() {
        let layout = ReportLayout::default();
        for page in layout.paginate(80) {
            for row in page.rows {
                assert!(row.top + layout.row_height <= layout.page_height - layout.bottom_margin);
            }
        }
    }

    #[test]
    fn test_fit_text_short_is_unchanged() {
        assert_eq!(ReportLayout::fit_text("Clio", 30.0, 10.0), "Clio");
    }

    #[test]
    fn test_fit_text_truncates_long_values() {
        let long = "Mercedes-Benz Sprinter 316 CDI Long";
        let fitted = ReportLayout::fit_text(long, 30.0, 10.0);
        assert!(fitted.ends_with("..."));
        assert!(ReportLayout::text_width(&fitted, 10.0) < 30.0);
    }

    #[test]
    fn test_fit_text_id_column() {
        // The 10 mm id column holds up to five digits at 10 pt untouched.
        assert_eq!(ReportLayout::fit_text("123", 10.0, 10.0), "123");
        assert_eq!(ReportLayout::fit_text("1000", 10.0, 10.0), "1000");
        assert_eq!(ReportLayout::fit_text("12345", 10.0, 10.0), "12345");
    }

    #[test]
    fn test_fit_cell_never_cuts_ids() {
        let layout = ReportLayout::default();

        for id in ["1", "999", "1000", "12345"] {
            assert_eq!(layout.fit_cell(ID_COLUMN, id), (id.to_string(), 10.0));
        }

        let (text, size) = layout.fit_cell(ID_COLUMN, "12345678901");
        assert_eq!(text, "12345678901");
        assert!(size < layout.body_font_size);
        assert!(ReportLayout::text_width(&text, size) <= layout.column_widths[ID_COLUMN] + 1e-3);
    }

    #[test]
    fn test_fit_cell_truncates_other_columns() {
        let layout = ReportLayout::default();
        let (text, size) = layout.fit_cell(5, "Abdelkarim Ben Mohammed El Idrissi");
        assert!(text.ends_with("..."));
        assert!((size - layout.body_font_size).abs() < f32::EPSILON);
        assert_eq!(layout.fit_cell(4, "Clio"), ("Clio".to_string(), 10.0));
    }
}
