//! PDF rendering of a paginated vehicle table.

use std::fs::File;
use std::path::Path;

use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfLayerReference, Point,
};
use tracing::debug;

use super::layout::{PagePlan, PlacedRow, ReportLayout, RowKind};
use crate::error::{Error, Result};
use crate::record::VehicleRecord;

/// Text drawn above the table on the first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TitleBlock<'a> {
    pub title: &'a str,
    pub subtitle: Option<&'a str>,
}

/// Files embedded in the document.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Assets<'a> {
    /// Image drawn above the title; already known to exist.
    pub header_image: Option<&'a Path>,
    /// TrueType font used for all text instead of Helvetica.
    pub font: Option<&'a Path>,
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn pdf_error(err: impl std::fmt::Display) -> Error {
    Error::report(err.to_string())
}

/// Render the table to PDF bytes. Returns the bytes and the page count.
pub(crate) fn render(
    layout: &ReportLayout,
    title: &TitleBlock<'_>,
    assets: &Assets<'_>,
    records: &[VehicleRecord],
) -> Result<(Vec<u8>, usize)> {
    let plan = layout.paginate(records.len());
    let (width, height) = (Mm(layout.page_width), Mm(layout.page_height));

    let (doc, first_page, first_layer) = PdfDocument::new(title.title, width, height, "Layer 1");
    let fonts = match assets.font {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                Error::report(format!("cannot read report font {}: {e}", path.display()))
            })?;
            let font = doc.add_external_font(file).map_err(|e| {
                Error::report(format!("cannot load report font {}: {e}", path.display()))
            })?;
            Fonts {
                regular: font.clone(),
                bold: font,
            }
        }
        None => Fonts {
            regular: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(pdf_error)?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(pdf_error)?,
        },
    };

    for (index, page) in plan.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) =
                doc.add_page(width, height, format!("Layer {}", index + 1));
            doc.get_page(page_index).get_layer(layer_index)
        };

        if index == 0 {
            if let Some(path) = assets.header_image {
                draw_header_image(&layer, layout, path)?;
            }
            draw_title(&layer, layout, &fonts, title);
        }
        draw_page(&layer, layout, &fonts, page, records);
    }

    debug!(
        "Rendered {} records on {} pages",
        records.len(),
        plan.len()
    );
    let bytes = doc.save_to_bytes().map_err(pdf_error)?;
    Ok((bytes, plan.len()))
}

/// Embed the header image at its fixed spot, scaled to the layout width.
fn draw_header_image(layer: &PdfLayerReference, layout: &ReportLayout, path: &Path) -> Result<()> {
    let decoded = printpdf::image_crate::open(path).map_err(|e| {
        Error::report(format!("cannot read header image {}: {e}", path.display()))
    })?;
    let image = Image::from_dynamic_image(&decoded);

    #[allow(clippy::cast_precision_loss)]
    let (px_width, px_height) = (
        image.image.width.0.max(1) as f32,
        image.image.height.0 as f32,
    );
    // Pick the resolution at which the image is exactly `image_width` wide.
    let dpi = px_width * 25.4 / layout.image_width;
    let image_height = px_height * layout.image_width / px_width;

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(layout.image_x)),
            translate_y: Some(Mm(layout.page_height - layout.image_y - image_height)),
            dpi: Some(dpi),
            ..ImageTransform::default()
        },
    );
    Ok(())
}

fn draw_title(layer: &PdfLayerReference, layout: &ReportLayout, fonts: &Fonts, title: &TitleBlock<'_>) {
    let lines = std::iter::once(title.title).chain(title.subtitle);
    for (line_index, text) in lines.enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let top = layout.margin + line_index as f32 * layout.title_line_height;
        let text_width = ReportLayout::text_width(text, layout.title_font_size);
        let x = ((layout.page_width - text_width) / 2.0).max(layout.margin);
        let baseline = top + layout.baseline_offset(layout.title_font_size);
        layer.use_text(
            text,
            layout.title_font_size,
            Mm(x),
            Mm(layout.page_height - baseline),
            &fonts.bold,
        );
    }
}

fn draw_page(
    layer: &PdfLayerReference,
    layout: &ReportLayout,
    fonts: &Fonts,
    page: &PagePlan,
    records: &[VehicleRecord],
) {
    layer.set_outline_thickness(0.2);
    for row in &page.rows {
        match row.kind {
            RowKind::Header => {
                let cells = VehicleRecord::COLUMNS.map(String::from);
                draw_row(layer, layout, &fonts.bold, row, &cells);
            }
            RowKind::Record(index) => {
                if let Some(record) = records.get(index) {
                    draw_row(layer, layout, &fonts.regular, row, &record.cells());
                }
            }
        }
    }
}

/// Draw one bordered row with each cell's text centred.
fn draw_row(
    layer: &PdfLayerReference,
    layout: &ReportLayout,
    font: &IndirectFontRef,
    row: &PlacedRow,
    cells: &[String],
) {
    let top = layout.page_height - row.top;
    let bottom = top - layout.row_height;

    for (column, ((left, width), cell)) in layout
        .column_lefts()
        .into_iter()
        .zip(layout.column_widths)
        .zip(cells)
        .enumerate()
    {
        let right = left + width;
        layer.add_line(Line {
            points: vec![
                (Point::new(Mm(left), Mm(top)), false),
                (Point::new(Mm(right), Mm(top)), false),
                (Point::new(Mm(right), Mm(bottom)), false),
                (Point::new(Mm(left), Mm(bottom)), false),
            ],
            is_closed: true,
        });

        let (text, size) = layout.fit_cell(column, cell);
        let x = left + (width - ReportLayout::text_width(&text, size)) / 2.0;
        let baseline = layout.page_height - (row.top + layout.baseline_offset(size));
        layer.use_text(text, size, Mm(x), Mm(baseline), font);
    }
}
