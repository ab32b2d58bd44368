//! PDF reports of vehicle records.
//!
//! A report is a snapshot of an already filtered and sorted record list:
//! an optional header image, a title block, then a bordered table with one
//! header row and one row per record. Columns have fixed widths and the
//! table continues onto new pages as needed. Reports are artifacts only;
//! nothing about them is stored in a partition.
//!
//! # Example
//!
//! ```no_run
//! use rentbook::report::{report_file_name, ReportGenerator};
//! use rentbook::{PartitionResolver, Query, RecordStore};
//!
//! # fn main() -> rentbook::Result<()> {
//! let resolver = PartitionResolver::new("data", [("anas", "anas")]);
//! let store = resolver.open("anas")?;
//! let records = Query::new().vehicle("Clio").apply(store.list_all()?);
//!
//! let meta = ReportGenerator::new().render(&records, report_file_name("anas"))?;
//! println!("{} bytes", meta.size_in_bytes);
//! # Ok(())
//! # }
//! ```

pub mod layout;
mod pdf;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ReportConfig;
use crate::error::{Error, Result};
use crate::record::VehicleRecord;

pub use layout::ReportLayout;

/// Suffix appended to the partition key to name its report file.
const REPORT_FILE_SUFFIX: &str = "_vehicles.pdf";

/// File name of the report for a partition.
#[must_use]
pub fn report_file_name(partition_key: &str) -> String {
    format!("{partition_key}{REPORT_FILE_SUFFIX}")
}

/// Facts about a written report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportMetadata {
    /// Where the report was written.
    pub destination_path: PathBuf,
    /// Size of the written file.
    pub size_in_bytes: u64,
    /// When rendering finished.
    pub generated_at: DateTime<Utc>,
    /// Table rows, counting the header row.
    pub rows: usize,
    /// Number of pages.
    pub pages: usize,
}

/// Renders record lists to PDF files.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    layout: ReportLayout,
    title: String,
    subtitle: Option<String>,
    header_image: Option<PathBuf>,
    font: Option<PathBuf>,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::from_config(&ReportConfig::default())
    }
}

impl ReportGenerator {
    /// Create a generator with the default layout and title.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator from the report configuration.
    #[must_use]
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            layout: ReportLayout::default(),
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            header_image: config.header_image.clone(),
            font: config.font.clone(),
        }
    }

    /// Use a different page layout.
    #[must_use]
    pub fn with_layout(mut self, layout: ReportLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the title line.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the line under the title.
    #[must_use]
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Set the header image path, or `None` for no image.
    #[must_use]
    pub fn with_header_image(mut self, path: Option<PathBuf>) -> Self {
        self.header_image = path;
        self
    }

    /// Embed a TrueType font, or `None` for the built-in Helvetica.
    #[must_use]
    pub fn with_font(mut self, path: Option<PathBuf>) -> Self {
        self.font = path;
        self
    }

    /// The page layout in use.
    #[must_use]
    pub fn layout(&self) -> &ReportLayout {
        &self.layout
    }

    /// Render `records`, in the order given, to `destination`.
    ///
    /// An existing file at `destination` is overwritten. A configured header
    /// image that does not exist is skipped.
    ///
    /// Without a font set through [`ReportGenerator::with_font`], text is
    /// drawn in the built-in Helvetica with `WinAnsiEncoding`: characters
    /// outside Latin-1, such as Arabic letters in a plate number, do not
    /// survive into the document. Configure a TrueType font that covers
    /// them to keep such values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReportWrite`] if the destination cannot be written,
    /// or [`Error::Report`] if the header image exists but cannot be
    /// decoded, or the configured font cannot be read.
    pub fn render(
        &self,
        records: &[VehicleRecord],
        destination: impl AsRef<Path>,
    ) -> Result<ReportMetadata> {
        let destination = destination.as_ref();

        let header_image = self.header_image.as_deref().filter(|path| {
            let present = path.is_file();
            if !present {
                debug!("Header image {} not found, skipping", path.display());
            }
            present
        });

        let title = pdf::TitleBlock {
            title: &self.title,
            subtitle: self.subtitle.as_deref(),
        };
        let assets = pdf::Assets {
            header_image,
            font: self.font.as_deref(),
        };
        let (bytes, pages) = pdf::render(&self.layout, &title, &assets, records)?;

        let write_error = |source| Error::ReportWrite {
            path: destination.to_path_buf(),
            source,
        };
        std::fs::write(destination, &bytes).map_err(write_error)?;
        let size_in_bytes = std::fs::metadata(destination)
            .map_err(write_error)?
            .len();

        info!(
            "Wrote report with {} records to {} ({} bytes, {} pages)",
            records.len(),
            destination.display(),
            size_in_bytes,
            pages
        );

        Ok(ReportMetadata {
            destination_path: destination.to_path_buf(),
            size_in_bytes,
            generated_at: Utc::now(),
            rows: records.len() + 1,
            pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordFields;
    use printpdf::image_crate::{Rgb, RgbImage};

    fn records(count: usize) -> Vec<VehicleRecord> {
        (1..=count)
            .map(|id| VehicleRecord {
                id: i64::try_from(id).unwrap(),
                fields: RecordFields::new("01/01/2024", "09:00", "AA-123", "Clio", "X", "CERIZA"),
            })
            .collect()
    }

    fn generator() -> ReportGenerator {
        ReportGenerator::new().with_header_image(None)
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(report_file_name("anas"), "anas_vehicles.pdf");
    }

    #[test]
    fn test_render_two_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");

        let meta = generator().render(&records(2), &path).unwrap();

        assert_eq!(meta.destination_path, path);
        assert!(meta.size_in_bytes > 0);
        assert_eq!(meta.rows, 3);
        assert_eq!(meta.pages, 1);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), meta.size_in_bytes);

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_empty_record_list() {
        let dir = tempfile::tempdir().unwrap();
        let meta = generator().render(&[], dir.path().join("empty.pdf")).unwrap();

        assert_eq!(meta.rows, 1);
        assert_eq!(meta.pages, 1);
        assert!(meta.size_in_bytes > 0);
    }

    #[test]
    fn test_render_paginates() {
        let dir = tempfile::tempdir().unwrap();
        let meta = generator()
            .render(&records(60), dir.path().join("long.pdf"))
            .unwrap();

        assert_eq!(meta.rows, 61);
        assert_eq!(meta.pages, generator().layout().paginate(60).len());
        assert!(meta.pages >= 3);
    }

    #[test]
    fn test_render_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        std::fs::write(&path, b"stale").unwrap();

        let meta = generator().render(&records(1), &path).unwrap();
        assert!(meta.size_in_bytes > 5);
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn test_missing_header_image_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let meta = ReportGenerator::new()
            .with_header_image(Some(dir.path().join("no-logo.jpg")))
            .render(&records(1), dir.path().join("out.pdf"))
            .unwrap();
        assert_eq!(meta.rows, 2);
    }

    #[test]
    fn test_corrupt_header_image_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let logo = dir.path().join("logo.jpg");
        std::fs::write(&logo, b"not a jpeg").unwrap();

        let err = ReportGenerator::new()
            .with_header_image(Some(logo))
            .render(&records(1), dir.path().join("out.pdf"))
            .unwrap_err();
        assert!(matches!(err, Error::Report { .. }));
    }

    #[test]
    fn test_header_image_is_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let logo = dir.path().join("logo.png");
        RgbImage::from_pixel(40, 20, Rgb([200, 30, 30]))
            .save(&logo)
            .unwrap();

        let plain = generator()
            .render(&records(1), dir.path().join("plain.pdf"))
            .unwrap();
        let with_logo = ReportGenerator::new()
            .with_header_image(Some(logo))
            .render(&records(1), dir.path().join("logo.pdf"))
            .unwrap();

        assert_eq!(with_logo.rows, 2);
        assert_eq!(with_logo.pages, 1);
        assert!(with_logo.size_in_bytes > plain.size_in_bytes);
    }

    #[test]
    fn test_large_ids_are_kept_whole() {
        let dir = tempfile::tempdir().unwrap();
        let mut rows = records(2);
        rows[0].id = 12_345;
        rows[1].id = 123_456_789;

        let generator = generator();
        for record in &rows {
            let id = record.id.to_string();
            let (text, _) = generator.layout().fit_cell(layout::ID_COLUMN, &id);
            assert_eq!(text, id);
        }

        let meta = generator.render(&rows, dir.path().join("ids.pdf")).unwrap();
        assert_eq!(meta.rows, 3);
    }

    #[test]
    fn test_missing_font_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = generator()
            .with_font(Some(dir.path().join("NotoSans.ttf")))
            .render(&records(1), dir.path().join("out.pdf"))
            .unwrap_err();

        assert!(matches!(err, Error::Report { .. }));
        assert!(err.to_string().contains("NotoSans.ttf"));
        assert!(!dir.path().join("out.pdf").exists());
    }

    #[test]
    fn test_unwritable_destination_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.pdf");

        let err = generator().render(&records(1), &path).unwrap_err();
        assert!(err.is_io());
        assert!(matches!(err, Error::ReportWrite { .. }));
    }

    #[test]
    fn test_render_with_subtitle_and_long_values() {
        let dir = tempfile::tempdir().unwrap();
        let mut long = records(1);
        long[0].fields.person = "Abdelkarim Ben Mohammed El Idrissi".to_string();

        let meta = generator()
            .with_title("Rapport")
            .with_subtitle("ADMIN : SOUHAIL")
            .render(&long, dir.path().join("out.pdf"))
            .unwrap();
        assert_eq!(meta.rows, 2);
    }

    #[test]
    fn test_metadata_serializes() {
        let meta = ReportMetadata {
            destination_path: PathBuf::from("anas_vehicles.pdf"),
            size_in_bytes: 2048,
            generated_at: Utc::now(),
            rows: 3,
            pages: 1,
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["size_in_bytes"], 2048);
        assert_eq!(json["rows"], 3);
    }
}
