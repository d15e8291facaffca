//! Report writers - persist a calendar as `<property_id>.<ext>` in an output directory

pub mod csv;
pub mod sheet;
pub mod xlsx;

pub use self::csv::CsvWriter;
pub use self::xlsx::XlsxWriter;

use crate::ledger::{Calendar, SummaryError};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("csv serialization failed: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("workbook rendering failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("summary totals failed: {0}")]
    Summary(#[from] SummaryError),
}

/// Something that turns a calendar into a report file.
pub trait ReportWriter {
    /// File extension of the written report
    fn extension(&self) -> &'static str;

    /// Directory the report is written into
    fn output_dir(&self) -> &Path;

    /// Serialize the report in memory
    fn render(&self, property_id: u64, calendar: &Calendar) -> Result<Vec<u8>, ReportError>;

    fn output_path(&self, property_id: u64) -> PathBuf {
        self.output_dir()
            .join(format!("{}.{}", property_id, self.extension()))
    }

    /// Render and persist the report, replacing any existing file.
    /// Either the whole file is written or the destination is left untouched.
    fn write(&self, property_id: u64, calendar: &Calendar) -> Result<PathBuf, ReportError> {
        let path = self.output_path(property_id);
        let bytes = self.render(property_id, calendar)?;
        write_atomically(&path, &bytes)?;
        log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

/// Write to a sibling `.tmp` file and rename it over `path`
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    let mut tmp_name = OsString::from(path.as_os_str());
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let result = fs::write(&tmp_path, bytes).and_then(|()| fs::rename(&tmp_path, path));
    if let Err(source) = result {
        // the temp file may not exist if the first write failed
        let _ = fs::remove_file(&tmp_path);
        return Err(ReportError::Io {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}
