//! Result export: one record and its prediction as a single-row CSV.

use std::fs;
use std::path::PathBuf;

use crate::domain::schema::{ORCHARD_COLUMN, VARIETY_COLUMN};
use crate::domain::{InputRecord, PredictionResult};
use crate::HullRotError;

/// File name of the exported CSV.
pub const EXPORT_FILE_NAME: &str = "hr_risk_prediction.csv";

/// Media type of the exported CSV.
pub const EXPORT_CONTENT_TYPE: &str = "text/csv";

const PROBABILITY_COLUMN: &str = "Predicted Risk Probability";
const RISK_LEVEL_COLUMN: &str = "Risk Level";

/// Header and values of the exported row.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub header: Vec<String>,
    pub values: Vec<String>,
}

impl ExportRow {
    /// Flatten a record and its result.
    ///
    /// Numeric fields follow record order; the probability is rounded to
    /// 3 decimals and the tier is the one shown on screen.
    #[must_use]
    pub fn new(record: &InputRecord, result: &PredictionResult) -> Self {
        let specs = record.schema().numeric_fields();

        let mut header = Vec::with_capacity(specs.len() + 4);
        header.push(ORCHARD_COLUMN.to_string());
        header.push(VARIETY_COLUMN.to_string());
        header.extend(specs.iter().map(|spec| spec.label.to_string()));
        header.push(PROBABILITY_COLUMN.to_string());
        header.push(RISK_LEVEL_COLUMN.to_string());

        let mut values = Vec::with_capacity(header.len());
        values.push(record.orchard.clone());
        values.push(record.variety.clone());
        values.extend(record.measurements.to_vec().iter().map(f64::to_string));
        values.push(result.rounded_probability().to_string());
        values.push(result.risk_tier.label().to_string());

        Self { header, values }
    }
}

/// Serializes prediction results for download.
#[derive(Debug, Clone)]
pub struct ResultExporter {
    dir: PathBuf,
}

impl ResultExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// CSV bytes: one header row, one data row.
    ///
    /// # Errors
    /// Returns error if CSV serialization fails.
    pub fn to_csv_bytes(
        record: &InputRecord,
        result: &PredictionResult,
    ) -> Result<Vec<u8>, HullRotError> {
        let row = ExportRow::new(record, result);

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&row.header)?;
        writer.write_record(&row.values)?;
        writer
            .into_inner()
            .map_err(|e| HullRotError::Io(e.into_error()))
    }

    /// Write the CSV into the export directory, replacing any previous export.
    ///
    /// # Errors
    /// Returns error if serialization or the file write fails.
    pub fn write(
        &self,
        record: &InputRecord,
        result: &PredictionResult,
    ) -> Result<PathBuf, HullRotError> {
        let bytes = Self::to_csv_bytes(record, result)?;

        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(EXPORT_FILE_NAME);
        fs::write(&path, bytes)?;

        tracing::info!(
            "Exported prediction ({}) to {}",
            EXPORT_CONTENT_TYPE,
            path.display()
        );
        Ok(path)
    }
}
