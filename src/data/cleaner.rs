//! Numeric cleaning for survey columns such as `"$1,234.50"` or `"12%"`.

use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Suffix appended to the name of every cleaned column.
pub const CLEANED_SUFFIX: &str = "_cleaned";

/// Tokens that mean "no usable value" after symbol stripping and trimming.
const MISSING_TOKENS: [&str; 3] = ["", "N/A", "nan"];

/// Name of the cleaned counterpart of `column`.
pub fn cleaned_name(column: &str) -> String {
    format!("{column}{CLEANED_SUFFIX}")
}

/// True for every integer and float dtype.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Clean one text cell into a finite number.
pub fn clean_cell(raw: &str) -> Option<f64> {
    let stripped: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%'))
        .collect();
    let trimmed = stripped.trim();
    if MISSING_TOKENS.contains(&trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Clean a whole column into `Float64`.
///
/// Already-numeric columns are returned unchanged. Null cells are coerced to
/// the text `"nan"` first, so they come out null as well.
pub fn clean_numeric_column(series: &Series) -> Result<Series, CleanerError> {
    if is_numeric_dtype(series.dtype()) {
        return Ok(series.clone());
    }

    let text = series.cast(&DataType::String)?;
    let cleaned: Float64Chunked = text
        .str()?
        .into_iter()
        .map(|cell| clean_cell(cell.unwrap_or("nan")))
        .collect();

    Ok(cleaned.with_name(series.name().clone()).into_series())
}

/// Append a `<col>_cleaned` column for each of `columns` present in `df`.
///
/// Returns the names that were not found; those are skipped.
pub fn clean_columns(df: &mut DataFrame, columns: &[String]) -> Result<Vec<String>, CleanerError> {
    let mut missing = Vec::new();

    for column in columns {
        let cleaned = match df.column(column) {
            Ok(col) => clean_numeric_column(col.as_materialized_series())?,
            Err(_) => {
                missing.push(column.clone());
                continue;
            }
        };
        debug!(
            column = column.as_str(),
            nulls = cleaned.null_count(),
            "cleaned numeric column"
        );
        df.with_column(cleaned.with_name(cleaned_name(column).into()))?;
    }

    Ok(missing)
}
