//! Data Processor Module
//! Handles text sanitizing and extraction of plot-ready rows.

use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// One row with a category and a single value.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorizedValue {
    pub category: String,
    pub value: f64,
}

/// One row with a category and an (x, y) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorizedPoint {
    pub category: String,
    pub x: f64,
    pub y: f64,
}

/// Handles data cleaning and row extraction operations.
///
/// Extraction never fails on a missing column: an absent column behaves as
/// an all-null column, so dependent charts fall back to their placeholder.
pub struct DataProcessor;

impl DataProcessor {
    /// Trim leading/trailing whitespace in every text column.
    pub fn strip_whitespace(df: &mut DataFrame) -> Result<(), ProcessorError> {
        let text_columns: Vec<PlSmallStr> = df
            .get_columns()
            .iter()
            .filter(|col| col.dtype() == &DataType::String)
            .map(|col| col.name().clone())
            .collect();

        for name in text_columns {
            let trimmed: StringChunked = df
                .column(name.as_str())?
                .str()?
                .into_iter()
                .map(|v| v.map(str::trim))
                .collect();
            df.with_column(trimmed.with_name(name).into_series())?;
        }

        Ok(())
    }

    /// Non-null, non-NaN values of a column, in row order.
    pub fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<f64>, ProcessorError> {
        let Some(values) = Self::float_column(df, column)? else {
            return Ok(Vec::new());
        };

        Ok(values
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .collect())
    }

    /// Rows where both the value and the category are present.
    pub fn categorized_values(
        df: &DataFrame,
        value_col: &str,
        category_col: &str,
    ) -> Result<Vec<CategorizedValue>, ProcessorError> {
        let (Some(values), Some(categories)) = (
            Self::float_column(df, value_col)?,
            Self::text_column(df, category_col)?,
        ) else {
            return Ok(Vec::new());
        };

        Ok(values
            .into_iter()
            .zip(categories.into_iter())
            .filter_map(|(v, c)| match (v, c) {
                (Some(v), Some(c)) if !v.is_nan() => Some(CategorizedValue {
                    category: c.to_string(),
                    value: v,
                }),
                _ => None,
            })
            .collect())
    }

    /// Rows where x, y and the category are all present.
    pub fn categorized_points(
        df: &DataFrame,
        x_col: &str,
        y_col: &str,
        category_col: &str,
    ) -> Result<Vec<CategorizedPoint>, ProcessorError> {
        let (Some(xs), Some(ys), Some(categories)) = (
            Self::float_column(df, x_col)?,
            Self::float_column(df, y_col)?,
            Self::text_column(df, category_col)?,
        ) else {
            return Ok(Vec::new());
        };

        Ok(xs
            .into_iter()
            .zip(ys.into_iter())
            .zip(categories.into_iter())
            .filter_map(|((x, y), c)| match (x, y, c) {
                (Some(x), Some(y), Some(c)) if !x.is_nan() && !y.is_nan() => {
                    Some(CategorizedPoint {
                        category: c.to_string(),
                        x,
                        y,
                    })
                }
                _ => None,
            })
            .collect())
    }

    /// Distinct categories in lexicographic order.
    pub fn sorted_categories<'a, I>(categories: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut groups: Vec<String> = categories.into_iter().map(str::to_string).collect();
        groups.sort();
        groups.dedup();
        groups
    }

    fn float_column(df: &DataFrame, name: &str) -> Result<Option<Float64Chunked>, ProcessorError> {
        let Ok(column) = df.column(name) else {
            return Ok(None);
        };
        let cast = column.cast(&DataType::Float64)?;
        Ok(Some(cast.f64()?.clone()))
    }

    fn text_column(df: &DataFrame, name: &str) -> Result<Option<StringChunked>, ProcessorError> {
        let Ok(column) = df.column(name) else {
            return Ok(None);
        };
        let cast = column.cast(&DataType::String)?;
        Ok(Some(cast.str()?.clone()))
    }
}
