//! Lobbying disclosure aggregation.
//!
//! Massachusetts lobbying disclosure totals for funeral-home and cemetery
//! interests, grouped by year.

use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LobbyingError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{0}' not found in lobbying data")]
    MissingColumn(String),
    #[error("No 4-digit year in '{0}'")]
    InvalidYear(String),
}

/// Disclosure report totals, one row per year. The 2025 row is partial.
pub const LOBBYING_CSV: &str = r#"Year,Yearth Funeral Group Inc.,Massachusetts Funeral Directors Association,Affiliated Family Funeral Service Inc.,Massachusetts Cemetery Association,Proprietors of the Cemetery of Mount Auburn,Total
"2025(*Jan-June)",22911,41000,3750,9000,36610,113271
2024,0,92166,0,18000,60000,172190
2023,0,58000,0,16000,60910,136933
2022,0,28000,0,12000,54750,96772
2021,0,28678,0,12000,0,42699
2020,0,14428,0,12000,0,28448
2019,0,14000,0,12000,0,28019
2018,0,10000,0,12000,0,24018
2017,0,14000,0,12000,0,28017
2016,0,14000,0,12000,0,28016
2015,0,14000,0,12000,0,28015
"#;

pub const YEAR_COLUMN: &str = "Year";
pub const FUNERAL_SERIES: &str = "Funeral Group Spending";
pub const CEMETERY_SERIES: &str = "Cemetery Group Spending";

/// Which years and which entity columns make up each group.
#[derive(Debug, Clone)]
pub struct LobbyingConfig {
    pub first_year: i32,
    pub last_year: i32,
    pub funeral_groups: Vec<String>,
    pub cemetery_groups: Vec<String>,
}

impl Default for LobbyingConfig {
    fn default() -> Self {
        Self {
            first_year: 2017,
            last_year: 2024,
            funeral_groups: vec![
                "Yearth Funeral Group Inc.".into(),
                "Massachusetts Funeral Directors Association".into(),
                "Affiliated Family Funeral Service Inc.".into(),
            ],
            cemetery_groups: vec![
                "Massachusetts Cemetery Association".into(),
                "Proprietors of the Cemetery of Mount Auburn".into(),
            ],
        }
    }
}

/// Summed spending of both groups for one year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpendingRow {
    pub year: i32,
    pub funeral: f64,
    pub cemetery: f64,
}

/// First run of four ASCII digits, e.g. `2025` from `"2025(*Jan-June)"`.
pub fn extract_year(text: &str) -> Option<i32> {
    text.as_bytes()
        .windows(4)
        .find(|w| w.iter().all(u8::is_ascii_digit))
        .and_then(|w| std::str::from_utf8(w).ok())
        .and_then(|s| s.parse().ok())
}

/// Year-filtered, per-group sums sorted ascending by year.
pub fn aggregate(
    df: &DataFrame,
    config: &LobbyingConfig,
) -> Result<Vec<SpendingRow>, LobbyingError> {
    let years = year_series(df)?;
    let mut df = df.clone();
    df.with_column(years)?;

    let filtered = df
        .lazy()
        .filter(
            col(YEAR_COLUMN)
                .gt_eq(lit(config.first_year))
                .and(col(YEAR_COLUMN).lt_eq(lit(config.last_year))),
        )
        .collect()?;

    let years = filtered.column(YEAR_COLUMN)?.i32()?.clone();
    let funeral = group_sums(&filtered, &config.funeral_groups)?;
    let cemetery = group_sums(&filtered, &config.cemetery_groups)?;

    let mut rows: Vec<SpendingRow> = years
        .into_iter()
        .zip(funeral)
        .zip(cemetery)
        .filter_map(|((year, funeral), cemetery)| {
            year.map(|year| SpendingRow {
                year,
                funeral,
                cemetery,
            })
        })
        .collect();
    rows.sort_by_key(|row| row.year);

    Ok(rows)
}

fn year_series(df: &DataFrame) -> Result<Series, LobbyingError> {
    let raw = df
        .column(YEAR_COLUMN)
        .map_err(|_| LobbyingError::MissingColumn(YEAR_COLUMN.to_string()))?
        .cast(&DataType::String)?;

    let years = raw
        .str()?
        .into_iter()
        .map(|cell| {
            let cell = cell.unwrap_or_default();
            extract_year(cell).ok_or_else(|| LobbyingError::InvalidYear(cell.to_string()))
        })
        .collect::<Result<Vec<i32>, _>>()?;

    Ok(Series::new(YEAR_COLUMN.into(), years))
}

/// Row-wise sum of `columns`; missing cells count as zero.
fn group_sums(df: &DataFrame, columns: &[String]) -> Result<Vec<f64>, LobbyingError> {
    let mut sums = vec![0.0; df.height()];

    for name in columns {
        let values = df
            .column(name)
            .map_err(|_| LobbyingError::MissingColumn(name.clone()))?
            .cast(&DataType::Float64)?;
        for (sum, v) in sums.iter_mut().zip(values.f64()?.into_iter()) {
            *sum += v.unwrap_or(0.0);
        }
    }

    Ok(sums)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataLoader;

    fn embedded() -> DataFrame {
        let mut loader = DataLoader::new();
        loader.load_csv_str(LOBBYING_CSV).unwrap();
        loader.into_dataframe().unwrap()
    }

    #[test]
    fn extracts_leading_year() {
        assert_eq!(extract_year("2025(*Jan-June)"), Some(2025));
        assert_eq!(extract_year("2019"), Some(2019));
        assert_eq!(extract_year("FY 2018"), Some(2018));
        assert_eq!(extract_year("n/a"), None);
        assert_eq!(extract_year("201"), None);
    }

    #[test]
    fn embedded_data_filters_and_sums() {
        let rows = aggregate(&embedded(), &LobbyingConfig::default()).unwrap();

        let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
        assert_eq!(years, (2017..=2024).collect::<Vec<_>>());

        let last = rows.last().unwrap();
        assert_eq!(last.funeral, 92166.0);
        assert_eq!(last.cemetery, 78000.0);

        let first = rows.first().unwrap();
        assert_eq!(first.funeral, 14000.0);
        assert_eq!(first.cemetery, 12000.0);
    }

    #[test]
    fn partial_year_is_included_when_in_range() {
        let config = LobbyingConfig {
            first_year: 2024,
            last_year: 2025,
            ..LobbyingConfig::default()
        };
        let rows = aggregate(&embedded(), &config).unwrap();
        assert_eq!(
            rows,
            vec![
                SpendingRow {
                    year: 2024,
                    funeral: 92166.0,
                    cemetery: 78000.0
                },
                SpendingRow {
                    year: 2025,
                    funeral: 67661.0,
                    cemetery: 45610.0
                },
            ]
        );
    }

    #[test]
    fn missing_group_column_is_an_error() {
        let config = LobbyingConfig {
            cemetery_groups: vec!["Nobody Inc.".into()],
            ..LobbyingConfig::default()
        };
        let err = aggregate(&embedded(), &config).unwrap_err();
        assert!(matches!(err, LobbyingError::MissingColumn(name) if name == "Nobody Inc."));
    }

    #[test]
    fn row_without_year_is_an_error() {
        let df = df!(
            "Year" => ["2020", "unknown"],
            "A" => [1, 2]
        )
        .unwrap();
        let err = aggregate(&df, &LobbyingConfig::default()).unwrap_err();
        assert!(matches!(err, LobbyingError::InvalidYear(text) if text == "unknown"));
    }
}
