use funeral_charts::charts::{Annotation, CategoryLabels, HybridPlan, Theme};
use funeral_charts::data::lobbying::LobbyingConfig;
use funeral_charts::data::{clean_columns, DataLoader, DataProcessor, LoaderError};
use funeral_charts::pipeline::{
    run_lobbying, run_survey, survey_charts, SurveyConfig, LOBBYING_CHART_FILE,
};
use polars::prelude::DataFrame;
use std::path::Path;
use tempfile::TempDir;

mod common;

fn cleaned_survey(input: &Path) -> DataFrame {
    let mut loader = DataLoader::new();
    loader.load_csv(input).unwrap();
    let mut df = loader.into_dataframe().unwrap();
    DataProcessor::strip_whitespace(&mut df).unwrap();
    clean_columns(&mut df, &SurveyConfig::default().columns_to_clean).unwrap();
    df
}

fn config_for(input: std::path::PathBuf) -> SurveyConfig {
    SurveyConfig {
        input_path: input,
        ..SurveyConfig::default()
    }
}

#[test]
fn test_survey_run_writes_every_chart() {
    let dir = TempDir::new().unwrap();
    let input = common::write_survey_csv(dir.path());
    let config = config_for(input);
    let theme = Theme::default();

    let written = run_survey(&config, &theme, dir.path()).unwrap();

    let expected = survey_charts(&config, &theme);
    assert_eq!(written.len(), expected.len());
    for (path, chart) in written.iter().zip(&expected) {
        assert_eq!(path.file_name().unwrap(), chart.file_name);
        assert_eq!(common::png_dimensions(path), chart.size, "{}", chart.file_name);
    }
}

#[test]
fn test_cleaning_strips_currency_and_category_whitespace() {
    let dir = TempDir::new().unwrap();
    let input = common::write_survey_csv(dir.path());

    let mut loader = DataLoader::new();
    loader.load_csv(&input).unwrap();
    assert_eq!(loader.get_row_count(), common::SURVEY_ROWS.len());
    let mut df = loader.into_dataframe().unwrap();

    DataProcessor::strip_whitespace(&mut df).unwrap();
    let missing = clean_columns(&mut df, &SurveyConfig::default().columns_to_clean).unwrap();
    assert!(missing.is_empty());

    let fees: Vec<Option<f64>> = df
        .column("BasicServicesFee_cleaned")
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(fees[0], Some(1000.0));
    assert_eq!(fees[3], Some(4295.0));

    let pct: Vec<Option<f64>> = df
        .column("DirectCremation_Pct_Change_cleaned")
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(pct[0], Some(5.0));
    assert_eq!(pct[2], None);
    assert_eq!(pct[6], Some(-2.0));

    let owners = df.column("Ownership").unwrap().str().unwrap();
    assert_eq!(owners.get(0), Some("Independent"));
    assert_eq!(owners.get(6), Some("Carriage"));

    let rows = DataProcessor::categorized_values(
        &df,
        "DirectCremationLowestPrice_cleaned",
        "Ownership",
    )
    .unwrap();
    assert_eq!(rows.len(), common::SURVEY_ROWS.len() - 1);
}

#[test]
fn test_missing_input_is_not_found() {
    let dir = TempDir::new().unwrap();
    let config = config_for(dir.path().join("oct10-fh-data.csv"));

    let err = run_survey(&config, &Theme::default(), dir.path()).unwrap_err();
    match err.downcast_ref::<LoaderError>() {
        Some(LoaderError::NotFound(path)) => assert!(path.ends_with("oct10-fh-data.csv")),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert!(!dir.path().join("geographic_distribution.png").exists());
}

#[test]
fn test_missing_column_degrades_to_placeholder() {
    let dir = TempDir::new().unwrap();
    let input = common::write_csv(
        dir.path(),
        "partial.csv",
        "Ownership,Latitude,Longitude",
        &["Independent,42.25,-71.00", "SCI,42.40,-71.20"],
    );

    let mut loader = DataLoader::new();
    let mut df = loader.load_csv(&input).unwrap().clone();
    let missing = clean_columns(&mut df, &SurveyConfig::default().columns_to_clean).unwrap();
    assert_eq!(
        missing,
        vec![
            "BasicServicesFee",
            "DirectCremationLowestPrice",
            "DirectCremation_Pct_Change",
            "ImmediateBurialLowestPrice",
        ]
    );

    let plan = HybridPlan::from_frame(
        &df,
        "BasicServicesFee_cleaned",
        "Ownership",
        &CategoryLabels::default(),
    )
    .unwrap();
    assert!(plan.is_none());
    assert!(DataProcessor::numeric_values(&df, "DirectCremationLowestPrice_cleaned")
        .unwrap()
        .is_empty());

    let config = config_for(input);
    let written = run_survey(&config, &Theme::default(), dir.path()).unwrap();
    assert_eq!(written.len(), 8);
    let expected = survey_charts(&config, &Theme::default());
    for (path, chart) in written.iter().zip(&expected) {
        assert_eq!(common::png_dimensions(path), chart.size, "{}", chart.file_name);
    }
}

#[test]
fn test_hybrid_plan_from_cleaned_survey() {
    let dir = TempDir::new().unwrap();
    let input = common::write_survey_csv(dir.path());
    let df = cleaned_survey(&input);

    let plan = HybridPlan::from_frame(
        &df,
        "BasicServicesFee_cleaned",
        "Ownership",
        &CategoryLabels::default(),
    )
    .unwrap()
    .unwrap();

    assert_eq!(
        plan.categories,
        vec!["Carriage", "FPG Beers & Story", "Independent", "SCI"]
    );
    let violin = plan.violin.as_ref().unwrap();
    assert_eq!(violin.center, 2.0);
    assert!(violin.values.contains(&1000.0));
    assert_eq!(violin.values.len(), 3);
    assert_eq!(
        plan.annotations[1],
        Annotation::Single {
            x: 1.0,
            value: 2495.0
        }
    );
    assert!(matches!(plan.annotations[2], Annotation::Summary { .. }));
}

#[test]
fn test_late_percentage_cell_is_cleaned() {
    let dir = TempDir::new().unwrap();
    let mut rows = vec!["Independent,5"; 10_500];
    rows.push("Independent,12%");
    let input = common::write_csv(
        dir.path(),
        "late.csv",
        "Ownership,DirectCremation_Pct_Change",
        &rows,
    );

    let df = cleaned_survey(&input);
    let pct = df
        .column("DirectCremation_Pct_Change_cleaned")
        .unwrap()
        .f64()
        .unwrap();
    assert_eq!(pct.len(), 10_501);
    assert_eq!(pct.get(0), Some(5.0));
    assert_eq!(pct.get(10_500), Some(12.0));
}

#[test]
fn test_lobbying_run_writes_portrait_chart() {
    let dir = TempDir::new().unwrap();

    let path = run_lobbying(&LobbyingConfig::default(), &Theme::default(), dir.path()).unwrap();

    assert_eq!(path, dir.path().join(LOBBYING_CHART_FILE));
    assert_eq!(common::png_dimensions(&path), (800, 1000));
}

#[test]
fn test_empty_lobbying_range_still_renders() {
    let dir = TempDir::new().unwrap();
    let config = LobbyingConfig {
        first_year: 1990,
        last_year: 1991,
        ..LobbyingConfig::default()
    };

    let path = run_lobbying(&config, &Theme::default(), dir.path()).unwrap();
    assert!(path.exists());
}
