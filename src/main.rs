//! Funeral Charts - survey chart generator
//!
//! Reads `oct10-fh-data.csv` from the working directory and writes the
//! eight survey charts next to it as PNG files.

use funeral_charts::charts::Theme;
use funeral_charts::data::LoaderError;
use funeral_charts::logging;
use funeral_charts::pipeline::{run_survey, SurveyConfig};
use std::path::Path;

fn main() {
    logging::init();

    let config = SurveyConfig::default();
    match run_survey(&config, &Theme::default(), Path::new(".")) {
        Ok(_) => println!("Plots have been saved to the script's directory as PNG files."),
        Err(err) => match err.downcast_ref::<LoaderError>() {
            Some(LoaderError::NotFound(path)) => println!(
                "Error: '{}' not found. Please ensure it's in the same directory.",
                path.display()
            ),
            _ => println!("An unexpected error occurred: {err:#}"),
        },
    }
}
