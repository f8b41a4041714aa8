//! Lobbying spending chart
//!
//! Aggregates the embedded disclosure records and writes
//! `spending_over_time_portrait.png` to the working directory.

use funeral_charts::charts::Theme;
use funeral_charts::data::lobbying::LobbyingConfig;
use funeral_charts::logging;
use funeral_charts::pipeline::{run_lobbying, LOBBYING_CHART_FILE};
use std::path::Path;

fn main() {
    logging::init();

    let config = LobbyingConfig::default();
    match run_lobbying(&config, &Theme::default(), Path::new(".")) {
        Ok(_) => println!(
            "The line chart has been generated and saved as '{LOBBYING_CHART_FILE}'."
        ),
        Err(err) => println!("An unexpected error occurred: {err:#}"),
    }
}
