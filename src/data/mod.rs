//! Data module - CSV loading, cleaning and aggregation

mod cleaner;
mod loader;
pub mod lobbying;
mod processor;

pub use cleaner::{
    clean_cell, clean_columns, clean_numeric_column, cleaned_name, is_numeric_dtype,
    CleanerError, CLEANED_SUFFIX,
};
pub use loader::{DataLoader, LoaderError};
pub use processor::{CategorizedPoint, CategorizedValue, DataProcessor, ProcessorError};
