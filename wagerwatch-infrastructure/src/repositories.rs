pub mod csv_columns;
pub mod csv_provider;
pub mod csv_report_repository;

pub use csv_provider::*;
pub use csv_report_repository::*;
