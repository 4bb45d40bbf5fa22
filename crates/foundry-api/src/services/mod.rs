//! Service layer for foundry-api.

pub mod report;

pub use report::ReportService;
