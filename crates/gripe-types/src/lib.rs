pub mod data_url;
pub mod models;
pub mod report;
