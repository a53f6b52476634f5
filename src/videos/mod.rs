pub mod ingest;
pub mod models;
pub mod storage;
pub mod views;
