//! Integration tests for the path store

mod config_loading;
mod shell_transcripts;
mod store_properties;
mod store_scenarios;
