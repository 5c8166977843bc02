//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the platforms and run the full
//! crawl cycle end-to-end, writing artifacts into temporary directories.

mod classification_tests;
mod common;
mod crawl_tests;
mod platform_tests;
