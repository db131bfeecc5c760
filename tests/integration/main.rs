//! Integration tests for Blub Crawler

mod crawl_tests;
mod orchestrator_tests;
