//! Integration tests for arxiv-snapshot

mod crawl_tests;
