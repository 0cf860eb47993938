//! Unit tests for settings loading.
