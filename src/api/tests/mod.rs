//! Unit tests for the HTTP handlers.

mod support;
