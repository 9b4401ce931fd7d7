//! Property-based test suite entry point.
