//! Property-based test suite

mod registry_proptest;
