//! Database integration tests
//!
//! Skipped unless `TEST_DATABASE_URL` points at a PostgreSQL instance the
//! migrations may run against.

mod stores_test;
