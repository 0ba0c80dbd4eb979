//! Realtime integration tests

mod backpressure_test;
mod churn_test;
