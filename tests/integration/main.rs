//! Integration tests

mod e2e_test;
mod flatten_test;
mod market_data_test;
