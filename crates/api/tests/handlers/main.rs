mod error_test;
mod health_test;
mod stats_test;
mod test_utils;
