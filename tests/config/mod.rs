//! Configuration tests

mod tests_config;
