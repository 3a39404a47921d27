//! Schema layer tests
//!
//! Normalization of raw trees: aliases, v3 associations, keys and fatal
//! structural errors.

mod tests_normalize;
