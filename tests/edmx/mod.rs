//! EDMX reader tests, end to end through resolution.

mod tests_edmx;
