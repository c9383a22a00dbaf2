//! various helper functions used to simplify unit tests.
//!
//! **Note**: This module is only compiled and used during testing.

#[cfg(test)]
pub mod test_helper {
    use log::Level;

    /// Assert that exactly the given warnings have been logged on this thread since `testing_logger::setup()`.
    pub fn check_warnings(expected_warnings: Vec<&str>) {
        testing_logger::validate(|captured_logs| {
            let warnings: Vec<_> = captured_logs
                .iter()
                .filter(|l| l.level == Level::Warn)
                .collect();
            assert_eq!(
                warnings.len(),
                expected_warnings.len(),
                "unexpected warnings: {:?}",
                warnings.iter().map(|l| &l.body).collect::<Vec<_>>()
            );
            for (log, expected) in warnings.iter().zip(expected_warnings.iter()) {
                assert_eq!(log.body, *expected);
            }
        });
    }
}
