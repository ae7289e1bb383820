//! Exit code constants for the malboxes CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unknown template, refused overwrite)
//! - 2: Validation failure (configuration or profile rejected)
//! - 3: Template failure (syntax error or unresolved placeholder)
//! - 4: Filesystem failure

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or invalid state.
pub const USER_ERROR: i32 = 1;

/// Validation failure: malformed document or schema violation.
pub const VALIDATION_FAILURE: i32 = 2;

/// Template failure: bad template syntax or a placeholder with no value.
pub const TEMPLATE_FAILURE: i32 = 3;

/// Filesystem failure: a read or write did not complete.
pub const IO_FAILURE: i32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [SUCCESS, USER_ERROR, VALIDATION_FAILURE, TEMPLATE_FAILURE, IO_FAILURE];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn test_exit_codes_have_expected_values() {
        assert_eq!(SUCCESS, 0);
        assert_eq!(USER_ERROR, 1);
        assert_eq!(VALIDATION_FAILURE, 2);
        assert_eq!(TEMPLATE_FAILURE, 3);
        assert_eq!(IO_FAILURE, 4);
    }
}
