//! Exit codes for the CLI
//!
//! | Code | Constant | Meaning |
//! |------|----------|---------|
//! | 0 | `SUCCESS` | Run completed (findings or not) |
//! | 3 | `ERROR` | Setup or runtime error (missing rules, bad config) |
//! | 4 | `INVALID_ARGS` | Invalid command-line arguments |
//! | 5 | `PERSISTENCE_FAILED` | Audit log write failed; exports were still written |

/// Run completed. Findings are not an error.
pub const SUCCESS: i32 = 0;

/// Runtime error.
///
/// Used when:
/// - A rule file is missing or invalid
/// - The configuration file cannot be read or parsed
/// - Exports cannot be written
pub const ERROR: i32 = 3;

/// Invalid arguments (unknown regime, malformed flag values).
pub const INVALID_ARGS: i32 = 4;

/// The audit log could not be written.
pub const PERSISTENCE_FAILED: i32 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [SUCCESS, ERROR, INVALID_ARGS, PERSISTENCE_FAILED];
        for i in 0..codes.len() {
            for j in (i + 1)..codes.len() {
                assert_ne!(
                    codes[i], codes[j],
                    "Exit codes should be unique: {} and {} are both {}",
                    i, j, codes[i]
                );
            }
        }
    }

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(SUCCESS, 0);
        assert_eq!(ERROR, 3);
        assert_eq!(INVALID_ARGS, 4);
        assert_eq!(PERSISTENCE_FAILED, 5);
    }
}
