//! Exit code logic for the harvester process.
//!
//! Single responsibility: map a harvest's collected count and failure to the process exit outcome.

use crate::ProcessExit;

/// Determines the process exit outcome from the collected record count and whether the harvest failed.
pub(crate) fn determine_exit_outcome(collected: usize, failed: bool) -> ProcessExit {
    if !failed {
        ProcessExit::Success
    } else if collected > 0 {
        ProcessExit::Partial
    } else {
        ProcessExit::Failure
    }
}

#[cfg(test)]
mod tests {
    use super::determine_exit_outcome;
    use crate::ProcessExit;

    #[test]
    fn test_exit_outcome_success_when_no_failure() {
        assert_eq!(determine_exit_outcome(3, false), ProcessExit::Success);
    }

    #[test]
    fn test_exit_outcome_success_when_nothing_found() {
        assert_eq!(determine_exit_outcome(0, false), ProcessExit::Success);
    }

    #[test]
    fn test_exit_outcome_partial_when_failed_after_collecting() {
        assert_eq!(determine_exit_outcome(2, true), ProcessExit::Partial);
    }

    #[test]
    fn test_exit_outcome_failure_when_nothing_collected() {
        assert_eq!(determine_exit_outcome(0, true), ProcessExit::Failure);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ProcessExit::Success.code(), 0);
        assert_eq!(ProcessExit::Failure.code(), 1);
        assert_eq!(ProcessExit::Partial.code(), 2);
    }
}
