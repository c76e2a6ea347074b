//! Process exit codes
//!
//! Scripts wrapping s3cm rely on these values; changing one is a breaking change.

use s3cm_core::Error;

/// How an s3cm process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Session ended through the exit menu option
    Success = 0,
    GeneralError = 1,
    /// Configuration file could not be parsed or is invalid
    UsageError = 2,
    NetworkError = 3,
    /// Missing credentials, or the service refused them
    AuthError = 4,
    /// Bucket or object does not exist
    NotFound = 5,
    /// Bucket name or object key already taken
    Conflict = 6,
    /// Input ended before the session was exited
    Interrupted = 130,
}

impl ExitCode {
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Map a raw code back to a known variant
    pub const fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::GeneralError),
            2 => Some(Self::UsageError),
            3 => Some(Self::NetworkError),
            4 => Some(Self::AuthError),
            5 => Some(Self::NotFound),
            6 => Some(Self::Conflict),
            130 => Some(Self::Interrupted),
            _ => None,
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        Self::from_i32(err.exit_code()).unwrap_or(Self::GeneralError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_i32() {
        for code in [
            ExitCode::Success,
            ExitCode::GeneralError,
            ExitCode::UsageError,
            ExitCode::NetworkError,
            ExitCode::AuthError,
            ExitCode::NotFound,
            ExitCode::Conflict,
            ExitCode::Interrupted,
        ] {
            assert_eq!(ExitCode::from_i32(code.as_i32()), Some(code));
        }
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
        assert_eq!(ExitCode::from_i32(7), None);
    }

    #[test]
    fn test_core_errors_map_to_codes() {
        assert_eq!(
            ExitCode::from(&Error::Credentials("missing".into())),
            ExitCode::AuthError
        );
        assert_eq!(
            ExitCode::from(&Error::Config("bad".into())),
            ExitCode::UsageError
        );
        assert_eq!(
            ExitCode::from(&Error::Conflict("taken".into())),
            ExitCode::Conflict
        );
        assert_eq!(
            ExitCode::from(&Error::NotFound("k".into())),
            ExitCode::NotFound
        );
        assert_eq!(
            ExitCode::from(&Error::General("x".into())),
            ExitCode::GeneralError
        );
    }
}
