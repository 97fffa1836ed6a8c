use std::time::Duration;

use super::BackendError;

/// Provider error codes that will fail the same way on every attempt: auth and validation.
pub const NON_RETRYABLE_CODES: [&str; 4] = [
    "UnauthorizedOperation",
    "InvalidParameterValue",
    "ValidationException",
    "AccessDeniedException",
];

/// Delay before retrying after `attempt` (1-indexed) failed: `base * 2^(attempt - 1)`.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    base.saturating_mul(1 << exponent)
}

impl BackendError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::Network(_) => true,
            Self::Provider { code, message } => !NON_RETRYABLE_CODES
                .iter()
                .any(|&known| code == known || message.contains(known)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_doubles_per_attempt() {
        let base = Duration::from_secs(1);
        assert_eq!(backoff_delay(base, 1), Duration::from_secs(1));
        assert_eq!(backoff_delay(base, 2), Duration::from_secs(2));
        assert_eq!(backoff_delay(base, 3), Duration::from_secs(4));
        assert_eq!(backoff_delay(Duration::ZERO, 3), Duration::ZERO);
    }

    #[test]
    fn classification() {
        assert!(BackendError::Timeout.is_retryable());
        assert!(BackendError::Network("connection reset".into()).is_retryable());
        assert!(
            BackendError::Provider {
                code: "ThrottlingException".into(),
                message: "Rate exceeded".into(),
            }
            .is_retryable()
        );

        for code in NON_RETRYABLE_CODES {
            let err = BackendError::Provider {
                code: code.into(),
                message: "denied".into(),
            };
            assert!(!err.is_retryable(), "{code}");
        }

        let wrapped = BackendError::Provider {
            code: "Unknown".into(),
            message: "upstream said ValidationException: bad body".into(),
        };
        assert!(!wrapped.is_retryable());
    }
}
