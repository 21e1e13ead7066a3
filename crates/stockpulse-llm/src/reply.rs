use crate::error::LlmError;

/// Outcome of asking a collaborator for a structured judgment.
///
/// Failures carry a human-readable reason so the caller can record why a
/// default was substituted.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    Parsed(T),
    Failed(String),
}

impl<T> Reply<T> {
    /// Fold a transport result and a parser into a reply.
    pub fn from_result<R, P>(result: Result<R, LlmError>, parse: P) -> Self
    where
        P: FnOnce(R) -> Result<T, String>,
    {
        match result {
            Ok(raw) => match parse(raw) {
                Ok(value) => Reply::Parsed(value),
                Err(reason) => Reply::Failed(reason),
            },
            Err(e) => Reply::Failed(e.to_string()),
        }
    }

    /// The parsed value, or the fallback built from the failure reason.
    pub fn or_fallback<F>(self, fallback: F) -> T
    where
        F: FnOnce(&str) -> T,
    {
        match self {
            Reply::Parsed(value) => value,
            Reply::Failed(reason) => {
                tracing::warn!(reason = %reason, "collaborator reply unusable, using fallback");
                fallback(&reason)
            }
        }
    }

    #[must_use]
    pub fn is_parsed(&self) -> bool {
        matches!(self, Reply::Parsed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_value_is_kept() {
        let reply: Reply<u8> = Reply::from_result(Ok("4"), |s: &str| {
            s.parse::<u8>().map_err(|e| e.to_string())
        });
        assert!(reply.is_parsed());
        assert_eq!(reply.or_fallback(|_| 0), 4);
    }

    #[test]
    fn parse_failure_reaches_fallback_with_reason() {
        let reply: Reply<u8> =
            Reply::from_result(Ok("x"), |_: &str| Err("not a number".to_string()));
        let value = reply.or_fallback(|reason| {
            assert_eq!(reason, "not a number");
            9
        });
        assert_eq!(value, 9);
    }

    #[test]
    fn transport_failure_becomes_failed() {
        let reply: Reply<u8> =
            Reply::from_result(Err::<&str, _>(LlmError::EmptyCompletion), |_| Ok(1));
        assert!(matches!(reply, Reply::Failed(ref r) if r.contains("no message content")));
    }
}
