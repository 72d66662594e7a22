use serde::Serialize;
use std::fmt;

pub const DEFAULT_SUCCESS_MESSAGE: &str = "success";
pub const DEFAULT_FAILURE_MESSAGE: &str = "failure";

/// Binary status of an [`Outcome`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failure,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => f.write_str("success"),
            Status::Failure => f.write_str("failure"),
        }
    }
}

/// Why an operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Input path was empty or blank
    EmptyPath,

    /// No segments survived normalization
    InvalidPath,

    /// Entry exists but as the other kind (file vs directory)
    NameCollision,

    /// Host filesystem refused to create the entry
    CreationFailed,

    /// Host filesystem refused to delete the entry
    DeletionFailed,

    /// Rendering callback returned an error before any output was written
    RenderFailed,

    /// Rendered content could not be written to its target
    WriteFailed,

    /// Source file could not be opened or read
    ReadFailed,

    /// Content could not be (de)serialized
    Malformed,

    /// Failure without a more specific reason
    Unspecified,
}

/// Uniform success/failure envelope returned by every operation in this crate.
///
/// An `Outcome` can only be built through its success or failure constructors, so
/// there is no half-initialized state: a value that was never marked successful
/// (including [`Outcome::default`]) is a failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Outcome<T> {
    state: State<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum State<T> {
    Success {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<T>,
    },
    Failure {
        kind: FailureKind,
        message: String,
    },
}

impl<T> Outcome<T> {
    /// Successful outcome with an optional payload and message.
    /// A missing message falls back to [`DEFAULT_SUCCESS_MESSAGE`].
    pub fn mark_success(payload: Option<T>, message: Option<String>) -> Self {
        Self {
            state: State::Success {
                message: message.unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
                payload,
            },
        }
    }

    /// Failed outcome of unspecified kind.
    /// A missing message falls back to [`DEFAULT_FAILURE_MESSAGE`].
    pub fn mark_failure(message: Option<String>) -> Self {
        Self {
            state: State::Failure {
                kind: FailureKind::Unspecified,
                message: message.unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
            },
        }
    }

    pub fn success() -> Self {
        Self::mark_success(None, None)
    }

    pub fn success_with(payload: T) -> Self {
        Self::mark_success(Some(payload), None)
    }

    pub fn success_msg(message: impl Into<String>) -> Self {
        Self::mark_success(None, Some(message.into()))
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            state: State::Failure {
                kind,
                message: message.into(),
            },
        }
    }

    pub fn status(&self) -> Status {
        match self.state {
            State::Success { .. } => Status::Success,
            State::Failure { .. } => Status::Failure,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() == Status::Success
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn message(&self) -> &str {
        match &self.state {
            State::Success { message, .. } | State::Failure { message, .. } => message,
        }
    }

    /// Failure kind, `None` on success
    pub fn kind(&self) -> Option<FailureKind> {
        match self.state {
            State::Success { .. } => None,
            State::Failure { kind, .. } => Some(kind),
        }
    }

    pub fn payload(&self) -> Option<&T> {
        match &self.state {
            State::Success { payload, .. } => payload.as_ref(),
            State::Failure { .. } => None,
        }
    }

    pub fn into_payload(self) -> Option<T> {
        match self.state {
            State::Success { payload, .. } => payload,
            State::Failure { .. } => None,
        }
    }

    /// Transform the payload of a successful outcome, keeping its message.
    /// Failures pass through untouched.
    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self.state {
            State::Success { message, payload } => {
                Outcome::mark_success(payload.map(f), Some(message))
            }
            State::Failure { kind, message } => Outcome::failure(kind, message),
        }
    }

    /// Convert into an `anyhow` result for callers that propagate with `?`
    pub fn into_result(self) -> anyhow::Result<Option<T>> {
        match self.state {
            State::Success { payload, .. } => Ok(payload),
            State::Failure { kind, message } => Err(anyhow::anyhow!("{:?}: {}", kind, message)),
        }
    }
}

impl<T> Default for Outcome<T> {
    fn default() -> Self {
        Self::mark_failure(None)
    }
}

impl<T> fmt::Display for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status(), self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_outcome_is_failure() {
        let outcome: Outcome<()> = Outcome::default();

        assert!(!outcome.is_success());
        assert_eq!(outcome.status(), Status::Failure);
        assert_eq!(outcome.message(), DEFAULT_FAILURE_MESSAGE);
        assert_eq!(outcome.kind(), Some(FailureKind::Unspecified));
    }

    #[test]
    fn test_mark_success_defaults() {
        let outcome: Outcome<String> = Outcome::mark_success(None, None);

        assert!(outcome.is_success());
        assert_eq!(outcome.message(), DEFAULT_SUCCESS_MESSAGE);
        assert!(outcome.payload().is_none());
        assert!(outcome.kind().is_none());
    }

    #[test]
    fn test_mark_success_with_payload_and_message() {
        let outcome = Outcome::mark_success(Some("{}".to_string()), Some("loaded".to_string()));

        assert!(outcome.is_success());
        assert_eq!(outcome.message(), "loaded");
        assert_eq!(outcome.payload().map(String::as_str), Some("{}"));
        assert_eq!(outcome.into_payload(), Some("{}".to_string()));
    }

    #[test]
    fn test_mark_failure_message() {
        let outcome: Outcome<u32> = Outcome::mark_failure(Some("disk full".to_string()));

        assert!(outcome.is_failure());
        assert_eq!(outcome.message(), "disk full");
        assert!(outcome.payload().is_none());
    }

    #[test]
    fn test_status_compares_by_value() {
        // Rebuilt statuses must compare equal to the ones the outcome reports
        let rebuilt = [Status::Success, Status::Failure];
        assert_eq!(Outcome::<()>::success().status(), rebuilt[0]);
        assert_eq!(Outcome::<()>::default().status(), rebuilt[1]);
    }

    #[test]
    fn test_map_keeps_message_and_failures() {
        let doubled = Outcome::mark_success(Some(21), Some("half".to_string())).map(|n| n * 2);
        assert_eq!(doubled.payload(), Some(&42));
        assert_eq!(doubled.message(), "half");

        let failed: Outcome<i32> = Outcome::failure(FailureKind::ReadFailed, "gone");
        let mapped = failed.map(|n| n.to_string());
        assert_eq!(mapped.kind(), Some(FailureKind::ReadFailed));
        assert_eq!(mapped.message(), "gone");
    }

    #[test]
    fn test_into_result() {
        assert_eq!(Outcome::success_with(7).into_result().unwrap(), Some(7));

        let err = Outcome::<()>::failure(FailureKind::NameCollision, "a/b/ is a file")
            .into_result()
            .unwrap_err();
        assert!(err.to_string().contains("a/b/ is a file"));
    }

    #[test]
    fn test_serialization_is_tagged() {
        let ok = serde_json::to_value(Outcome::success_with(3)).unwrap();
        assert_eq!(ok["status"], "success");
        assert_eq!(ok["payload"], 3);
        assert_eq!(ok["message"], DEFAULT_SUCCESS_MESSAGE);

        let empty = serde_json::to_value(Outcome::<u8>::success()).unwrap();
        assert!(empty.get("payload").is_none());

        let failed =
            serde_json::to_value(Outcome::<u8>::failure(FailureKind::EmptyPath, "path is empty"))
                .unwrap();
        assert_eq!(failed["status"], "failure");
        assert_eq!(failed["kind"], "empty_path");
        assert_eq!(failed["message"], "path is empty");
    }

    #[test]
    fn test_display() {
        let outcome = Outcome::<()>::success_msg("nothing to delete");
        assert_eq!(outcome.to_string(), "success: nothing to delete");
    }
}
