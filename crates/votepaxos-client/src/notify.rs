//! Runs an operator action and reports its outcome as exactly one toast.

use std::future::{Future, Ready};

use parking_lot::Mutex;
use serde_json::Value;
use tracing::warn;

use crate::error::ActionError;

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Action completed successfully.";
pub const DEFAULT_FAILURE_MESSAGE: &str = "There was a problem performing that action.";
pub const INVALID_ACTION_MESSAGE: &str = "Invalid action: there is nothing to perform.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Success,
    Danger,
}

impl Intent {
    pub fn icon(self) -> &'static str {
        match self {
            Intent::Success => "✔",
            Intent::Danger => "✖",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub intent: Intent,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            intent: Intent::Success,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            intent: Intent::Danger,
            message: message.into(),
        }
    }
}

/// Where toasts are displayed.
pub trait Toaster: Send + Sync {
    fn show(&self, toast: &Toast);
}

/// Keeps every toast it is shown; useful in tests and headless runs.
#[derive(Debug, Default)]
pub struct RecordingToaster {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingToaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().clone()
    }
}

impl Toaster for RecordingToaster {
    fn show(&self, toast: &Toast) {
        self.toasts.lock().push(toast.clone());
    }
}

#[derive(Debug, Clone)]
pub struct NotifyOptions {
    pub success_message: String,
    pub failure_message: String,
    /// A string returned by the action replaces `success_message`.
    pub success_from_return_value: bool,
    /// A falsy return value counts as failure even though nothing was raised.
    pub falsy_is_failure: bool,
}

impl Default for NotifyOptions {
    fn default() -> Self {
        Self {
            success_message: DEFAULT_SUCCESS_MESSAGE.to_string(),
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
            success_from_return_value: false,
            falsy_is_failure: false,
        }
    }
}

impl NotifyOptions {
    pub fn new(success_message: impl Into<String>) -> Self {
        Self {
            success_message: success_message.into(),
            ..Self::default()
        }
    }

    pub fn with_failure(mut self, failure_message: impl Into<String>) -> Self {
        self.failure_message = failure_message.into();
        self
    }

    pub fn success_from_return_value(mut self) -> Self {
        self.success_from_return_value = true;
        self
    }

    pub fn falsy_is_failure(mut self) -> Self {
        self.falsy_is_failure = true;
        self
    }
}

/// Return values an action may produce, judged the way the notification
/// wrapper needs: truthiness and an optional message.
pub trait ActionValue {
    fn is_truthy(&self) -> bool;

    fn as_message(&self) -> Option<String> {
        None
    }
}

impl ActionValue for Value {
    fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(flag) => *flag,
            Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
            Value::String(text) => !text.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    fn as_message(&self) -> Option<String> {
        self.as_str().map(str::to_string)
    }
}

impl ActionValue for () {
    fn is_truthy(&self) -> bool {
        false
    }
}

impl ActionValue for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl ActionValue for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }

    fn as_message(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl ActionValue for &str {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }

    fn as_message(&self) -> Option<String> {
        Some((*self).to_string())
    }
}

impl<T: ActionValue> ActionValue for Option<T> {
    fn is_truthy(&self) -> bool {
        self.as_ref().map(ActionValue::is_truthy).unwrap_or(false)
    }

    fn as_message(&self) -> Option<String> {
        self.as_ref().and_then(ActionValue::as_message)
    }
}

/// Type to name when calling [`perform_then_notify`] without an action.
pub type NoAction = fn() -> Ready<Result<Value, ActionError>>;

/// Executes `action` and shows one success or danger toast describing the
/// outcome. Errors are swallowed after display; the shown toast is returned.
pub async fn perform_then_notify<F, Fut, T>(
    toaster: &dyn Toaster,
    action: Option<F>,
    options: &NotifyOptions,
) -> Toast
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ActionError>>,
    T: ActionValue,
{
    let outcome = match action {
        None => Err(ActionError::InvalidAction(INVALID_ACTION_MESSAGE.to_string())),
        Some(action) => match action().await {
            Ok(value) if options.falsy_is_failure && !value.is_truthy() => {
                Err(ActionError::InvalidAction(options.failure_message.clone()))
            }
            other => other,
        },
    };

    let toast = match outcome {
        Ok(value) => {
            let message = if options.success_from_return_value {
                value.as_message()
            } else {
                None
            };
            Toast::success(message.unwrap_or_else(|| options.success_message.clone()))
        }
        Err(err) => {
            warn!(target: "votepaxos::notify", error = %err, "action failed");
            Toast::danger(err.user_message(&options.failure_message))
        }
    };
    toaster.show(&toast);
    toast
}
