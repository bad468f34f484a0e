//! Predicates recognizing well-known message shapes whose level may be overridden.
//!
//! All tests are case-sensitive. The string-only predicates are `false` for non-string messages.

use crate::value::{render, LogValue, DEFAULT_RENDER_DEPTH};

const SERVICE_REQUEST: &str = "Service request";
const TIMEOUT_MARKERS: [&str; 2] = ["4 DEADLINE_EXCEEDED", "14 UNAVAILABLE"];
const ASYNC_ATTRIBUTE_ERROR: &str = "before async attributes settled";
const REGISTERED_GLOBAL: &str = "Registered a global";
const INCOMING_REQUEST: &str = "incomingRequest";

/// `true` iff the message is exactly `"Service request"`.
#[must_use]
pub fn is_service_request_error(message: &LogValue) -> bool {
    message.as_str() == Some(SERVICE_REQUEST)
}

/// `true` iff the rendered message mentions a gRPC timeout status
/// (`4 DEADLINE_EXCEEDED` or `14 UNAVAILABLE`).
///
/// The message is rendered first, so markers nested inside non-string messages are found too.
#[must_use]
pub fn is_timeout(message: &LogValue) -> bool {
    let rendered = render(message, DEFAULT_RENDER_DEPTH);
    TIMEOUT_MARKERS
        .iter()
        .any(|marker| rendered.contains(marker))
}

/// `true` iff the message mentions an access to resource attributes before they settled.
#[must_use]
pub fn is_async_attribute_error(message: &LogValue) -> bool {
    message
        .as_str()
        .is_some_and(|message| message.contains(ASYNC_ATTRIBUTE_ERROR))
}

/// `true` iff the message reports the registration of a global (tracer provider, propagator, ...).
#[must_use]
pub fn is_registered_global_message(message: &LogValue) -> bool {
    message
        .as_str()
        .is_some_and(|message| message.contains(REGISTERED_GLOBAL))
}

/// `true` iff the call carries exactly one argument, a string mentioning `incomingRequest`.
#[must_use]
pub fn is_incoming_request_marker(arguments: &[LogValue]) -> bool {
    match arguments {
        [only] => only
            .as_str()
            .is_some_and(|argument| argument.contains(INCOMING_REQUEST)),
        _ => false,
    }
}
