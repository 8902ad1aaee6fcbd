use platform_host::ReplyError;

const MISSING_CREDENTIAL: &str =
    "I can't reply right now: chat replies are not configured on this desktop.";
const UNREACHABLE: &str =
    "I can't reach the reply service right now. Please try again in a moment.";
const BAD_STATUS: &str = "The reply service returned an error. Please try again in a moment.";
const MALFORMED: &str = "I received a reply I couldn't read. Please try again.";
const TIMED_OUT: &str = "The reply service took too long to answer. Please try again.";

/// Deterministic assistant text substituted for a failed reply.
///
/// The text depends only on the failure kind, never on error details.
pub fn fallback_message(error: &ReplyError) -> &'static str {
    match error {
        ReplyError::MissingCredential => MISSING_CREDENTIAL,
        ReplyError::Unreachable(_) => UNREACHABLE,
        ReplyError::Status { .. } => BAD_STATUS,
        ReplyError::Malformed(_) => MALFORMED,
        ReplyError::TimedOut { .. } => TIMED_OUT,
    }
}
