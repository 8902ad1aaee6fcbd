//! Executor for reducer-emitted side effects.
//!
//! Effects run outside the session lock. Each one yields an optional follow-up action that the
//! session feeds back into the reducer.

use platform_host::{unix_time_ms_now, ReplyError, SessionHost};

use crate::{
    config::SessionConfig,
    persistence,
    reducer::{DesktopAction, RuntimeEffect},
};

/// Runs one effect and returns the action that completes it, if any.
///
/// # Errors
///
/// Returns the store error message when a profile write or delete fails. Reply failures are not
/// errors: they complete the send with a fallback.
pub(crate) async fn run_runtime_effect(
    host: &SessionHost,
    config: &SessionConfig,
    effect: RuntimeEffect,
) -> Result<Option<DesktopAction>, String> {
    match effect {
        RuntimeEffect::PersistProfile(profile) => {
            persistence::persist_profile(host.prefs.as_ref(), &config.profile_key, &profile)
                .await?;
            tracing::debug!(key = %config.profile_key, "profile record written");
            Ok(None)
        }
        RuntimeEffect::ClearProfile => {
            persistence::clear_profile(host.prefs.as_ref(), &config.profile_key).await?;
            tracing::debug!(key = %config.profile_key, "profile record deleted");
            Ok(None)
        }
        RuntimeEffect::RequestReply {
            window_id,
            contact_id,
            request,
        } => {
            let timeout = config.reply_timeout();
            let outcome =
                match tokio::time::timeout(timeout, host.replies.request_reply(&request)).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(ReplyError::TimedOut {
                        after_ms: config.reply_timeout_ms,
                    }),
                };
            if let Err(err) = &outcome {
                tracing::warn!(
                    %window_id,
                    contact = %contact_id,
                    error = %err,
                    "chat reply failed; using fallback"
                );
            }
            Ok(Some(DesktopAction::CompleteChatSend {
                window_id,
                contact_id,
                outcome,
                now_ms: unix_time_ms_now(),
            }))
        }
    }
}
