//! Host frame events.
//!
//! The client forwards the host's frame lifecycle events here; each one
//! replaces the user's subscription.

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use entities::FrameSubscription;
use frame_protocol::{requests::FrameEventRequest, responses::FrameEventResponse};
use todo_store::TodoStore;
use tracing::info;

use crate::api::extract::ApiJson;
use crate::error::ServerResult;
use crate::middleware::auth::SessionUser;
use crate::state::AppState;

/// Records a frame lifecycle event for the signed-in user.
pub async fn frame_event<S: TodoStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(session): Extension<SessionUser>,
    ApiJson(event): ApiJson<FrameEventRequest>,
) -> ServerResult<Json<FrameEventResponse>> {
    let user = state.store.ensure_user(session.fid).await?;

    let subscription = next_subscription(&user.subscription, event);
    let user = state
        .store
        .set_subscription(session.fid, &subscription)
        .await?;

    info!(
        fid = session.fid,
        frame_added = user.subscription.added,
        notifications_enabled = user.subscription.notifications_enabled(),
        "Updated frame subscription"
    );

    Ok(Json(FrameEventResponse {
        frame_added: user.subscription.added,
        notifications_enabled: user.subscription.notifications_enabled(),
    }))
}

/// Applies `event` to the current subscription.
fn next_subscription(current: &FrameSubscription, event: FrameEventRequest) -> FrameSubscription {
    match event {
        FrameEventRequest::FrameAdded {
            notification_details,
        } => FrameSubscription::added(notification_details),
        FrameEventRequest::FrameRemoved => FrameSubscription::removed(),
        FrameEventRequest::NotificationsEnabled {
            notification_details,
        } => FrameSubscription::added(Some(notification_details)),
        FrameEventRequest::NotificationsDisabled => FrameSubscription {
            added: current.added,
            notification: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use entities::NotificationDetails;

    use super::*;

    fn details() -> NotificationDetails {
        NotificationDetails {
            url: "https://relay.example/notify".to_string(),
            token: "token-1".to_string(),
        }
    }

    #[test]
    fn test_removed_clears_details() {
        let current = FrameSubscription::added(Some(details()));
        let next = next_subscription(&current, FrameEventRequest::FrameRemoved);
        assert!(!next.added);
        assert!(next.notification.is_none());
    }

    #[test]
    fn test_disabled_keeps_frame_added() {
        let current = FrameSubscription::added(Some(details()));
        let next = next_subscription(&current, FrameEventRequest::NotificationsDisabled);
        assert!(next.added);
        assert!(!next.notifications_enabled());
    }

    #[test]
    fn test_enabled_registers_channel() {
        let next = next_subscription(
            &FrameSubscription::added(None),
            FrameEventRequest::NotificationsEnabled {
                notification_details: details(),
            },
        );
        assert!(next.added);
        assert_eq!(next.notification, Some(details()));
    }
}
