//! Todo completion shared by the frame and companion surfaces.

use chrono::Utc;
use entities::User;
use frame_protocol::requests::{NotificationRequest, NotificationType, PointsAwardRequest};
use todo_store::TodoStore;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ServerResult;
use crate::state::AppState;

/// Result of a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionOutcome {
    /// Whether a todo owned by the actor was matched.
    pub completed: bool,
    /// The actor's streak after completion.
    pub streak: i64,
}

/// Completes `todo_id` on behalf of `user`.
///
/// The update only matches a todo owned by the user. Points are awarded
/// whenever the user has a wallet, and a notification goes out when `notify`
/// is set and the user registered a channel. Both calls are best-effort; a
/// failed award also skips the notification.
pub async fn complete_for_user<S: TodoStore>(
    state: &AppState<S>,
    user: &User,
    todo_id: Uuid,
    notify: bool,
) -> ServerResult<CompletionOutcome> {
    let completed = state
        .store
        .complete_todo(todo_id, user.fid, Utc::now())
        .await?;
    if completed {
        info!(fid = user.fid, todo_id = %todo_id, "Completed todo");
    } else {
        debug!(fid = user.fid, todo_id = %todo_id, "No owned todo matched");
    }

    let awarded = award_points(state, user, todo_id).await;
    if notify && awarded {
        send_notification(state, user, todo_id).await;
    }

    // The streak is only read here; nothing advances it yet.
    let streak = state
        .store
        .get_user(user.fid)
        .await?
        .map_or(user.streak_count, |u| u.streak_count);

    Ok(CompletionOutcome { completed, streak })
}

/// Returns false only when an award was attempted and failed.
async fn award_points<S: TodoStore>(state: &AppState<S>, user: &User, todo_id: Uuid) -> bool {
    let (Some(points), Some(address)) = (&state.points, &user.wallet_address) else {
        return true;
    };

    let request = PointsAwardRequest {
        address: address.clone(),
        todo_id,
    };
    match points.award(&request).await {
        Ok(()) => true,
        Err(e) => {
            warn!(fid = user.fid, todo_id = %todo_id, error = %e, "Points award failed");
            false
        }
    }
}

async fn send_notification<S: TodoStore>(state: &AppState<S>, user: &User, todo_id: Uuid) {
    let (Some(notifier), Some(details)) = (&state.notifier, &user.subscription.notification)
    else {
        return;
    };

    let request = NotificationRequest {
        fid: user.fid,
        notification_details: details.clone(),
        notification_type: NotificationType::TodoComplete,
        todo_id,
    };
    if let Err(e) = notifier.notify(&request).await {
        warn!(fid = user.fid, todo_id = %todo_id, error = %e, "Notification failed");
    }
}
