//! Companion API and outbound call request bodies.

use entities::NotificationDetails;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Session
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    /// Sign-in message produced by the host.
    pub message: String,
    /// Signature over `message`.
    pub signature: String,
    /// Nonce previously issued by the server.
    pub nonce: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkWalletRequest {
    pub address: String,
}

// ============================================================================
// Todos
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListTodosRequest {
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteTodoRequest {
    pub todo_id: Uuid,
}

// ============================================================================
// Host events
// ============================================================================

/// Lifecycle events the embedding host reports for the frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FrameEventRequest {
    FrameAdded {
        #[serde(default, rename = "notificationDetails")]
        notification_details: Option<NotificationDetails>,
    },
    FrameRemoved,
    NotificationsEnabled {
        #[serde(rename = "notificationDetails")]
        notification_details: NotificationDetails,
    },
    NotificationsDisabled,
}

// ============================================================================
// Outbound calls
// ============================================================================

/// Body of the points-award call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsAwardRequest {
    pub address: String,
    pub todo_id: Uuid,
}

/// Kind of notification sent to the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    TodoComplete,
}

/// Body of the notification call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub fid: u64,
    pub notification_details: NotificationDetails,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub todo_id: Uuid,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_frame_event_wire_shape() {
        let event: FrameEventRequest = serde_json::from_value(json!({
            "event": "frame_added",
            "notificationDetails": { "url": "https://relay.example", "token": "t" }
        }))
        .unwrap();
        assert!(matches!(
            event,
            FrameEventRequest::FrameAdded {
                notification_details: Some(_)
            }
        ));

        let event: FrameEventRequest =
            serde_json::from_value(json!({ "event": "frame_added" })).unwrap();
        assert_eq!(
            event,
            FrameEventRequest::FrameAdded {
                notification_details: None
            }
        );

        let event: FrameEventRequest =
            serde_json::from_value(json!({ "event": "notifications_disabled" })).unwrap();
        assert_eq!(event, FrameEventRequest::NotificationsDisabled);
    }

    #[test]
    fn test_notification_request_wire_shape() {
        let todo_id = Uuid::new_v4();
        let request = NotificationRequest {
            fid: 8,
            notification_details: NotificationDetails {
                url: "https://relay.example".to_string(),
                token: "t".to_string(),
            },
            notification_type: NotificationType::TodoComplete,
            todo_id,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["type"], "TODO_COMPLETE");
        assert_eq!(value["todoId"], todo_id.to_string());
        assert_eq!(value["notificationDetails"]["token"], "t");
    }

    #[test]
    fn test_points_award_wire_shape() {
        let todo_id = Uuid::new_v4();
        let value = serde_json::to_value(PointsAwardRequest {
            address: "0xabc".to_string(),
            todo_id,
        })
        .unwrap();
        assert_eq!(value, json!({ "address": "0xabc", "todoId": todo_id.to_string() }));
    }
}
