//! Push notification payloads and display.
//!
//! A push carries an optional JSON payload with optional `title` and
//! `body` fields; anything missing falls back to the stock reminder text.
//! Actually showing the notification is delegated to a `NotificationSink`
//! so the shim stays independent of any particular display mechanism.

use serde::Deserialize;

/// Title used when the payload does not provide one.
pub const DEFAULT_TITLE: &str = "Attendance Tracker";

/// Body used when the payload does not provide one.
pub const DEFAULT_BODY: &str = "Check your attendance!";

/// Tag shared by all reminder notifications so they coalesce.
const NOTIFICATION_TAG: &str = "attendance-reminder";

const ICON_PATH: &str = "/assets/icon-192x192.png";
const BADGE_PATH: &str = "/assets/icon-72x72.png";

/// Decoded push payload. Both fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushPayload {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl PushPayload {
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// A notification ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub tag: String,
    pub require_interaction: bool,
}

impl Notification {
    pub fn from_payload(payload: &PushPayload) -> Self {
        Self {
            title: payload
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            body: payload
                .body
                .clone()
                .unwrap_or_else(|| DEFAULT_BODY.to_string()),
            icon: ICON_PATH.to_string(),
            badge: BADGE_PATH.to_string(),
            tag: NOTIFICATION_TAG.to_string(),
            require_interaction: true,
        }
    }
}

/// Where displayed notifications go.
pub trait NotificationSink {
    fn show(&self, notification: Notification);
}
