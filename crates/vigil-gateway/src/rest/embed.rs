//! Embed wire model
//!
//! The REST shape a rendered notification takes on its way out.

use serde::Serialize;

use vigil_core::Notification;

/// Message creation request body
#[derive(Debug, Clone, Serialize)]
pub struct CreateMessage {
    pub embeds: Vec<Embed>,
}

impl CreateMessage {
    /// Wrap a single notification
    #[must_use]
    pub fn from_notification(notification: &Notification) -> Self {
        Self {
            embeds: vec![Embed::from(notification)],
        }
    }
}

/// Embed object as sent to the message-create endpoint
#[derive(Debug, Clone, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub color: u32,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
}

/// Embed author header
#[derive(Debug, Clone, Serialize)]
pub struct EmbedAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Embed field
#[derive(Debug, Clone, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Embed footer
#[derive(Debug, Clone, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

impl From<&Notification> for Embed {
    fn from(n: &Notification) -> Self {
        Self {
            title: n.title.clone(),
            description: n.description.clone(),
            url: n.url.clone(),
            color: n.color.rgb(),
            timestamp: n.timestamp.to_rfc3339(),
            author: n.author.as_ref().map(|a| EmbedAuthor {
                name: a.name.clone(),
                icon_url: a.icon_url.clone(),
            }),
            fields: n
                .fields
                .iter()
                .map(|f| EmbedField {
                    name: f.name.clone(),
                    value: f.value.clone(),
                    inline: f.inline,
                })
                .collect(),
            footer: n.footer.as_ref().map(|text| EmbedFooter {
                text: text.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use vigil_core::AccentColor;

    fn notification() -> Notification {
        let at = FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(2023, 7, 1, 12, 0, 0)
            .unwrap();
        Notification::new("Member Banned", "<@4>", AccentColor::Red, at)
            .with_author("target", None)
            .with_footer("ID: 4")
            .field("Reason", "spam")
    }

    #[test]
    fn test_embed_from_notification() {
        let embed = Embed::from(&notification());
        assert_eq!(embed.title, "Member Banned");
        assert_eq!(embed.color, 0xdd5e53);
        assert_eq!(embed.timestamp, "2023-07-01T12:00:00+09:00");
        assert_eq!(embed.fields.len(), 1);
        assert_eq!(embed.footer.as_ref().unwrap().text, "ID: 4");
    }

    #[test]
    fn test_embed_serialization_skips_missing_parts() {
        let body = CreateMessage::from_notification(&notification());
        let json = serde_json::to_value(&body).unwrap();
        let embed = &json["embeds"][0];

        assert_eq!(embed["title"], "Member Banned");
        assert_eq!(embed["color"], 0x00dd_5e53);
        // No url was set, so the key is absent
        assert!(embed.get("url").is_none());
        assert!(embed["author"].get("icon_url").is_none());
    }
}
