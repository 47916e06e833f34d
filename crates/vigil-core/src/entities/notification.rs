//! Notification entity - a rendered log summary ready for delivery

use chrono::{DateTime, FixedOffset};

use crate::error::DomainError;
use crate::value_objects::AccentColor;

/// A formatted notification destined for a log channel
///
/// Maps onto the platform's embed object at the adapter boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    pub color: AccentColor,
    pub author: Option<NotificationAuthor>,
    pub fields: Vec<NotificationField>,
    pub footer: Option<String>,
    pub timestamp: DateTime<FixedOffset>,
}

/// Author header shown at the top of a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAuthor {
    pub name: String,
    pub icon_url: Option<String>,
}

/// A named field on a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl Notification {
    /// Create a new notification with the required parts
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        color: AccentColor,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            url: None,
            color,
            author: None,
            fields: Vec::new(),
            footer: None,
            timestamp,
        }
    }

    /// Set the link target for the notification title
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the author header
    pub fn with_author(mut self, name: impl Into<String>, icon_url: Option<String>) -> Self {
        self.author = Some(NotificationAuthor {
            name: name.into(),
            icon_url,
        });
        self
    }

    /// Set the footer text
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Append a non-inline field
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(NotificationField {
            name: name.into(),
            value: value.into(),
            inline: false,
        });
        self
    }

    /// Validate the notification invariants before delivery
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::EmptyTitle);
        }
        Ok(())
    }
}
