//! REST capability client

mod api_client;
mod embed;

pub use api_client::{ApiClient, ChannelModel};
pub use embed::{CreateMessage, Embed, EmbedAuthor, EmbedField, EmbedFooter};
