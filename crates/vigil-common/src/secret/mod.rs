//! Secret loading

mod token;

pub use token::{BotToken, TokenError};
