//! Log services - one per event category

mod context;
mod dispatcher;
mod error;
mod member_log;
mod message_log;

pub use context::BotContext;
pub use error::{ServiceError, ServiceResult};
pub use member_log::MemberLogService;
pub use message_log::MessageLogService;
