//! # vigil-service
//!
//! Application layer: turns decoded log events into notifications and
//! dispatches them to the configured log channels. All platform I/O goes
//! through the capability traits on [`BotContext`], so everything here is
//! testable without a live connection.

pub mod router;
pub mod services;

pub use router::EventRouter;
pub use services::{BotContext, MemberLogService, MessageLogService, ServiceError, ServiceResult};
