//! Gateway wire protocol
//!
//! Message framing and payload types for the platform's WebSocket gateway,
//! from the client's side of the connection.

mod messages;
mod opcodes;
mod payloads;

pub use messages::GatewayMessage;
pub use opcodes::OpCode;
pub use payloads::{
    AttachmentPayload, AuditChangePayload, AuditLogEntryPayload, EventType, HelloPayload,
    IdentifyPayload, IdentifyProperties, MessagePayload, MessageUpdatePayload, ReadyPayload,
    UserPayload,
};
