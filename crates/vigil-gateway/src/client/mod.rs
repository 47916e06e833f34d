//! Gateway client

mod subscriber;

pub use subscriber::{GatewayError, GatewaySubscriber, Session, SubscriberConfig};
