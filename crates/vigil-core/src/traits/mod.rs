mod platform;

pub use platform::{NotificationSink, PlatformError, PlatformResult, UserDirectory};
