pub mod decision;
pub mod error;
pub mod service;
pub mod sink;
pub mod source;

pub use decision::{Decision, decide};
pub use error::{MonitorError, MonitorResult};
pub use service::{MonitorService, PassSummary, TenantOutcome};
pub use sink::{DiscordNotifier, NotificationSink, StockAlert};
pub use source::{SmsActivateClient, StockSource};
