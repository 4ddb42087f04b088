/*!
 * Monitoring
 * Notifications and structured tracing
 */

mod events;
mod tracer;

pub use events::{Notification, NotificationSink, RecordingSink, TracingSink};
pub use tracer::{init_tracing, span_cycle, CycleSpan};
