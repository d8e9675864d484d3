mod diff;
mod metrics;

pub use diff::{diff_handler, TRACE_ID_HEADER};
pub use metrics::{metrics_handler, BasicMetrics};
