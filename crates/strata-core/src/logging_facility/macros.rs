//! Canonical logging macros
//!
//! The expansions reach `tracing` and the event names through this crate,
//! so callers need no direct dependency on either.

/// Log the start of an operation
///
/// ```
/// # use strata_core::log_op_start;
/// log_op_start!("snapshot_diff");
/// log_op_start!("snapshot_diff", from_id = "a", to_id = "b");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        $crate::__macro_support::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::__macro_support::strata_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        $crate::__macro_support::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::__macro_support::strata_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use strata_core::log_op_end;
/// log_op_end!("snapshot_diff", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        $crate::__macro_support::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::__macro_support::strata_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        $crate::__macro_support::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::__macro_support::strata_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// Accepts anything convertible into [`ExError`](crate::errors::ExError).
///
/// ```
/// # use strata_core::{log_op_error, errors::StrataError};
/// log_op_error!("snapshot_diff", StrataError::MissingSnapshotIds, duration_ms = 0);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__macro_support::tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::__macro_support::strata_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__macro_support::tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::__macro_support::strata_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            $($field)*
        );
    }};
}
