//! Operator-supplied capabilities.
//!
//! - [`Routine`] — async procedure run in worker or master context, receiving
//!   the supervisor; [`RoutineFn`] is the function-backed implementation and
//!   [`RoutineRef`] the shared handle (`Arc<dyn Routine>`).
//! - [`ExitHook`] — pre-exit cleanup run by the shutdown coordinator before
//!   process termination; [`ExitHookFn`] is the function-backed form.

mod hook;
mod routine;

pub use hook::{ExitHook, ExitHookFn, ExitHookRef};
pub use routine::{Routine, RoutineFn, RoutineRef};

pub(crate) use hook::ImmediateHook;
pub(crate) use routine::NoopRoutine;
