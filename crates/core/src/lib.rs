//! ZeroStat domain logic.
//!
//! Everything in this crate is pure: no locks, no sockets, no processes.
//! The `agent` crate owns the stateful runtime and feeds timestamps and
//! metric readings into the functions defined here.
//!
//! - [`alert`] -- the [`AlertRule`](alert::AlertRule) model.
//! - [`evaluation`] -- the per-rule debounce/cooldown state machine.
//! - [`template`] -- alert and recovery message rendering.
//! - [`shell_guard`] -- allow-list / deny-list screening of rule commands.
//! - [`history`] -- fixed-capacity chronological history ring.
//! - [`chart`] -- SVG polyline points for trend charts.

pub mod alert;
pub mod channels;
pub mod chart;
pub mod error;
pub mod evaluation;
pub mod history;
pub mod metric_names;
pub mod shell_guard;
pub mod snapshot;
pub mod template;
pub mod types;
