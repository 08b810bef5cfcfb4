//! `zerostat-agent` library crate.
//!
//! The stateful half of ZeroStat: host sampling, the rule store and its
//! on-disk file, guarded shell execution, action dispatch and the
//! per-tick evaluator. The HTTP surface and process wiring live in
//! `zerostat-api`.

pub mod collector;
pub mod config;
pub mod dispatcher;
pub mod evaluator;
pub mod persistence;
pub mod sampler;
pub mod shell;
pub mod store;
