//! # tally-policy — Attendance Policy Configuration
//!
//! Defines [`PolicyConfiguration`], the closed set of options that govern
//! point accrual and progressive discipline: the point value of each
//! occurrence type, the four ascending status thresholds, the rolling
//! expiration window, and the alerting windows.
//!
//! A policy is validated as a whole at load time. The engine refuses to
//! run with an unvalidated policy — there is no partial acceptance and no
//! silent clamping of bad values.

pub mod config;

pub use config::PolicyConfiguration;
