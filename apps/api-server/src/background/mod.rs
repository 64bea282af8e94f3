//! Background work: the cron scheduler and the reconciliation jobs.

pub mod scheduler;
