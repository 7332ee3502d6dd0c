//! Background maintenance jobs.

mod scheduler;

pub use scheduler::Scheduler;
