pub mod content;
pub mod schedule;
