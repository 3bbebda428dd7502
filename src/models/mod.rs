pub mod candidate;
pub mod job;
pub mod persona;
pub mod stage;
