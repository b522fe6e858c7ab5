//! Core automation primitives for driving the Warsim console game from its
//! visible screen text alone: screen classification plus the task scheduler
//! and state machines. Synchronous and I/O-free; the runner binary adapts
//! this to a real console gateway.

pub mod agent;
pub mod screen;
