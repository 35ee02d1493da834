//! Scheduling domain for TutorSync: availability patterns, slot generation,
//! conflict resolution and the booking lifecycle. Pure logic, no I/O; storage
//! and collaborators live behind the traits in [`ports`].

pub mod conflict;
pub mod errors;
pub mod models;
pub mod policy;
pub mod ports;
pub mod slots;
pub mod transitions;
