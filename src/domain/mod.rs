//! Domain layer: the marketplace model and the ports it is stored through.
//!
//! Everything here is pure state and transition rules. The structs know how
//! to move themselves between legal statuses and reject everything else;
//! persistence and collaborators are reached only through the traits in
//! [`ports`].

pub mod catalog;
pub mod money;
pub mod ports;
pub mod request;
pub mod settlement;
pub mod vendor;
