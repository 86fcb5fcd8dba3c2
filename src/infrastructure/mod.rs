//! Adapters behind the domain ports: in-memory stores plus the stand-in
//! collaborators for dispatch, notifications and payouts.

pub mod collaborators;
pub mod in_memory;
