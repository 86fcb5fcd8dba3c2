//! Application layer containing the core business logic orchestration.
//!
//! This module defines the `MarketplaceEngine` which drives every operation
//! of the marketplace: vendor onboarding, the request lifecycle, Happy Code
//! settlement and the reporting queries. It owns the storage ports and talks
//! to the outside world only through the collaborator ports.

pub mod engine;
