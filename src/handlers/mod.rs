// handlers/mod.rs - Route handlers, split by security tier
//
// Public (no auth) → Protected (bearer token required)
pub mod forms;
pub mod protected;
pub mod public;
