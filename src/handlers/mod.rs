// handlers/mod.rs - HTTP handlers
//
// public:    no credentials required (welcome, health, login)
// protected: mounted behind the bearer token gate, scoped to the caller

pub mod protected;
pub mod public;
