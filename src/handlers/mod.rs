// handlers/mod.rs - two security tiers
//
// Public (no auth): /, /health, /auth/*
// Protected (bearer auth): /api/*
pub mod protected;
pub mod public;
