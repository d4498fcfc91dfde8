// handlers/mod.rs - Route handler tiers
//
// public:    /auth/*  token acquisition and sign-up, no authentication
// protected: /api/*   bearer token required, role gates per route

pub mod protected;
pub mod public;
