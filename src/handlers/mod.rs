// Two security tiers:
// Public (no auth, token acquisition) -> Protected (JWT auth, /api/*)
pub mod protected;
pub mod public;
