// Endpoints behind the JWT auth middleware (/api/*)

pub mod products;
