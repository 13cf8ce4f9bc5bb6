pub mod auth_service;
pub mod product_service;

pub use auth_service::AuthService;
pub use product_service::{AddOutcome, Product, ProductRegistry};
