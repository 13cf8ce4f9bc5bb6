// Token acquisition endpoints that do not require authentication.

pub mod login; // POST /auth/login - authenticate and get JWT

pub use login::login_post;
