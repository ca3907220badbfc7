// handlers/public/auth/mod.rs - Token acquisition

pub mod login; // POST /login - issue a bearer token

pub use login::login_post;
