// handlers/public/auth/mod.rs - Public authentication handlers

pub mod signin; // POST /auth/signin - authenticate and get JWT
pub mod signup; // POST /auth/signup - create account + profile
pub mod utils;

pub use signin::signin as auth_signin;
pub use signup::signup as auth_signup;
