// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Landing page, health check, token acquisition and self-registration.
pub mod login;
pub mod register;
pub mod root;

pub use login::login;
pub use register::register;
pub use root::{health, root};
