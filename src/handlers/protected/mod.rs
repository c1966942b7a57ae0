// handlers/protected/mod.rs - Handlers behind the bearer-token middleware
//
// Every handler here can rely on an `AuthUser` request extension.
pub mod directors;
pub mod dramas;
pub mod favorites;
pub mod genres;
pub mod users;
