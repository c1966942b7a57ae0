pub mod drama;
pub mod genre;
pub mod user;

pub use drama::{Director, DirectorView, Drama, DramaView};
pub use genre::Genre;
pub use user::{FavoritesView, NewUser, User, UserChanges};
