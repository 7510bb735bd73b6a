pub mod movie;
pub mod tmdb;

pub use movie::{Movie, MovieDetails, MovieId, Rating, Recommendation};
pub use tmdb::{TmdbGenre, TmdbMovie};
