use serde::Deserialize;

use super::{MovieDetails, Rating};

/// Poster shown when TMDB has no image for a movie
pub const PLACEHOLDER_POSTER: &str = "https://via.placeholder.com/500x750?text=No+Image";

/// Overview shown when TMDB has no synopsis for a movie
pub const DEFAULT_OVERVIEW: &str = "No description available";

/// Raw API response from TMDB `GET /3/movie/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub overview: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub name: String,
}

impl TmdbMovie {
    /// Converts the raw payload into display details
    ///
    /// Missing fields fall back to placeholders instead of failing.
    pub fn into_details(self, poster_base_url: &str) -> MovieDetails {
        let poster = match self.poster_path.as_deref() {
            Some(path) if !path.is_empty() => format!("{}{}", poster_base_url, path),
            _ => PLACEHOLDER_POSTER.to_string(),
        };

        let year = self
            .release_date
            .as_deref()
            .map(|date| date.chars().take(4).collect::<String>())
            .unwrap_or_default();

        let genres = self
            .genres
            .into_iter()
            .map(|g| g.name)
            .collect::<Vec<_>>()
            .join(", ");

        MovieDetails {
            poster,
            rating: self
                .vote_average
                .map(Rating::Score)
                .unwrap_or_else(Rating::not_available),
            year,
            genres,
            overview: self
                .overview
                .unwrap_or_else(|| DEFAULT_OVERVIEW.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500";

    #[test]
    fn test_full_payload() {
        let json = r#"{
            "id": 19995,
            "title": "Avatar",
            "poster_path": "/kyeqWdyUXW608qlYkRqosgbbJyK.jpg",
            "vote_average": 7.6,
            "release_date": "2009-12-15",
            "genres": [{"id": 28, "name": "Action"}, {"id": 12, "name": "Adventure"}],
            "overview": "In the 22nd century, a paraplegic Marine..."
        }"#;

        let movie: TmdbMovie = serde_json::from_str(json).unwrap();
        let details = movie.into_details(POSTER_BASE);

        assert_eq!(
            details.poster,
            "https://image.tmdb.org/t/p/w500/kyeqWdyUXW608qlYkRqosgbbJyK.jpg"
        );
        assert_eq!(details.rating, Rating::Score(7.6));
        assert_eq!(details.year, "2009");
        assert_eq!(details.genres, "Action, Adventure");
        assert_eq!(details.overview, "In the 22nd century, a paraplegic Marine...");
    }

    #[test]
    fn test_missing_poster_uses_placeholder() {
        let movie: TmdbMovie = serde_json::from_str(r#"{"poster_path": null}"#).unwrap();
        let details = movie.into_details(POSTER_BASE);
        assert_eq!(details.poster, PLACEHOLDER_POSTER);
    }

    #[test]
    fn test_empty_payload_uses_defaults() {
        let movie: TmdbMovie = serde_json::from_str("{}").unwrap();
        let details = movie.into_details(POSTER_BASE);

        assert_eq!(details.poster, PLACEHOLDER_POSTER);
        assert_eq!(details.rating, Rating::not_available());
        assert_eq!(details.year, "");
        assert_eq!(details.genres, "");
        assert_eq!(details.overview, DEFAULT_OVERVIEW);
    }

    #[test]
    fn test_short_release_date() {
        let movie: TmdbMovie = serde_json::from_str(r#"{"release_date": ""}"#).unwrap();
        assert_eq!(movie.into_details(POSTER_BASE).year, "");
    }
}
