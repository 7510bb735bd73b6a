use std::time::Instant;

use crate::{
    db::Corpus,
    error::AppResult,
    models::Recommendation,
    services::{
        mood::{self, MoodPolicy},
        providers::DetailEnricher,
        similarity::SimilarityMatrix,
        vectorizer::Vectorizer,
    },
};

pub const DEFAULT_LIMIT: usize = 5;
pub const DEFAULT_CANDIDATE_POOL: usize = 59;

/// Generates mood-aware movie recommendations
///
/// Owns the corpus and the similarity matrix derived from it. Both are built
/// once in [`RecommendationEngine::build`] and are read-only afterwards, so a
/// single engine can be shared behind an `Arc` by concurrent requests.
/// Loading a different corpus means building a new engine.
#[derive(Debug)]
pub struct RecommendationEngine {
    corpus: Corpus,
    matrix: SimilarityMatrix,
    moods: MoodPolicy,
    candidate_pool: usize,
}

impl RecommendationEngine {
    /// Vectorizes the corpus and computes the similarity matrix
    ///
    /// This is the only expensive step, O(N² · D). It runs once at startup.
    pub fn build(
        corpus: Corpus,
        vectorizer: &Vectorizer,
        moods: MoodPolicy,
        candidate_pool: usize,
    ) -> AppResult<Self> {
        let start = Instant::now();

        let features = vectorizer.vectorize(&corpus)?;
        let matrix = SimilarityMatrix::build(&features);

        tracing::info!(
            movies = corpus.len(),
            vocabulary = features.dimensions(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Similarity matrix built"
        );

        Ok(Self {
            corpus,
            matrix,
            moods,
            candidate_pool,
        })
    }

    /// All catalog titles in corpus order
    pub fn list_titles(&self) -> Vec<String> {
        self.corpus.titles()
    }

    /// Mood labels in policy order
    pub fn list_moods(&self) -> Vec<String> {
        self.moods.moods()
    }

    pub fn candidate_pool(&self) -> usize {
        self.candidate_pool
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Neighbours of `query_index` by descending similarity
    ///
    /// Equal scores keep ascending corpus order. The query itself is excluded
    /// and the list is cut to the candidate pool size.
    pub fn rank(&self, query_index: usize) -> Vec<(usize, f64)> {
        let Some(row) = self.matrix.row(query_index) else {
            return vec![];
        };

        let mut ranked: Vec<(usize, f64)> = row.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        ranked
            .into_iter()
            .filter(|(idx, _)| *idx != query_index)
            .take(self.candidate_pool)
            .collect()
    }

    /// Recommends up to `limit` movies similar to `title` that fit `mood`
    ///
    /// 1. Validate the mood; an unknown label is an error
    /// 2. Resolve the title (first match wins); a miss yields no results
    /// 3. Walk the ranked candidate pool in order, keeping mood matches
    /// 4. Fetch details for each match; a failed fetch skips that movie
    /// 5. Stop as soon as `limit` recommendations are collected
    pub async fn recommend(
        &self,
        enricher: &dyn DetailEnricher,
        title: &str,
        mood: &str,
        limit: usize,
    ) -> AppResult<Vec<Recommendation>> {
        let categories = self.moods.categories_for(mood)?;

        let Some(query_index) = self.corpus.position_of(title) else {
            tracing::info!(title = %title, "Title not in corpus");
            return Ok(vec![]);
        };

        let mut recommendations = Vec::with_capacity(limit);
        if limit == 0 {
            return Ok(recommendations);
        }

        let mut skipped = 0;

        for (idx, score) in self.rank(query_index) {
            let Some(movie) = self.corpus.get(idx) else {
                continue;
            };

            if !mood::tags_match(&movie.tags, categories) {
                continue;
            }

            match enricher.fetch_details(movie.id).await {
                Ok(details) => {
                    recommendations.push(Recommendation::from_details(&movie.title, details));
                }
                Err(e) => {
                    skipped += 1;
                    tracing::warn!(
                        movie_id = %movie.id,
                        title = %movie.title,
                        score = score,
                        provider = enricher.name(),
                        reason = %e,
                        "Skipping candidate, details unavailable"
                    );
                }
            }

            if recommendations.len() == limit {
                break;
            }
        }

        tracing::info!(
            title = %title,
            mood = %mood,
            results = recommendations.len(),
            skipped = skipped,
            "Recommendations generated"
        );

        Ok(recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{AppError, EnrichmentError},
        models::{Movie, MovieDetails, MovieId, Rating},
        services::providers::MockDetailEnricher,
    };
    use mockall::predicate::eq;

    const EXCITED: &str = "Excited 🤩";

    fn details(tag: &str) -> MovieDetails {
        MovieDetails {
            poster: format!("https://image.tmdb.org/t/p/w500/{}.jpg", tag),
            rating: Rating::Score(7.0),
            year: "2001".to_string(),
            genres: "Action".to_string(),
            overview: format!("About {}", tag),
        }
    }

    fn engine(movies: Vec<Movie>) -> RecommendationEngine {
        RecommendationEngine::build(
            Corpus::new(movies).unwrap(),
            &Vectorizer::default(),
            MoodPolicy::default(),
            DEFAULT_CANDIDATE_POOL,
        )
        .unwrap()
    }

    fn scenario() -> RecommendationEngine {
        engine(vec![
            Movie::new(1, "Alpha", "sci-fi action hero"),
            Movie::new(2, "Beta", "romantic comedy love"),
            Movie::new(3, "Gamma", "action adventure hero"),
        ])
    }

    fn always_ok() -> MockDetailEnricher {
        let mut enricher = MockDetailEnricher::new();
        enricher
            .expect_fetch_details()
            .returning(|id| Ok(details(&id.to_string())));
        enricher.expect_name().return_const("mock");
        enricher
    }

    fn titles(recs: &[Recommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_rank_excludes_query_and_orders_by_score() {
        let engine = scenario();
        let ranked = engine.rank(0);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].0, 2);
        assert_eq!(ranked[1].0, 1);
        assert!(ranked[0].1 > ranked[1].1);
    }

    #[test]
    fn test_rank_ties_keep_corpus_order() {
        let engine = engine(vec![
            Movie::new(1, "Query", "space"),
            Movie::new(2, "A", "cooking"),
            Movie::new(3, "B", "gardening"),
            Movie::new(4, "C", "knitting"),
        ]);

        let order: Vec<usize> = engine.rank(0).into_iter().map(|(i, _)| i).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_rank_truncates_to_candidate_pool() {
        let movies = (0..80)
            .map(|i| Movie::new(i, format!("Movie {}", i), "action hero"))
            .collect();
        let engine = engine(movies);

        assert_eq!(engine.rank(0).len(), DEFAULT_CANDIDATE_POOL);
    }

    #[tokio::test]
    async fn test_scenario_excited_keeps_gamma_drops_beta() {
        let engine = scenario();
        let enricher = always_ok();

        let recs = engine
            .recommend(&enricher, "Alpha", EXCITED, DEFAULT_LIMIT)
            .await
            .unwrap();

        assert_eq!(titles(&recs), vec!["Gamma"]);
        assert_eq!(recs[0].overview, "About 3");
    }

    #[tokio::test]
    async fn test_unknown_title_is_empty() {
        let engine = scenario();
        let mut enricher = MockDetailEnricher::new();
        enricher.expect_fetch_details().never();

        let recs = engine
            .recommend(&enricher, "Delta", EXCITED, DEFAULT_LIMIT)
            .await
            .unwrap();
        assert!(recs.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_mood_is_error_even_for_unknown_title() {
        let engine = scenario();
        let enricher = MockDetailEnricher::new();

        let result = engine.recommend(&enricher, "Delta", "Bored", 5).await;
        assert!(matches!(result, Err(AppError::UnknownMood(_))));

        let result = engine.recommend(&enricher, "Alpha", "Bored", 5).await;
        assert!(matches!(result, Err(AppError::UnknownMood(_))));
    }

    #[tokio::test]
    async fn test_enrichment_failure_moves_to_next_candidate() {
        let engine = engine(vec![
            Movie::new(1, "Query", "heist crime crew"),
            Movie::new(2, "Best", "heist crime crew vault"),
            Movie::new(3, "Second", "heist crime bank"),
        ]);

        let mut enricher = MockDetailEnricher::new();
        enricher
            .expect_fetch_details()
            .with(eq(MovieId(2)))
            .times(1)
            .returning(|_| Err(EnrichmentError::Timeout));
        enricher
            .expect_fetch_details()
            .with(eq(MovieId(3)))
            .times(1)
            .returning(|_| Ok(details("second")));
        enricher.expect_name().return_const("mock");

        let recs = engine
            .recommend(&enricher, "Query", "Dark 🖤", DEFAULT_LIMIT)
            .await
            .unwrap();

        assert_eq!(titles(&recs), vec!["Second"]);
    }

    #[tokio::test]
    async fn test_stops_once_limit_reached() {
        let movies = (0..10)
            .map(|i| Movie::new(i, format!("Movie {}", i), format!("action hero sequel{}", i)))
            .collect();
        let engine = engine(movies);

        let mut enricher = MockDetailEnricher::new();
        enricher
            .expect_fetch_details()
            .times(2)
            .returning(|id| Ok(details(&id.to_string())));
        enricher.expect_name().return_const("mock");

        let recs = engine
            .recommend(&enricher, "Movie 0", EXCITED, 2)
            .await
            .unwrap();
        assert_eq!(recs.len(), 2);
    }

    #[tokio::test]
    async fn test_zero_limit_fetches_nothing() {
        let engine = scenario();
        let mut enricher = MockDetailEnricher::new();
        enricher.expect_fetch_details().never();

        let recs = engine.recommend(&enricher, "Alpha", EXCITED, 0).await.unwrap();
        assert!(recs.is_empty());
    }

    #[tokio::test]
    async fn test_results_follow_similarity_order() {
        let engine = engine(vec![
            Movie::new(1, "Query", "space war rebels empire"),
            Movie::new(2, "Far", "space action"),
            Movie::new(3, "Near", "space war rebels action"),
            Movie::new(4, "Mid", "space war action"),
        ]);
        let enricher = always_ok();

        let recs = engine
            .recommend(&enricher, "Query", EXCITED, DEFAULT_LIMIT)
            .await
            .unwrap();

        assert_eq!(titles(&recs), vec!["Near", "Mid", "Far"]);
        assert!(!titles(&recs).contains(&"Query"));
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let engine = scenario();
        let enricher = always_ok();

        let first = tokio_test::block_on(engine.recommend(&enricher, "Alpha", EXCITED, 5)).unwrap();
        let second = tokio_test::block_on(engine.recommend(&enricher, "Alpha", EXCITED, 5)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_list_titles_and_moods() {
        let engine = scenario();
        assert_eq!(engine.list_titles(), vec!["Alpha", "Beta", "Gamma"]);
        assert_eq!(engine.list_moods().len(), 7);
        assert_eq!(engine.list_moods()[3], EXCITED);
    }

    #[test]
    fn test_duplicate_title_uses_first_match() {
        let engine = engine(vec![
            Movie::new(1, "Twin", "space opera"),
            Movie::new(2, "Twin", "cooking show"),
            Movie::new(3, "Other", "space opera saga"),
        ]);
        assert_eq!(engine.corpus().position_of("Twin"), Some(0));
        assert_eq!(engine.rank(0)[0].0, 2);
    }
}
