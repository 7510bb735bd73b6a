use crate::services::vectorizer::FeatureVectors;

/// Symmetric N×N cosine similarity matrix, stored densely
///
/// Built once from the feature vectors and never mutated. Values lie in
/// `[0, 1]` because term counts are non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Computes cosine similarity between every pair of vectors
    ///
    /// Pairs involving a zero vector score `0`. The diagonal is `1` for every
    /// non-zero vector and off-diagonal scores are capped at `1`, so a row's
    /// own entry is always its maximum. Dot products are accumulated through
    /// an inverted index over columns, so only pairs sharing a term are visited.
    pub fn build(features: &FeatureVectors) -> Self {
        let size = features.len();
        let norms: Vec<f64> = features
            .vectors
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&(_, c)| (c as f64) * (c as f64))
                    .sum::<f64>()
                    .sqrt()
            })
            .collect();

        // Inverted index: for each column, the rows holding it in corpus order
        let mut postings: Vec<Vec<(usize, u32)>> = vec![Vec::new(); features.dimensions()];
        for (doc, row) in features.vectors.iter().enumerate() {
            for &(col, count) in row {
                postings[col].push((doc, count));
            }
        }

        let mut values = vec![0.0; size * size];
        let mut dots = vec![0u64; size];
        let mut touched = Vec::new();

        for i in 0..size {
            if norms[i] == 0.0 {
                continue;
            }
            values[i * size + i] = 1.0;

            for &(col, count) in &features.vectors[i] {
                let list = &postings[col];
                let after = list.partition_point(|&(doc, _)| doc <= i);
                for &(j, other) in &list[after..] {
                    if dots[j] == 0 {
                        touched.push(j);
                    }
                    dots[j] += u64::from(count) * u64::from(other);
                }
            }

            for j in touched.drain(..) {
                let sim = (dots[j] as f64 / (norms[i] * norms[j])).min(1.0);
                values[i * size + j] = sim;
                values[j * size + i] = sim;
                dots[j] = 0;
            }
        }

        Self { size, values }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Similarity between positions `i` and `j`
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        (i < self.size && j < self.size).then(|| self.values[i * self.size + j])
    }

    /// Similarities of position `i` to every position, in corpus order
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        (i < self.size).then(|| &self.values[i * self.size..(i + 1) * self.size])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::vectorizer::Vectorizer;

    fn matrix_for(docs: &[&str]) -> SimilarityMatrix {
        let features = Vectorizer::default().vectorize_documents(docs).unwrap();
        SimilarityMatrix::build(&features)
    }

    fn sample() -> SimilarityMatrix {
        matrix_for(&[
            "sci-fi action hero",
            "romantic comedy love",
            "action adventure hero",
            "sci sci fi fi action action hero hero",
            "the and of",
        ])
    }

    #[test]
    fn test_symmetric() {
        let m = sample();
        for i in 0..m.size() {
            for j in 0..m.size() {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
    }

    #[test]
    fn test_diagonal_is_row_maximum() {
        let m = sample();
        for i in 0..m.size() {
            let row = m.row(i).unwrap();
            let max = row.iter().cloned().fold(f64::MIN, f64::max);
            assert_eq!(row[i], max);
        }
    }

    #[test]
    fn test_parallel_vectors_score_one() {
        let m = sample();
        // "sci-fi action hero" and its doubled counterpart point the same way
        let sim = m.get(0, 3).unwrap();
        assert!((sim - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_disjoint_vectors_score_zero() {
        let m = sample();
        assert_eq!(m.get(0, 1), Some(0.0));
    }

    #[test]
    fn test_known_cosine() {
        let m = sample();
        // {sci, fi, action, hero} vs {action, adventure, hero}: 2 / (2 * sqrt 3)
        let expected = 2.0 / (2.0 * 3f64.sqrt());
        assert!((m.get(0, 2).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_zero_vector_scores_zero_everywhere() {
        let m = sample();
        assert!(m.row(4).unwrap().iter().all(|&s| s == 0.0));
        assert_eq!(m.get(0, 4), Some(0.0));
    }

    #[test]
    fn test_matches_pairwise_cosine() {
        let docs = [
            "space war space hero",
            "hero love story",
            "war drama war war",
            "space drama love hero",
            "heist crime city",
            "crime drama city city",
        ];
        let features = Vectorizer::default().vectorize_documents(&docs).unwrap();
        let m = SimilarityMatrix::build(&features);

        let dense: Vec<Vec<f64>> = (0..features.len())
            .map(|i| {
                (0..features.dimensions())
                    .map(|col| features.count(i, col) as f64)
                    .collect()
            })
            .collect();
        let norm = |v: &[f64]| v.iter().map(|x| x * x).sum::<f64>().sqrt();

        for i in 0..docs.len() {
            for j in 0..docs.len() {
                let expected = if i == j {
                    1.0
                } else {
                    let dot: f64 = dense[i].iter().zip(&dense[j]).map(|(a, b)| a * b).sum();
                    dot / (norm(&dense[i]) * norm(&dense[j]))
                };
                assert!(
                    (m.get(i, j).unwrap() - expected).abs() < 1e-12,
                    "mismatch at ({i}, {j})"
                );
            }
        }
    }

    #[test]
    fn test_catalog_scale_build() {
        // Deterministic synthetic catalog: 4800 docs of 40 tags drawn from 5000 words
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = || {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (state >> 33) as usize
        };
        let docs: Vec<String> = (0..4800)
            .map(|_| {
                (0..40)
                    .map(|_| format!("tag{}", next() % 5000))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();

        let features = Vectorizer::new(5000).vectorize_documents(&docs).unwrap();
        let started = std::time::Instant::now();
        let m = SimilarityMatrix::build(&features);

        assert!(started.elapsed() < std::time::Duration::from_secs(20));
        assert_eq!(m.size(), 4800);
        assert_eq!(m.get(17, 17), Some(1.0));
        assert_eq!(m.get(17, 4000), m.get(4000, 17));
    }

    #[test]
    fn test_out_of_range() {
        let m = sample();
        assert_eq!(m.get(5, 0), None);
        assert!(m.row(5).is_none());
    }
}
