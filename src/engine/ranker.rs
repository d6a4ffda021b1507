use std::cmp::Ordering;

use super::scorer::ScoredMovie;

/// Sorts scored candidates best first.
///
/// Ties on score fall back to rating, then to popularity (missing counts as 0).
/// The sort is stable, so full ties keep their catalog order.
pub fn rank(results: &mut [ScoredMovie<'_>]) {
    results.sort_by(compare);
}

fn compare(a: &ScoredMovie<'_>, b: &ScoredMovie<'_>) -> Ordering {
    b.trace
        .score
        .total_cmp(&a.trace.score)
        .then_with(|| b.movie.rating.total_cmp(&a.movie.rating))
        .then_with(|| {
            b.movie
                .popularity
                .unwrap_or(0.0)
                .total_cmp(&a.movie.popularity.unwrap_or(0.0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Movie, ScoringTrace};

    fn scored(movie: &Movie, score: f64) -> ScoredMovie<'_> {
        ScoredMovie {
            movie,
            trace: ScoringTrace {
                score,
                fired: Vec::new(),
            },
        }
    }

    fn movie(id: &str, rating: f64, popularity: Option<f64>) -> Movie {
        let movie = Movie::new(id, id, Some(2000), vec![], rating, 0, 10.0);
        match popularity {
            Some(p) => movie.with_popularity(p),
            None => movie,
        }
    }

    fn order(results: &[ScoredMovie<'_>]) -> Vec<String> {
        results.iter().map(|r| r.movie.id.clone()).collect()
    }

    #[test]
    fn test_rank_by_score_then_rating_then_popularity() {
        let a = movie("a", 7.0, Some(10.0));
        let b = movie("b", 8.0, None);
        let c = movie("c", 7.0, Some(50.0));
        let d = movie("d", 6.0, None);
        let mut results = vec![scored(&a, 5.0), scored(&b, 5.0), scored(&c, 5.0), scored(&d, 9.0)];
        rank(&mut results);
        assert_eq!(order(&results), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn test_rank_is_stable_on_full_ties() {
        let a = movie("a", 7.0, None);
        let b = movie("b", 7.0, Some(0.0));
        let c = movie("c", 7.0, None);
        let mut results = vec![scored(&a, 3.0), scored(&b, 3.0), scored(&c, 3.0)];
        rank(&mut results);
        assert_eq!(order(&results), vec!["a", "b", "c"]);
    }
}
