use crate::models::{DatasetContext, Movie, Preferences};

/// Narrows the catalog to movies that satisfy every hard constraint.
///
/// Runtime and language constraints only apply when the dataset carries those
/// fields. Catalog order is preserved.
pub fn apply_hard_filters<'a>(
    catalog: &'a [Movie],
    prefs: &Preferences,
    context: &DatasetContext,
) -> Vec<&'a Movie> {
    catalog
        .iter()
        .filter(|movie| passes(movie, prefs, context))
        .collect()
}

fn passes(movie: &Movie, prefs: &Preferences, context: &DatasetContext) -> bool {
    let (lo, hi) = prefs.year_range;
    let Some(year) = movie.year else {
        return false;
    };
    if year < lo || year > hi {
        return false;
    }

    if prefs.has_genre_restriction() && movie.genre_overlap(&prefs.preferred_genres) == 0 {
        return false;
    }
    if movie.genre_overlap(&prefs.excluded_genres) > 0 {
        return false;
    }

    // NaN ratings compare false against every threshold, so reject them outright
    if movie.rating.is_nan() || movie.rating < prefs.min_rating {
        return false;
    }

    if context.capabilities.has_runtime {
        if let Some(ceiling) = prefs.runtime_max {
            match movie.runtime_minutes {
                Some(runtime) if runtime <= ceiling => {}
                _ => return false,
            }
        }
    }

    if context.capabilities.has_language {
        if let Some(language) = &prefs.language {
            if movie.language.as_ref() != Some(language) {
                return false;
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DatasetKind;

    fn movie(id: &str, year: Option<i32>, genres: &[&str], rating: f64) -> Movie {
        Movie::new(
            id,
            format!("Movie {}", id),
            year,
            genres.iter().map(|g| g.to_string()).collect(),
            rating,
            5,
            5.0,
        )
    }

    fn ids(movies: &[&Movie]) -> Vec<String> {
        movies.iter().map(|m| m.id.clone()).collect()
    }

    fn catalog() -> Vec<Movie> {
        vec![
            movie("1", Some(1975), &["Drama"], 4.5),
            movie("2", Some(1995), &["Comedy", "Romance"], 3.2),
            movie("3", None, &["Comedy"], 4.0),
            movie("4", Some(2005), &["Horror", "Comedy"], 2.1),
            movie("5", Some(2010), &["Drama", "Romance"], 3.9),
        ]
    }

    #[test]
    fn test_unrestricted_keeps_every_dated_movie_in_order() {
        let ctx = DatasetContext::new(DatasetKind::MovieLens, catalog(), 5.0);
        let prefs = Preferences::unrestricted(&ctx);
        let kept = apply_hard_filters(&ctx.movies, &prefs, &ctx);
        assert_eq!(ids(&kept), vec!["1", "2", "4", "5"]);
    }

    #[test]
    fn test_year_range_is_inclusive() {
        let ctx = DatasetContext::new(DatasetKind::MovieLens, catalog(), 5.0);
        let mut prefs = Preferences::unrestricted(&ctx);
        prefs.year_range = (1995, 2005);
        let kept = apply_hard_filters(&ctx.movies, &prefs, &ctx);
        assert_eq!(ids(&kept), vec!["2", "4"]);
    }

    #[test]
    fn test_preferred_and_excluded_genres() {
        let ctx = DatasetContext::new(DatasetKind::MovieLens, catalog(), 5.0);
        let mut prefs = Preferences::unrestricted(&ctx);
        prefs.preferred_genres = vec!["Comedy".to_string()];
        prefs.excluded_genres = vec!["Horror".to_string()];
        let kept = apply_hard_filters(&ctx.movies, &prefs, &ctx);
        assert_eq!(ids(&kept), vec!["2"]);
    }

    #[test]
    fn test_min_rating() {
        let ctx = DatasetContext::new(DatasetKind::MovieLens, catalog(), 5.0);
        let mut prefs = Preferences::unrestricted(&ctx);
        prefs.min_rating = 3.9;
        let kept = apply_hard_filters(&ctx.movies, &prefs, &ctx);
        assert_eq!(ids(&kept), vec!["1", "5"]);
    }

    #[test]
    fn test_nan_rating_never_passes_min_rating() {
        let movies = vec![
            movie("good", Some(2000), &["Drama"], 4.5),
            movie("nan", Some(2000), &["Drama"], f64::NAN),
        ];
        let ctx = DatasetContext::new(DatasetKind::MovieLens, movies, 5.0);
        let mut prefs = Preferences::unrestricted(&ctx);
        assert_eq!(ids(&apply_hard_filters(&ctx.movies, &prefs, &ctx)), vec!["good"]);

        prefs.min_rating = 4.0;
        assert_eq!(ids(&apply_hard_filters(&ctx.movies, &prefs, &ctx)), vec!["good"]);
    }

    #[test]
    fn test_runtime_ceiling_ignored_without_capability() {
        let ctx = DatasetContext::new(DatasetKind::MovieLens, catalog(), 5.0);
        let mut prefs = Preferences::unrestricted(&ctx);
        prefs.runtime_max = Some(60.0);
        assert_eq!(apply_hard_filters(&ctx.movies, &prefs, &ctx).len(), 4);
    }

    #[test]
    fn test_runtime_ceiling_drops_long_and_unknown_runtimes() {
        let movies = vec![
            movie("1", Some(2000), &["Drama"], 3.0).with_runtime(Some(95.0)),
            movie("2", Some(2000), &["Drama"], 3.0).with_runtime(Some(150.0)),
            movie("3", Some(2000), &["Drama"], 3.0),
        ];
        let ctx = DatasetContext::new(DatasetKind::Tmdb, movies, 10.0);
        let mut prefs = Preferences::unrestricted(&ctx);
        prefs.runtime_max = Some(120.0);
        assert_eq!(ids(&apply_hard_filters(&ctx.movies, &prefs, &ctx)), vec!["1"]);
    }

    #[test]
    fn test_language_exact_match() {
        let movies = vec![
            movie("1", Some(2000), &["Drama"], 3.0).with_language(Some("en".to_string())),
            movie("2", Some(2000), &["Drama"], 3.0).with_language(Some("fr".to_string())),
            movie("3", Some(2000), &["Drama"], 3.0),
        ];
        let ctx = DatasetContext::new(DatasetKind::Tmdb, movies, 10.0);
        let mut prefs = Preferences::unrestricted(&ctx);
        prefs.language = Some("fr".to_string());
        assert_eq!(ids(&apply_hard_filters(&ctx.movies, &prefs, &ctx)), vec!["2"]);
    }
}
