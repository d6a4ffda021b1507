use crate::models::Firing;

/// Most firings shown as justification for one result
pub const MAX_EXPLANATIONS: usize = 6;

/// Picks the firings that moved the score the most, largest absolute delta first
pub fn select_explanations(fired: &[Firing]) -> Vec<&Firing> {
    let mut ranked: Vec<&Firing> = fired.iter().collect();
    ranked.sort_by(|a, b| b.delta.abs().total_cmp(&a.delta.abs()));
    ranked.truncate(MAX_EXPLANATIONS);
    ranked
}
