use carousel_core::{Candidate, FilterError, SelectionContext, TotalFilter};

/// The CLI's concrete total filter: drops candidates the application has
/// marked invisible (`"hidden": true`) or blocked (`"blocked": true`) in
/// their profile attributes. Matching-preference rules beyond visibility
/// live with the serving application, which supplies its own filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityFilter;

impl TotalFilter for VisibilityFilter {
    fn apply(
        &self,
        candidates: Vec<Candidate>,
        _ctx: &SelectionContext,
    ) -> Result<Vec<Candidate>, FilterError> {
        Ok(candidates
            .into_iter()
            .filter(|candidate| !flag_set(candidate, "hidden") && !flag_set(candidate, "blocked"))
            .collect())
    }
}

fn flag_set(candidate: &Candidate, key: &str) -> bool {
    candidate
        .extra
        .get(key)
        .and_then(|value| value.as_bool())
        .unwrap_or(false)
}
