use std::collections::{BTreeSet, HashMap};

use crate::model::LegSheet;

/// Player ids picked for more than one singles leg. Doubles legs are not looked at.
#[must_use]
pub fn duplicate_singles_players(legs: &LegSheet) -> BTreeSet<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for leg in legs.singles() {
        if !leg.player1_id.is_empty() {
            *seen.entry(leg.player1_id.as_str()).or_insert(0) += 1;
        }
    }
    seen.into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, _)| id.to_string())
        .collect()
}

/// Reports only. Callers decide whether to ask for confirmation.
#[must_use]
pub fn has_duplicate_singles(legs: &LegSheet) -> bool {
    !duplicate_singles_players(legs).is_empty()
}
