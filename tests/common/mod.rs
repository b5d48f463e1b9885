#![allow(dead_code)]

use std::sync::Arc;

use rusty_darts::Sessions;
use rusty_darts::model::{FieldPath, FieldValue, LegSheet, Player};
use rusty_darts::storage::{MatchStore, MemoryStore, SessionCache};

pub fn player(id: &str, first: &str, last: &str) -> Player {
    Player {
        id: id.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
    }
}

pub fn roster() -> Vec<Player> {
    vec![
        player("p1", "Alice", "Archer"),
        player("p2", "Bob", "Bullseye"),
        player("p3", "Carol", "Checkout"),
        player("p4", "Dave", "Double"),
    ]
}

pub fn sessions_over(store: MemoryStore) -> Sessions {
    let matches: Arc<dyn MatchStore> = Arc::new(store.clone());
    let cache: Arc<dyn SessionCache> = Arc::new(store);
    Sessions::new(matches, cache)
}

/// Sets `field` on `leg` from raw form text, panicking on bad input.
pub fn set(sheet: &mut LegSheet, leg: usize, field: &str, raw: &str) {
    let field: FieldPath = field.parse().expect("known field");
    let value = FieldValue::parse_for(field, raw).expect("valid value");
    sheet.set_field(leg, field, value).expect("leg in range");
}
