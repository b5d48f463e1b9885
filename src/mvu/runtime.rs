use tracing::debug;

use crate::mvu::entry::{Deps, EntryModel, Msg, update};

/// Runs the MVU loop for one entry model: seeds with `init_msg` and drains effects.
pub async fn run_entry(model: &mut EntryModel, init_msg: Msg, deps: Deps<'_>) {
    let mut effects = update(model, init_msg);
    while let Some(effect) = effects.pop() {
        debug!(mvu = "effect_start", match_id = %model.match_id, effect = ?effect);
        let msg = super::entry::run_effect(effect, model, deps).await;
        debug!(mvu = "effect_done", match_id = %model.match_id, msg = ?msg);
        let next = update(model, msg);
        effects.extend(next);
    }
}
