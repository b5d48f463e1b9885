use tracing::warn;

use crate::controller::submission::{assemble, has_duplicate_singles};
use crate::model::{
    Counter, FieldPath, FieldValue, LegSheet, Pence, Player, Side, Step, Submission, session_key,
};
use crate::storage::{MatchStore, SessionCache};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Warning,
    Error,
}

/// Message shown above the entry form after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
}

impl Banner {
    fn new(kind: BannerKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Everything one match-entry session owns.
#[derive(Debug, Clone)]
pub struct EntryModel {
    pub match_id: String,
    pub legs: LegSheet,
    pub players: Vec<Player>,
    pub banner: Option<Banner>,
    pub duplicate_warning: bool,
    pub restored: bool,
    pub last_total: Option<Pence>,
    /// Set once a submission is saved and its draft cleared. The session can then be dropped.
    pub closed: bool,
}

impl EntryModel {
    #[must_use]
    pub fn new(match_id: impl Into<String>) -> Self {
        Self {
            match_id: match_id.into(),
            legs: LegSheet::new(),
            players: vec![],
            banner: None,
            duplicate_warning: false,
            restored: false,
            last_total: None,
            closed: false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Msg {
    /// Seeds the sheet from a cached snapshot, or fresh when there is none.
    SessionStarted(Option<LegSheet>),
    PageLoad,
    PlayersLoaded(Vec<Player>),
    PlayersFailed(String),
    FieldSet {
        leg: usize,
        field: FieldPath,
        value: FieldValue,
    },
    Adjusted {
        leg: usize,
        side: Side,
        counter: Counter,
        step: Step,
    },
    SubmitRequested {
        confirmed: bool,
    },
    SubmitCancelled,
    Persisted(Pence),
    PersistFailed(String),
    Checkpointed,
    CacheCleared,
    CacheFailed(String),
}

#[derive(Debug, Clone)]
pub enum Effect {
    LoadPlayers,
    Checkpoint,
    Persist(Submission),
    ClearCache,
}

pub fn update(model: &mut EntryModel, msg: Msg) -> Vec<Effect> {
    match msg {
        Msg::SessionStarted(snapshot) => {
            model.restored = snapshot.is_some();
            model.legs = snapshot.unwrap_or_default();
            vec![]
        }
        Msg::PageLoad => vec![Effect::LoadPlayers],
        Msg::PlayersLoaded(players) => {
            model.players = players;
            vec![]
        }
        Msg::PlayersFailed(e) => {
            model.players = vec![];
            model.banner = Some(Banner::new(
                BannerKind::Error,
                format!("Failed to load players: {e}"),
            ));
            vec![]
        }
        Msg::FieldSet { leg, field, value } => match model.legs.set_field(leg, field, value) {
            Ok(()) => vec![Effect::Checkpoint],
            Err(e) => {
                model.banner = Some(Banner::new(BannerKind::Error, format!("Error: {e}")));
                vec![]
            }
        },
        Msg::Adjusted {
            leg,
            side,
            counter,
            step,
        } => match model.legs.adjust(leg, side, counter, step) {
            Ok(_) => vec![Effect::Checkpoint],
            Err(e) => {
                model.banner = Some(Banner::new(BannerKind::Error, format!("Error: {e}")));
                vec![]
            }
        },
        Msg::SubmitRequested { confirmed } => {
            if !confirmed && has_duplicate_singles(&model.legs) {
                model.duplicate_warning = true;
                return vec![];
            }
            model.duplicate_warning = false;
            match assemble(&model.legs, &model.match_id) {
                Err(e) => {
                    model.banner = Some(Banner::new(BannerKind::Error, format!("Error: {e}")));
                    vec![]
                }
                Ok(submission) if submission.stats.is_empty() => {
                    model.banner = Some(Banner::new(
                        BannerKind::Error,
                        "Error: no players selected, nothing to submit",
                    ));
                    vec![]
                }
                Ok(submission) => vec![Effect::Persist(submission)],
            }
        }
        Msg::SubmitCancelled => {
            model.duplicate_warning = false;
            vec![]
        }
        Msg::Persisted(total) => {
            model.last_total = Some(total);
            model.legs = LegSheet::new();
            model.restored = false;
            model.banner = Some(Banner::new(
                BannerKind::Success,
                format!("Match stats and fines saved successfully! Total fines: {total}"),
            ));
            vec![Effect::ClearCache]
        }
        Msg::PersistFailed(e) => {
            model.banner = Some(Banner::new(BannerKind::Error, format!("Error: {e}")));
            vec![]
        }
        Msg::Checkpointed => vec![],
        Msg::CacheCleared => {
            model.closed = true;
            vec![]
        }
        Msg::CacheFailed(e) => {
            warn!(match_id = %model.match_id, error = %e, "session cache write failed");
            match &mut model.banner {
                None => {
                    model.banner = Some(Banner::new(
                        BannerKind::Warning,
                        format!("Draft could not be saved: {e}"),
                    ));
                }
                Some(banner) => {
                    banner.kind = BannerKind::Warning;
                    banner.text = format!(
                        "{} Warning: the saved draft could not be updated: {e}",
                        banner.text
                    );
                }
            }
            vec![]
        }
    }
}

#[derive(Clone, Copy)]
pub struct Deps<'a> {
    pub store: &'a dyn MatchStore,
    pub cache: &'a dyn SessionCache,
}

pub async fn run_effect(effect: Effect, model: &EntryModel, deps: Deps<'_>) -> Msg {
    match effect {
        Effect::LoadPlayers => match deps.store.list_players().await {
            Ok(players) => Msg::PlayersLoaded(players),
            Err(e) => Msg::PlayersFailed(e.to_string()),
        },
        Effect::Checkpoint => {
            let snapshot = match serde_json::to_string(&model.legs) {
                Ok(snapshot) => snapshot,
                Err(e) => return Msg::CacheFailed(e.to_string()),
            };
            match deps
                .cache
                .set(&session_key(&model.match_id), &snapshot)
                .await
            {
                Ok(()) => Msg::Checkpointed,
                Err(e) => Msg::CacheFailed(e.to_string()),
            }
        }
        Effect::Persist(submission) => {
            match deps
                .store
                .append_submission(&model.match_id, &submission)
                .await
            {
                Ok(()) => Msg::Persisted(submission.total_fines()),
                Err(e) => Msg::PersistFailed(e.to_string()),
            }
        }
        Effect::ClearCache => match deps.cache.clear(&session_key(&model.match_id)).await {
            Ok(()) => Msg::CacheCleared,
            Err(e) => Msg::CacheFailed(e.to_string()),
        },
    }
}

/// Reads the cached snapshot for a match. A missing or unreadable snapshot means a fresh sheet.
pub async fn restore_snapshot(cache: &dyn SessionCache, match_id: &str) -> Option<LegSheet> {
    let key = session_key(match_id);
    let raw = match cache.get(&key).await {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(%key, error = %e, "session cache read failed, starting fresh");
            return None;
        }
    };
    match serde_json::from_str::<LegSheet>(&raw) {
        Ok(legs) => Some(legs),
        Err(e) => {
            warn!(%key, error = %e, "discarding unreadable session snapshot");
            None
        }
    }
}
