use thiserror::Error;

use crate::model::{
    FINE_RATES, FineRecord, LegEntry, LegSheet, Pence, PlayerCounters, PlayerStatRecord,
    Submission, compute_fine,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssembleError {
    #[error("Leg {leg}: highest checkout '{value}' for player {player_id} is not a number")]
    InvalidCheckout {
        leg: usize,
        player_id: String,
        value: String,
    },
}

/// Flattens the sheet into stat rows and fine rows, in leg order, player 1 before player 2.
///
/// The partner on a doubles leg shares the pairing's result, so their win and loss are
/// written as zero. Partner fields on singles legs are never read. Only positive fines are
/// written.
///
/// # Errors
///
/// Will return `Err` if a non-empty highest checkout is not a whole number
pub fn assemble(legs: &LegSheet, match_id: &str) -> Result<Submission, AssembleError> {
    let mut submission = Submission::default();

    for leg in legs.legs() {
        if !leg.player1_id.is_empty() {
            let stat = stat_record(match_id, leg, &leg.player1_id, &leg.primary, false)?;
            submission.stats.push(stat);

            let fine = compute_fine(&leg.primary, &FINE_RATES);
            if fine > Pence::ZERO {
                submission.fines.push(FineRecord::new(
                    leg.player1_id.clone(),
                    format!("Leg {} Fines", leg.number()),
                    fine,
                ));
            }
        }

        if leg.is_doubles() && !leg.player2_id.is_empty() {
            let stat = stat_record(match_id, leg, &leg.player2_id, &leg.partner, true)?;
            submission.stats.push(stat);

            let fine = compute_fine(&leg.partner, &FINE_RATES);
            if fine > Pence::ZERO {
                submission.fines.push(FineRecord::new(
                    leg.player2_id.clone(),
                    format!("Leg {} Fines (Doubles)", leg.number()),
                    fine,
                ));
            }
        }
    }

    Ok(submission)
}

fn stat_record(
    match_id: &str,
    leg: &LegEntry,
    player_id: &str,
    counters: &PlayerCounters,
    partner: bool,
) -> Result<PlayerStatRecord, AssembleError> {
    let highest_checkout = parse_checkout(&counters.highest_checkout).map_err(|()| {
        AssembleError::InvalidCheckout {
            leg: leg.number(),
            player_id: player_id.to_string(),
            value: counters.highest_checkout.clone(),
        }
    })?;

    Ok(PlayerStatRecord {
        match_id: match_id.to_string(),
        player_id: player_id.to_string(),
        win: if partner { 0 } else { counters.win },
        loss: if partner { 0 } else { counters.loss },
        score_100: counters.score_100,
        score_140: counters.score_140,
        score_180: counters.score_180,
        highest_checkout,
        score_26: counters.score_26,
        tens: counters.tens.clone(),
        miss: counters.miss,
        dotd: counters.dotd,
        is_double: leg.is_doubles(),
    })
}

fn parse_checkout(raw: &str) -> Result<Option<u32>, ()> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<u32>().map(Some).map_err(|_| ())
}
