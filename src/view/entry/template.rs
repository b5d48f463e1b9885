use maud::{Markup, html};
use serde_json::json;
use std::collections::BTreeSet;

use super::utils::{action_url, player_select, tally, text_input};
use crate::controller::submission::duplicate_singles_players;
use crate::model::{
    Counter, FINE_RATES, FieldPath, LegEntry, Pence, Player, Side, TextField, compute_fine,
};
use crate::mvu::entry::{Banner, BannerKind, EntryModel};
use crate::view::index::render_head;

const COLUMNS: [&str; 13] = [
    "Leg", "Player", "Win", "Loss", "100+", "140+", "180", "Checkout", "26s", "Tens", "Miss",
    "DOTD", "Fine",
];

#[must_use]
pub fn render_entry_page(model: &EntryModel) -> Markup {
    html! {
        (maud::DOCTYPE)
        (render_head("Match Stats Entry"))
        body {
            (render_entry(model))
        }
    }
}

/// The swappable part of the page. Every htmx action re-renders this.
#[must_use]
pub fn render_entry(model: &EntryModel) -> Markup {
    let duplicates = duplicate_singles_players(&model.legs);
    let match_id = model.match_id.as_str();

    html! {
        div id="entry" class="entry" {
            div class="entry-header" {
                h2 { "Match Stats Entry" }
                p { strong { "Match ID: " } (match_id) }
                p { em { "Format: 5 Singles (Legs 1-5) + 2 Doubles (Legs 6-7)" } }
                @if model.restored {
                    p class="restored" { "Restored unsaved entries for this match." }
                }
            }
            @if let Some(banner) = &model.banner {
                (render_banner(banner))
            }
            @if model.duplicate_warning {
                (render_duplicate_warning(match_id))
            }
            @if model.players.is_empty() {
                div class="banner banner-warning" {
                    "No players found in database. Please add some players to the directory."
                }
            }
            (render_fine_rates())
            div class="table-wrap" {
                table class="match-table" {
                    thead {
                        tr {
                            @for column in COLUMNS {
                                th { (column) }
                            }
                        }
                    }
                    tbody {
                        @for leg in model.legs.legs() {
                            (render_leg_rows(match_id, leg, &model.players, &duplicates))
                        }
                    }
                }
            }
            div class="submit-row" {
                button type="button" class="submit"
                    hx-post=(action_url(match_id, "submit"))
                    hx-vals=(json!({"confirmed": 0}).to_string())
                    hx-target="#entry" hx-swap="outerHTML" hx-disabled-elt="this" {
                    "Submit All Stats & Calculate Fines"
                }
            }
        }
    }
}

fn render_banner(banner: &Banner) -> Markup {
    let class = match banner.kind {
        BannerKind::Success => "banner banner-success",
        BannerKind::Warning => "banner banner-warning",
        BannerKind::Error => "banner banner-error",
    };
    html! {
        div class=(class) role="status" { (banner.text) }
    }
}

fn render_duplicate_warning(match_id: &str) -> Markup {
    html! {
        div class="modal-backdrop" {
            div class="modal" role="dialog" {
                h3 { "Duplicate Player Warning" }
                p {
                    "You have the same player selected for multiple singles matches. "
                    "Are you sure you want to continue?"
                }
                div class="modal-actions" {
                    button type="button" class="cancel" hx-post=(action_url(match_id, "cancel"))
                        hx-target="#entry" hx-swap="outerHTML" { "Cancel" }
                    button type="button" class="confirm" hx-post=(action_url(match_id, "submit"))
                        hx-vals=(json!({"confirmed": 1}).to_string())
                        hx-target="#entry" hx-swap="outerHTML" { "Continue Anyway" }
                }
            }
        }
    }
}

fn render_fine_rates() -> Markup {
    html! {
        div class="fine-rates" {
            strong { "Fine Rates: " }
            "26s: " (Pence(FINE_RATES.score_26).to_string()) " each | "
            "Misses: " (Pence(FINE_RATES.miss).to_string()) " each | "
            "DOTD: " (Pence(FINE_RATES.dotd).to_string()) " each | "
            "Tens: score in pence (e.g. 9 = 9p)"
        }
    }
}

fn render_leg_rows(
    match_id: &str,
    leg: &LegEntry,
    players: &[Player],
    duplicates: &BTreeSet<String>,
) -> Markup {
    let doubles = leg.is_doubles();
    let rowspan = if doubles { "2" } else { "1" };
    let duplicate = !doubles && duplicates.contains(&leg.player1_id);
    let row_class = if doubles { "leg-row doubles" } else { "leg-row singles" };

    html! {
        tr class=(row_class) data-leg=(leg.number()) {
            td class="leg-number" rowspan=(rowspan) {
                (leg.number())
                @if doubles { br; small { "Doubles" } }
            }
            td { (player_select(match_id, leg, FieldPath::Player1Id, players, duplicate)) }
            td rowspan=(rowspan) { (tally(match_id, leg, Side::Primary, Counter::Win)) }
            td rowspan=(rowspan) { (tally(match_id, leg, Side::Primary, Counter::Loss)) }
            (render_player_cells(match_id, leg, Side::Primary))
        }
        @if doubles {
            tr class="leg-row doubles partner" data-leg=(leg.number()) {
                td { (player_select(match_id, leg, FieldPath::Player2Id, players, false)) }
                (render_player_cells(match_id, leg, Side::Partner))
            }
        }
    }
}

fn render_player_cells(match_id: &str, leg: &LegEntry, side: Side) -> Markup {
    let fine = compute_fine(leg.counters(side), &FINE_RATES);

    html! {
        td { (tally(match_id, leg, side, Counter::Score100)) }
        td { (tally(match_id, leg, side, Counter::Score140)) }
        td { (tally(match_id, leg, side, Counter::Score180)) }
        td { (text_input(match_id, leg, side, TextField::HighestCheckout)) }
        td { (tally(match_id, leg, side, Counter::Score26)) }
        td { (text_input(match_id, leg, side, TextField::Tens)) }
        td { (tally(match_id, leg, side, Counter::Miss)) }
        td { (tally(match_id, leg, side, Counter::Dotd)) }
        td class="fine" { (fine.to_string()) }
    }
}
