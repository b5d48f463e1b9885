use maud::{Markup, html};
use serde_json::json;

use crate::model::{Counter, FieldPath, LegEntry, Player, Side, TextField};

/// Relative to `/match/{id}`, so the page works behind a path prefix.
pub fn action_url(match_id: &str, action: &str) -> String {
    format!("{match_id}/{action}")
}

pub fn tally(match_id: &str, leg: &LegEntry, side: Side, counter: Counter) -> Markup {
    let field = FieldPath::Counter(side, counter).to_string();
    let value = leg.counters(side).count(counter);
    let url = action_url(match_id, "adjust");
    let vals = |step: &str| json!({"leg": leg.leg_index, "field": field, "step": step}).to_string();

    html! {
        div class="tally" {
            button type="button" class="tally-dec" hx-post=(url) hx-vals=(vals("dec"))
                hx-target="#entry" hx-swap="outerHTML" { "-" }
            span class="tally-value" data-field=(field) { (value) }
            button type="button" class="tally-inc" hx-post=(url) hx-vals=(vals("inc"))
                hx-target="#entry" hx-swap="outerHTML" { "+" }
        }
    }
}

pub fn text_input(match_id: &str, leg: &LegEntry, side: Side, text: TextField) -> Markup {
    let field = FieldPath::Text(side, text).to_string();
    let placeholder = match text {
        TextField::Tens => "e.g. 9,8,4",
        TextField::HighestCheckout => "",
    };

    html! {
        input type="text" name="value" class="text-entry" value=(leg.counters(side).text(text))
            placeholder=(placeholder)
            hx-post=(action_url(match_id, "field"))
            hx-vals=(json!({"leg": leg.leg_index, "field": field}).to_string())
            hx-trigger="change" hx-target="#entry" hx-swap="outerHTML";
    }
}

pub fn player_select(
    match_id: &str,
    leg: &LegEntry,
    field: FieldPath,
    players: &[Player],
    duplicate: bool,
) -> Markup {
    let (selected, prompt, exclude) = match field {
        FieldPath::Player2Id => (
            leg.player2_id.as_str(),
            "--Select Partner--",
            Some(leg.player1_id.as_str()),
        ),
        _ => (leg.player1_id.as_str(), "--Select Player--", None),
    };

    html! {
        select.player-select.duplicate-player[duplicate] name="value"
            hx-post=(action_url(match_id, "field"))
            hx-vals=(json!({"leg": leg.leg_index, "field": field.to_string()}).to_string())
            hx-trigger="change" hx-target="#entry" hx-swap="outerHTML" {
            option value="" selected[selected.is_empty()] { (prompt) }
            @for player in players.iter().filter(|p| Some(p.id.as_str()) != exclude) {
                option value=(player.id) selected[player.id == selected] { (player.display_name()) }
            }
        }
    }
}
