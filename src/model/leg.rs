use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Legs per match: five singles followed by two doubles.
pub const LEG_COUNT: usize = 7;
/// First doubles leg. Everything below it is a singles leg.
pub const FIRST_DOUBLES_LEG: usize = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("leg index {0} does not exist, indexes run 0 to 6")]
    LegOutOfRange(usize),
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("field {field} expects {expected}")]
    WrongValueKind {
        field: FieldPath,
        expected: &'static str,
    },
    #[error("invalid count '{value}' for {field}")]
    InvalidCount { field: FieldPath, value: String },
    #[error("snapshot has {0} legs, expected 7")]
    WrongLegCount(usize),
    #[error("snapshot slot {position} holds leg index {found}")]
    MisplacedLeg { position: usize, found: usize },
}

/// Tallies and free text entered for one player in one leg.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PlayerCounters {
    pub win: u32,
    pub loss: u32,
    pub score_100: u32,
    pub score_140: u32,
    pub score_180: u32,
    pub score_26: u32,
    pub miss: u32,
    pub dotd: u32,
    /// Raw text as typed. Parsed once, at assembly.
    pub highest_checkout: String,
    /// Comma separated scores under ten, e.g. `9,8,4`.
    pub tens: String,
}

impl PlayerCounters {
    #[must_use]
    pub fn count(&self, counter: Counter) -> u32 {
        match counter {
            Counter::Win => self.win,
            Counter::Loss => self.loss,
            Counter::Score100 => self.score_100,
            Counter::Score140 => self.score_140,
            Counter::Score180 => self.score_180,
            Counter::Score26 => self.score_26,
            Counter::Miss => self.miss,
            Counter::Dotd => self.dotd,
        }
    }

    fn count_mut(&mut self, counter: Counter) -> &mut u32 {
        match counter {
            Counter::Win => &mut self.win,
            Counter::Loss => &mut self.loss,
            Counter::Score100 => &mut self.score_100,
            Counter::Score140 => &mut self.score_140,
            Counter::Score180 => &mut self.score_180,
            Counter::Score26 => &mut self.score_26,
            Counter::Miss => &mut self.miss,
            Counter::Dotd => &mut self.dotd,
        }
    }

    #[must_use]
    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::HighestCheckout => &self.highest_checkout,
            TextField::Tens => &self.tens,
        }
    }

    fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::HighestCheckout => &mut self.highest_checkout,
            TextField::Tens => &mut self.tens,
        }
    }
}

/// One of the seven fixed slots of a match.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LegEntry {
    pub leg_index: usize,
    #[serde(default)]
    pub player1_id: String,
    #[serde(default)]
    pub player2_id: String,
    #[serde(default)]
    pub primary: PlayerCounters,
    /// Only meaningful on doubles legs.
    #[serde(default)]
    pub partner: PlayerCounters,
}

impl LegEntry {
    #[must_use]
    pub fn new(leg_index: usize) -> Self {
        Self {
            leg_index,
            player1_id: String::new(),
            player2_id: String::new(),
            primary: PlayerCounters::default(),
            partner: PlayerCounters::default(),
        }
    }

    #[must_use]
    pub fn is_doubles(&self) -> bool {
        self.leg_index >= FIRST_DOUBLES_LEG
    }

    /// Leg number as shown to people, starting at 1.
    #[must_use]
    pub fn number(&self) -> usize {
        self.leg_index + 1
    }

    #[must_use]
    pub fn counters(&self, side: Side) -> &PlayerCounters {
        match side {
            Side::Primary => &self.primary,
            Side::Partner => &self.partner,
        }
    }

    fn counters_mut(&mut self, side: Side) -> &mut PlayerCounters {
        match side {
            Side::Primary => &mut self.primary,
            Side::Partner => &mut self.partner,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Primary,
    Partner,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Counter {
    Win,
    Loss,
    Score100,
    Score140,
    Score180,
    Score26,
    Miss,
    Dotd,
}

impl Counter {
    pub const ALL: [Counter; 8] = [
        Counter::Win,
        Counter::Loss,
        Counter::Score100,
        Counter::Score140,
        Counter::Score180,
        Counter::Score26,
        Counter::Miss,
        Counter::Dotd,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Counter::Win => "win",
            Counter::Loss => "loss",
            Counter::Score100 => "score_100",
            Counter::Score140 => "score_140",
            Counter::Score180 => "score_180",
            Counter::Score26 => "score_26",
            Counter::Miss => "miss",
            Counter::Dotd => "dotd",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextField {
    HighestCheckout,
    Tens,
}

impl TextField {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TextField::HighestCheckout => "highest_checkout",
            TextField::Tens => "tens",
        }
    }
}

/// Address of a single editable value inside a leg.
///
/// The string form matches the entry form's field names: `player1_id`, `score_26`,
/// and `player2.` in front of a counter or text name for the partner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Player1Id,
    Player2Id,
    Counter(Side, Counter),
    Text(Side, TextField),
}

const PARTNER_PREFIX: &str = "player2.";

impl FromStr for FieldPath {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "player1_id" => return Ok(FieldPath::Player1Id),
            "player2_id" => return Ok(FieldPath::Player2Id),
            _ => {}
        }
        let (side, name) = match s.strip_prefix(PARTNER_PREFIX) {
            Some(rest) => (Side::Partner, rest),
            None => (Side::Primary, s),
        };
        if let Some(counter) = Counter::ALL.into_iter().find(|c| c.name() == name) {
            return Ok(FieldPath::Counter(side, counter));
        }
        match name {
            "highest_checkout" => Ok(FieldPath::Text(side, TextField::HighestCheckout)),
            "tens" => Ok(FieldPath::Text(side, TextField::Tens)),
            _ => Err(EntryError::UnknownField(s.to_string())),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (side, name) = match self {
            FieldPath::Player1Id => return write!(f, "player1_id"),
            FieldPath::Player2Id => return write!(f, "player2_id"),
            FieldPath::Counter(side, counter) => (side, counter.name()),
            FieldPath::Text(side, field) => (side, field.name()),
        };
        match side {
            Side::Primary => write!(f, "{name}"),
            Side::Partner => write!(f, "{PARTNER_PREFIX}{name}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Count(u32),
    Text(String),
}

impl FieldValue {
    /// Interpret raw form input for the given field.
    ///
    /// # Errors
    ///
    /// Will return `Err` if a counter value is not a non-negative whole number
    pub fn parse_for(field: FieldPath, raw: &str) -> Result<Self, EntryError> {
        match field {
            FieldPath::Counter(..) => raw
                .trim()
                .parse::<u32>()
                .map(FieldValue::Count)
                .map_err(|_| EntryError::InvalidCount {
                    field,
                    value: raw.to_string(),
                }),
            _ => Ok(FieldValue::Text(raw.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Increment,
    Decrement,
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inc" | "+" => Ok(Step::Increment),
            "dec" | "-" => Ok(Step::Decrement),
            other => Err(format!("unknown step '{other}'")),
        }
    }
}

/// The seven legs of a match, in order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "Vec<LegEntry>", into = "Vec<LegEntry>")]
pub struct LegSheet {
    legs: [LegEntry; LEG_COUNT],
}

impl Default for LegSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl LegSheet {
    #[must_use]
    pub fn new() -> Self {
        Self {
            legs: std::array::from_fn(LegEntry::new),
        }
    }

    #[must_use]
    pub fn legs(&self) -> &[LegEntry] {
        &self.legs
    }

    #[must_use]
    pub fn singles(&self) -> &[LegEntry] {
        &self.legs[..FIRST_DOUBLES_LEG]
    }

    /// # Errors
    ///
    /// Will return `Err` if the leg index is past the last leg
    pub fn leg(&self, leg_index: usize) -> Result<&LegEntry, EntryError> {
        self.legs
            .get(leg_index)
            .ok_or(EntryError::LegOutOfRange(leg_index))
    }

    /// No player chosen on any leg.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.legs
            .iter()
            .all(|leg| leg.player1_id.is_empty() && leg.player2_id.is_empty())
    }

    /// The only way values in the sheet change.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the leg does not exist or the value kind does not fit the field
    pub fn set_field(
        &mut self,
        leg_index: usize,
        field: FieldPath,
        value: FieldValue,
    ) -> Result<(), EntryError> {
        let leg = self
            .legs
            .get_mut(leg_index)
            .ok_or(EntryError::LegOutOfRange(leg_index))?;
        match (field, value) {
            (FieldPath::Player1Id, FieldValue::Text(id)) => leg.player1_id = id.trim().to_string(),
            (FieldPath::Player2Id, FieldValue::Text(id)) => leg.player2_id = id.trim().to_string(),
            (FieldPath::Counter(side, counter), FieldValue::Count(n)) => {
                *leg.counters_mut(side).count_mut(counter) = n;
            }
            (FieldPath::Text(side, text), FieldValue::Text(s)) => {
                *leg.counters_mut(side).text_mut(text) = s;
            }
            (field @ FieldPath::Counter(..), FieldValue::Text(_)) => {
                return Err(EntryError::WrongValueKind {
                    field,
                    expected: "a count",
                });
            }
            (field, FieldValue::Count(_)) => {
                return Err(EntryError::WrongValueKind {
                    field,
                    expected: "text",
                });
            }
        }
        Ok(())
    }

    /// Tally button. Decrementing a zero count leaves it at zero.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the leg does not exist
    pub fn adjust(
        &mut self,
        leg_index: usize,
        side: Side,
        counter: Counter,
        step: Step,
    ) -> Result<u32, EntryError> {
        let current = self.leg(leg_index)?.counters(side).count(counter);
        let next = match step {
            Step::Increment => current.saturating_add(1),
            Step::Decrement => current.saturating_sub(1),
        };
        self.set_field(
            leg_index,
            FieldPath::Counter(side, counter),
            FieldValue::Count(next),
        )?;
        Ok(next)
    }
}

impl TryFrom<Vec<LegEntry>> for LegSheet {
    type Error = EntryError;

    fn try_from(legs: Vec<LegEntry>) -> Result<Self, Self::Error> {
        let count = legs.len();
        let legs: [LegEntry; LEG_COUNT] = legs
            .try_into()
            .map_err(|_| EntryError::WrongLegCount(count))?;
        if let Some((position, leg)) = legs
            .iter()
            .enumerate()
            .find(|(position, leg)| leg.leg_index != *position)
        {
            return Err(EntryError::MisplacedLeg {
                position,
                found: leg.leg_index,
            });
        }
        Ok(Self { legs })
    }
}

impl From<LegSheet> for Vec<LegEntry> {
    fn from(sheet: LegSheet) -> Self {
        sheet.legs.into()
    }
}
