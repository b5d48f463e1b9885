mod common;

use rusty_darts::model::{
    Counter, EntryError, FieldPath, FieldValue, LegEntry, LegSheet, Side, Step, TextField,
};

#[test]
fn test2_fresh_sheet_layout() {
    let sheet = LegSheet::new();
    assert_eq!(sheet.legs().len(), 7);
    assert_eq!(sheet.singles().len(), 5);
    for (i, leg) in sheet.legs().iter().enumerate() {
        assert_eq!(leg.leg_index, i);
        assert_eq!(leg.is_doubles(), i >= 5);
        assert_eq!(leg.number(), i + 1);
        assert!(leg.player1_id.is_empty());
        assert!(leg.player2_id.is_empty());
        for counter in Counter::ALL {
            assert_eq!(leg.counters(Side::Primary).count(counter), 0);
            assert_eq!(leg.counters(Side::Partner).count(counter), 0);
        }
    }
    assert!(sheet.is_blank());
}

#[test]
fn test2_decrement_never_goes_negative() {
    let mut sheet = LegSheet::new();
    let after = sheet
        .adjust(0, Side::Primary, Counter::Miss, Step::Decrement)
        .unwrap();
    assert_eq!(after, 0);

    sheet
        .adjust(0, Side::Primary, Counter::Miss, Step::Increment)
        .unwrap();
    sheet
        .adjust(0, Side::Primary, Counter::Miss, Step::Increment)
        .unwrap();
    let after = sheet
        .adjust(0, Side::Primary, Counter::Miss, Step::Decrement)
        .unwrap();
    assert_eq!(after, 1);
    assert_eq!(sheet.legs()[0].primary.miss, 1);
}

#[test]
fn test2_partner_counters_are_separate() {
    let mut sheet = LegSheet::new();
    sheet
        .adjust(5, Side::Partner, Counter::Dotd, Step::Increment)
        .unwrap();
    assert_eq!(sheet.legs()[5].partner.dotd, 1);
    assert_eq!(sheet.legs()[5].primary.dotd, 0);
}

#[test]
fn test2_set_field_writes_and_trims_ids() {
    let mut sheet = LegSheet::new();
    common::set(&mut sheet, 2, "player1_id", "  p3 ");
    common::set(&mut sheet, 6, "player2_id", "p4");
    common::set(&mut sheet, 6, "player2.tens", "9,8");
    common::set(&mut sheet, 1, "highest_checkout", "121");
    common::set(&mut sheet, 1, "score_180", "2");

    assert_eq!(sheet.legs()[2].player1_id, "p3");
    assert_eq!(sheet.legs()[6].player2_id, "p4");
    assert_eq!(sheet.legs()[6].partner.tens, "9,8");
    assert_eq!(sheet.legs()[1].primary.highest_checkout, "121");
    assert_eq!(sheet.legs()[1].primary.score_180, 2);
    assert!(!sheet.is_blank());
}

#[test]
fn test2_set_field_rejects_bad_input() {
    let mut sheet = LegSheet::new();
    let err = sheet
        .set_field(7, FieldPath::Player1Id, FieldValue::Text("p1".into()))
        .unwrap_err();
    assert_eq!(err, EntryError::LegOutOfRange(7));

    let err = sheet
        .set_field(
            0,
            FieldPath::Counter(Side::Primary, Counter::Win),
            FieldValue::Text("one".into()),
        )
        .unwrap_err();
    assert!(matches!(err, EntryError::WrongValueKind { .. }));

    let err = sheet
        .set_field(
            0,
            FieldPath::Text(Side::Primary, TextField::Tens),
            FieldValue::Count(3),
        )
        .unwrap_err();
    assert!(matches!(err, EntryError::WrongValueKind { .. }));

    let err = FieldValue::parse_for(FieldPath::Counter(Side::Primary, Counter::Miss), "-1")
        .unwrap_err();
    assert!(matches!(err, EntryError::InvalidCount { .. }));

    assert_eq!(sheet, LegSheet::new());
}

#[test]
fn test2_field_paths_read_and_print_the_same() {
    let names = [
        "player1_id",
        "player2_id",
        "win",
        "score_100",
        "highest_checkout",
        "tens",
        "player2.dotd",
        "player2.highest_checkout",
    ];
    for name in names {
        let path: FieldPath = name.parse().unwrap();
        assert_eq!(path.to_string(), name);
    }
    assert_eq!(
        "player2.miss".parse::<FieldPath>().unwrap(),
        FieldPath::Counter(Side::Partner, Counter::Miss)
    );
    assert!(matches!(
        "score_99".parse::<FieldPath>(),
        Err(EntryError::UnknownField(_))
    ));
}

#[test]
fn test2_steps() {
    assert_eq!("inc".parse::<Step>().unwrap(), Step::Increment);
    assert_eq!("-".parse::<Step>().unwrap(), Step::Decrement);
    assert!("up".parse::<Step>().is_err());
}

#[test]
fn test2_snapshot_restores_every_value() -> Result<(), Box<dyn std::error::Error>> {
    let mut sheet = LegSheet::new();
    common::set(&mut sheet, 0, "player1_id", "p1");
    common::set(&mut sheet, 0, "score_26", "3");
    common::set(&mut sheet, 5, "player2_id", "p2");
    common::set(&mut sheet, 5, "player2.tens", "7, 2");

    let snapshot = serde_json::to_string(&sheet)?;
    let restored: LegSheet = serde_json::from_str(&snapshot)?;
    assert_eq!(restored, sheet);
    Ok(())
}

#[test]
fn test2_snapshot_must_hold_seven_ordered_legs() {
    let short: Vec<LegEntry> = (0..6).map(LegEntry::new).collect();
    assert_eq!(
        LegSheet::try_from(short).unwrap_err(),
        EntryError::WrongLegCount(6)
    );

    let mut swapped: Vec<LegEntry> = (0..7).map(LegEntry::new).collect();
    swapped.swap(1, 2);
    assert_eq!(
        LegSheet::try_from(swapped).unwrap_err(),
        EntryError::MisplacedLeg {
            position: 1,
            found: 2
        }
    );

    let json = serde_json::to_string(&vec![LegEntry::new(0)]).unwrap();
    assert!(serde_json::from_str::<LegSheet>(&json).is_err());
}
