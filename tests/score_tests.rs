use connectq::engine::score::MAX_PLY;
use connectq::{Error, Outcome, Score};

const ALL: [Outcome; 4] = [Outcome::AWins, Outcome::BWins, Outcome::Draw, Outcome::Indeterminate];

#[test]
fn byte_packing_round_trips() {
    for outcome in ALL {
        for ply in 0..=MAX_PLY {
            let s = Score::new(outcome, ply);
            assert_eq!(Score::from_byte(s.to_byte().unwrap()), s);
        }
    }
}

#[test]
fn byte_layout_is_tag_then_ply() {
    assert_eq!(Score::new(Outcome::Draw, 7).to_byte().unwrap(), 0b00_000111);
    assert_eq!(Score::new(Outcome::AWins, 5).to_byte().unwrap(), 0b01_000101);
    assert_eq!(Score::new(Outcome::BWins, 63).to_byte().unwrap(), 0b10_111111);
    assert_eq!(Score::INDETERMINATE.to_byte().unwrap(), 0b11_000000);
}

#[test]
fn indeterminate_always_has_ply_zero() {
    let s = Score::new(Outcome::Indeterminate, 9);
    assert_eq!(s.ply(), 0);
    assert_eq!(s, Score::INDETERMINATE);
    assert_eq!(Score::from_byte(0xFF), Score::INDETERMINATE);
}

#[test]
fn ply_past_six_bits_is_rejected() {
    assert!(matches!(
        Score::new(Outcome::AWins, 64).to_byte(),
        Err(Error::PlyOutOfRange { ply: 64 })
    ));
    assert!(matches!(
        Score::new(Outcome::Draw, 63).one_ply_earlier(),
        Err(Error::PlyOutOfRange { ply: 64 })
    ));
    assert_eq!(
        Score::new(Outcome::Draw, 62).one_ply_earlier().unwrap(),
        Score::new(Outcome::Draw, 63)
    );
}

#[test]
fn legacy_bytes_decode_to_fixed_mapping() {
    assert_eq!(Score::from_legacy_byte(1, 10), Score::new(Outcome::AWins, 0));
    assert_eq!(Score::from_legacy_byte(12, 10), Score::new(Outcome::AWins, 11));
    assert_eq!(Score::from_legacy_byte(255, 10), Score::new(Outcome::BWins, 0));
    assert_eq!(Score::from_legacy_byte(250, 10), Score::new(Outcome::BWins, 5));
    assert_eq!(Score::from_legacy_byte(0, 10), Score::new(Outcome::Draw, 10));
}

#[test]
fn text_form_is_outcome_char_and_base62_ply() {
    assert_eq!(Score::new(Outcome::AWins, 5).to_text(1).unwrap(), "A5");
    assert_eq!(Score::new(Outcome::BWins, 0).to_text(1).unwrap(), "B0");
    assert_eq!(Score::new(Outcome::Draw, 12).to_text(1).unwrap(), "-C");
    assert_eq!(Score::INDETERMINATE.to_text(1).unwrap(), "?0");
    assert_eq!(Score::new(Outcome::Draw, 42).to_text(2).unwrap(), "-0g");

    assert_eq!(Score::parse_text("-C").unwrap(), Score::new(Outcome::Draw, 12));
    assert_eq!(Score::parse_text("B0").unwrap(), Score::new(Outcome::BWins, 0));
    assert!(matches!(
        Score::parse_text("X1"),
        Err(Error::InvalidCharacter { character: 'X', .. })
    ));
    assert!(matches!(
        Score::parse_text("A!"),
        Err(Error::InvalidCharacter { character: '!', .. })
    ));
}

#[test]
fn display_names_the_outcome() {
    assert_eq!(Score::new(Outcome::AWins, 1).to_string(), "A wins in 1 ply");
    assert_eq!(Score::new(Outcome::Draw, 4).to_string(), "draw in 4 ply");
    assert_eq!(Score::INDETERMINATE.to_string(), "indeterminate");
}
