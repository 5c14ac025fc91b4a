use connectq::base62;
use connectq::rules::{num_digits_required, Rules};
use connectq::Error;

#[test]
fn base62_fixed_width_codec() {
    assert_eq!(base62::encode(0, 3).unwrap(), "000");
    assert_eq!(base62::encode(61, 1).unwrap(), "z");
    assert_eq!(base62::encode(62, 2).unwrap(), "10");
    assert_eq!(base62::decode("zz").unwrap(), 62 * 61 + 61);
    assert!(matches!(
        base62::encode(62, 1),
        Err(Error::ValueTooLarge { value: 62, digits: 1 })
    ));
    assert!(base62::decode("a-b").is_err());
}

#[test]
fn base62_text_sorts_like_numbers() {
    let values = [0u64, 9, 10, 35, 36, 61, 62, 100, 3843, 3844, 200_000];
    let texts: Vec<String> = values.iter().map(|&v| base62::encode(v, 4).unwrap()).collect();
    let mut sorted = texts.clone();
    sorted.sort();
    assert_eq!(texts, sorted);
}

#[test]
fn digit_counts() {
    assert_eq!(num_digits_required(62, 1), 0);
    assert_eq!(num_digits_required(62, 62), 1);
    assert_eq!(num_digits_required(62, 63), 2);
    assert_eq!(num_digits_required(256, 256), 1);
}

#[test]
fn standard_constants() {
    let c = Rules::standard().constants().unwrap();
    assert_eq!(c.number_of_possible_columns, 111);
    assert_eq!(c.number_of_boards_in_column_representation, 111u64.pow(7));
    assert_eq!(c.num_base62_board_digits, 8);
    assert_eq!(c.num_base256_board_digits, 6);
    assert_eq!(c.num_base62_ply_digits, 1);

    let json = serde_json::to_value(c).unwrap();
    assert_eq!(json["number_of_possible_columns"], 111);
}

#[test]
fn invalid_geometries_are_rejected() {
    assert!(matches!(Rules::new(0, 6, 4), Err(Error::InvalidRules { .. })));
    assert!(matches!(Rules::new(8, 8, 4), Err(Error::InvalidRules { .. })));
    assert!(matches!(Rules::new(4, 13, 4), Err(Error::InvalidRules { .. })));
    assert!(Rules::new(1, 1, 1).is_ok());
}

#[test]
fn small_geometry_constants() {
    let c = Rules::new(1, 1, 1).unwrap().constants().unwrap();
    assert_eq!(c.number_of_possible_columns, 3);
    assert_eq!(c.num_base62_board_digits, 1);
    assert_eq!(c.num_base256_board_digits, 1);
    assert_eq!(c.num_base62_ply_digits, 1);

    let c = Rules::new(9, 7, 2).unwrap().constants().unwrap();
    assert_eq!(c.num_base62_ply_digits, 2);
}
