use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use connectq::{drop_chip, play_moves, Board, ColumnEncoder, Normalizer, Permutation, Rules};

fn random_boards(rules: &Rules, count: usize, seed: u64) -> Vec<Board> {
    let mut rng = Pcg64::seed_from_u64(seed);
    let mut out = Vec::new();
    while out.len() < count {
        let mut board = Board::empty(rules).unwrap();
        let plies = rng.gen_range(0..rules.cells());
        for _ in 0..plies {
            if board.trivial_outcome(rules.connect).unwrap().is_resolved() {
                break;
            }
            let open: Vec<u8> = (0..rules.width).filter(|&x| !board.is_column_full(x)).collect();
            board = drop_chip(&board, open[rng.gen_range(0..open.len())]).unwrap();
        }
        out.push(board);
    }
    out
}

#[test]
fn gravity_group_is_the_mirror_only() {
    let rules = Rules::standard();
    let normalizer = Normalizer::for_gravity(&rules);
    assert_eq!(normalizer.permutations().len(), 1);
    assert_eq!(normalizer.permutations()[0], Permutation::mirror_horizontally(&rules));
}

#[test]
fn closure_of_both_mirrors_has_four_elements() {
    let rules = Rules::standard();
    let gens = [
        Permutation::mirror_horizontally(&rules),
        Permutation::mirror_vertically(&rules),
    ];
    // Identity is dropped: the half turn plus the two mirrors remain.
    assert_eq!(Normalizer::new(&rules, &gens).permutations().len(), 3);
}

#[test]
fn square_closure_with_transpose_is_dihedral() {
    let rules = Rules::new(3, 3, 3).unwrap();
    let gens = [
        Permutation::mirror_horizontally(&rules),
        Permutation::transpose(&rules).unwrap(),
    ];
    assert_eq!(Normalizer::new(&rules, &gens).permutations().len(), 7);
}

#[test]
fn transpose_needs_a_square_board() {
    assert!(Permutation::transpose(&Rules::standard()).is_err());
}

#[test]
fn mirror_composed_with_itself_is_identity() {
    let rules = Rules::standard();
    let m = Permutation::mirror_horizontally(&rules);
    assert!(m.compose(&m).is_identity());
    assert!(!m.is_identity());
}

#[test]
fn mirror_moves_cells_across() {
    let rules = Rules::standard();
    let left = play_moves(&rules, "1").unwrap();
    let right = play_moves(&rules, "7").unwrap();
    assert_eq!(Permutation::mirror_horizontally(&rules).apply(&left), right);
}

#[test]
fn normalize_is_idempotent_and_mirror_invariant() {
    let rules = Rules::standard();
    let enc = ColumnEncoder::new(rules.height, rules.connect).unwrap();
    let normalizer = Normalizer::for_gravity(&rules);
    let mirror = Permutation::mirror_horizontally(&rules);

    for board in random_boards(&rules, 300, 42) {
        let (canon, key) = normalizer.normalize_with_key(&board, &enc).unwrap();
        assert!(key <= board.to_integer(&enc).unwrap());
        assert_eq!(canon.to_integer(&enc).unwrap(), key);
        assert_eq!(normalizer.normalize(&canon, &enc).unwrap(), canon);
        assert_eq!(normalizer.normalize(&mirror.apply(&board), &enc).unwrap(), canon);
    }
}

#[test]
fn opening_moves_normalize_to_the_right_half() {
    let rules = Rules::standard();
    let enc = ColumnEncoder::new(rules.height, rules.connect).unwrap();
    let normalizer = Normalizer::for_gravity(&rules);
    let canon = normalizer.normalize(&play_moves(&rules, "1").unwrap(), &enc).unwrap();
    assert_eq!(canon, play_moves(&rules, "7").unwrap());
}
