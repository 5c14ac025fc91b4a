use rand::SeedableRng;
use rand_pcg::Pcg64;

use connectq::error::Result;
use connectq::session::{score_board, Command, Session};
use connectq::solver::{optimal_moves, solve_in_memory, Solution};
use connectq::{Error, Game, Rules, Score};

fn solved(width: u8, height: u8, connect: u8) -> (Game, Solution) {
    let game = Game::new(Rules::new(width, height, connect).unwrap()).unwrap();
    let solution = solve_in_memory(&game, false).unwrap();
    (game, solution)
}

fn lookup(solution: &Solution) -> impl FnMut(u64) -> Result<Score> + '_ {
    move |key| solution.score_of(key).ok_or(Error::NotFound { board: key })
}

fn run(session: &mut Session<'_>, solution: &Solution, command: Command) -> String {
    let mut out = Vec::new();
    let mut rng = Pcg64::seed_from_u64(7);
    let mut score_of = lookup(solution);
    assert!(session.execute(&command, &mut score_of, &mut rng, &mut out).unwrap());
    String::from_utf8(out).unwrap()
}

#[test]
fn commands_parse_like_the_prompt_expects() {
    assert_eq!(Command::parse(""), Command::Empty);
    assert_eq!(Command::parse("  H "), Command::Help);
    assert_eq!(Command::parse("info"), Command::Info);
    assert_eq!(Command::parse("m"), Command::ComputerMove);
    assert_eq!(Command::parse("4"), Command::Drop(4));
    assert_eq!(Command::parse("0"), Command::Drop(0));
    assert_eq!(Command::parse("u"), Command::Undo);
    assert_eq!(Command::parse("reset"), Command::Reset);
    assert_eq!(Command::parse("Q"), Command::Quit);
    assert_eq!(Command::parse("xyzzy"), Command::Unknown("xyzzy".into()));
}

#[test]
fn illegal_drops_are_reported_and_ignored() {
    let (game, solution) = solved(2, 2, 2);
    let mut session = Session::new(&game);

    run(&mut session, &solution, Command::Drop(1));
    run(&mut session, &solution, Command::Drop(1));
    assert_eq!(session.moves(), &[0, 0]);

    assert!(run(&mut session, &solution, Command::Drop(1)).contains("column is full"));
    assert!(run(&mut session, &solution, Command::Drop(3)).contains("column is invalid"));
    assert!(run(&mut session, &solution, Command::Drop(0)).contains("column is invalid"));
    assert_eq!(session.moves(), &[0, 0]);
}

#[test]
fn undo_and_reset_walk_back_the_history() {
    let (game, solution) = solved(2, 2, 2);
    let mut session = Session::new(&game);

    assert!(run(&mut session, &solution, Command::Undo).contains("No move to undo"));
    run(&mut session, &solution, Command::Drop(2));
    run(&mut session, &solution, Command::Drop(1));
    run(&mut session, &solution, Command::Undo);
    assert_eq!(session.moves(), &[1]);
    assert_eq!(*session.board(), connectq::play_moves(game.rules(), "2").unwrap());

    run(&mut session, &solution, Command::Reset);
    assert!(session.moves().is_empty());
    assert_eq!(*session.board(), game.empty_board());
}

#[test]
fn info_lists_every_column() {
    let (game, solution) = solved(2, 2, 2);
    let mut session = Session::new(&game);
    run(&mut session, &solution, Command::Drop(1));
    run(&mut session, &solution, Command::Drop(1));

    let text = run(&mut session, &solution, Command::Info);
    assert!(text.contains("Moves so far ....... : 1: A1, 2: B1"));
    assert!(text.contains("  1 : impossible (column full)"));

    let mut score_of = lookup(&solution);
    let here = score_board(&game, session.board(), &mut score_of).unwrap();
    assert!(text.contains(&format!("Current score ...... : {here}")));
}

#[test]
fn computer_plays_an_optimal_move() {
    let (game, solution) = solved(3, 3, 3);
    let mut session = Session::new(&game);

    let mut score_of = lookup(&solution);
    let choice = optimal_moves(&game, session.board(), &mut score_of).unwrap().unwrap();

    let text = run(&mut session, &solution, Command::ComputerMove);
    assert!(text.starts_with("Optimal moves: "));
    let played = session.moves()[0];
    assert!(choice.columns.contains(&played));
    assert_eq!(score_board(&game, session.board(), &mut score_of).unwrap(), choice.child_score);
}

#[test]
fn computer_self_play_follows_the_root_score() {
    let (game, solution) = solved(4, 3, 3);
    let mut session = Session::new(&game);
    let root = solution.root.score;

    for _ in 0..root.ply() {
        run(&mut session, &solution, Command::ComputerMove);
    }
    assert_eq!(session.moves().len(), usize::from(root.ply()));
    assert_eq!(game.trivial_score(session.board()).unwrap().outcome(), root.outcome());
    assert!(run(&mut session, &solution, Command::ComputerMove).contains("The game is finished."));

    let mut status = Vec::new();
    session.write_status(&mut status).unwrap();
    let status = String::from_utf8(status).unwrap();
    assert!(status.contains(&format!("after {} moves.", root.ply())));
}

#[test]
fn quit_ends_the_session() {
    let (game, solution) = solved(1, 1, 1);
    let mut session = Session::new(&game);
    let mut rng = Pcg64::seed_from_u64(1);
    let mut score_of = lookup(&solution);
    let mut out = Vec::new();
    assert!(!session.execute(&Command::Quit, &mut score_of, &mut rng, &mut out).unwrap());
    assert!(out.is_empty());
}
