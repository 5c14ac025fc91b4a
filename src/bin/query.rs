use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, Write};
use std::path::PathBuf;

use clap::Parser;
use log::warn;

use connectq::persist::{BinaryFormat, LookupTable};
use connectq::session::{Command, Session};
use connectq::solver::optimal_moves;
use connectq::{play_moves, Board, Error, Game, Rules};

#[derive(Debug, Parser)]
#[command(name = "query", about = "Look up positions in a solved binary table")]
struct Args {
    /// Binary table produced by make-binary-file or solve --binary-out
    #[arg(long)]
    table: PathBuf,

    /// Moves from the empty board as 1-based column digits, e.g. 4453
    #[arg(long, conflicts_with = "board")]
    moves: Option<String>,

    /// Board rows top first, separated by '/', using A, B and '.'
    #[arg(long)]
    board: Option<String>,

    #[arg(long, default_value_t = 7)]
    width: u8,

    #[arg(long, default_value_t = 6)]
    height: u8,

    #[arg(long, default_value_t = 4)]
    connect: u8,

    /// Play interactively against the table, reading commands from stdin
    #[arg(long, conflicts_with_all = ["moves", "board"])]
    play: bool,
}

fn play<R: Read + Seek>(game: &Game, table: &mut LookupTable<R>) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut rng = rand::thread_rng();
    let mut session = Session::new(game);
    let mut score_of = |key: u64| table.lookup(key);

    writeln!(out, "*** Connect-{} ({}x{}) ***\n", game.rules().connect, game.rules().width, game.rules().height)?;
    writeln!(out, "Type 'help' for help, 'quit' to quit.\n")?;

    let mut lines = stdin.lock().lines();
    loop {
        session.write_status(&mut out)?;
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next() else { break };
        let command = Command::parse(&line?);
        writeln!(out)?;
        match session.execute(&command, &mut score_of, &mut rng, &mut out) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                warn!("[play] {e}");
                writeln!(out)?;
            }
        }
    }
    writeln!(out, "Bye!")?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let game = Game::new(Rules::new(args.width, args.height, args.connect)?)?;

    let board = match (&args.moves, &args.board) {
        (_, Some(rows)) => Board::parse_rows(game.rules(), rows)?,
        (Some(moves), None) => play_moves(game.rules(), moves)?,
        (None, None) => game.empty_board(),
    };

    let format = BinaryFormat::from_constants(game.constants());
    let mut table = LookupTable::open(BufReader::new(File::open(&args.table)?), format)?;
    if table.is_empty() {
        warn!("[query] table {} holds no records", args.table.display());
    }
    if args.play {
        return play(&game, &mut table);
    }

    let (_, key) = game.canonical(&board)?;
    println!("{board}");
    println!("[query] Key {}", game.key_text(key)?);

    let trivial = game.trivial_score(&board)?;
    if trivial.outcome().is_resolved() {
        println!("[query] Game over: {trivial}");
        return Ok(());
    }

    match table.lookup(key) {
        Ok(score) => println!("[query] Found: {score}"),
        Err(Error::NotFound { .. }) => println!("[query] Not found in table"),
        Err(e) => return Err(e.into()),
    }

    match optimal_moves(&game, &board, |child| table.lookup(child))? {
        Some(choice) => {
            let columns: Vec<String> = choice.columns.iter().map(|c| (c + 1).to_string()).collect();
            println!(
                "[query] Best moves: {} ({})",
                columns.join(","),
                choice.child_score
            );
        }
        None => println!("[query] No legal moves"),
    }

    Ok(())
}
