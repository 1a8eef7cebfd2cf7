use clap::Subcommand;
use dayboard_core::memory::{best_score, record_score};
use dayboard_core::{FlipOutcome, ItemDb, MemoryGame};
use serde_json::json;

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum MemoryAction {
    /// Deal a new shuffled deck
    New {
        /// Shuffle seed, for a repeatable layout
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Turn a card over
    Flip {
        /// Card index (0-23)
        index: usize,
    },
    /// Show the board
    Show,
    /// Show the best score
    Best,
}

pub fn run(action: MemoryAction) -> CliResult {
    let db = ItemDb::open()?;

    match action {
        MemoryAction::New { seed } => {
            let game = MemoryGame::new(seed);
            game.save(&db)?;
            print_board(&game, best_score(&db)?)?;
        }
        MemoryAction::Flip { index } => {
            let mut game = MemoryGame::load(&db)?
                .ok_or("no game in progress; run `dayboard memory new`")?;
            let outcome = game.flip(index)?;
            game.save(&db)?;
            let new_best = match outcome {
                FlipOutcome::Completed { moves } => record_score(&db, moves)?,
                _ => false,
            };
            print_json(&json!({
                "result": outcome,
                "newBest": new_best,
                "moves": game.moves(),
                "board": game.board(),
            }))?;
        }
        MemoryAction::Show => {
            let game = MemoryGame::load(&db)?
                .ok_or("no game in progress; run `dayboard memory new`")?;
            print_board(&game, best_score(&db)?)?;
        }
        MemoryAction::Best => match best_score(&db)? {
            Some(best) => println!("{best}"),
            None => println!("no finished games yet"),
        },
    }
    Ok(())
}

fn print_board(game: &MemoryGame, best: Option<u32>) -> CliResult {
    print_json(&json!({
        "moves": game.moves(),
        "matchedPairs": game.matched_pairs(),
        "complete": game.is_complete(),
        "best": best,
        "board": game.board(),
    }))
}
