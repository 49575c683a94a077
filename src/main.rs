//! Plays the engine against itself: every move is picked at random, except
//! that a mate in one is always taken.

use patzer::chess::core::{Move, Player};
use patzer::chess::game::Game;
use rand::Rng;

/// The engine tracks no halfmove clock and cannot adjudicate fifty-move
/// draws, so shuffling games are cut off after this many plies.
const MAX_PLIES: u32 = 600;

fn pick_move(game: &mut Game, rng: &mut impl Rng) -> Move {
    let mut moves = game.legal_moves();
    debug_assert!(!moves.is_empty());
    for index in 0..moves.len() {
        game.apply(&mut moves[index]);
        let mates = game.is_checkmate();
        game.unapply(&moves[index]);
        if mates {
            return moves.swap_remove(index);
        }
    }
    let index = rng.gen_range(0..moves.len());
    moves.swap_remove(index)
}

fn main() {
    let mut rng = rand::thread_rng();
    let mut game = Game::starting();
    let mut ply = 0;
    while ply < MAX_PLIES && !game.is_over() {
        let mut next_move = pick_move(&mut game, &mut rng);
        let number = ply / 2 + 1;
        match game.to_move() {
            Player::White => println!("{number}. {next_move}"),
            Player::Black => println!("{number}. ... {next_move}"),
        }
        game.apply(&mut next_move);
        ply += 1;
    }
    println!("{game:?}");
    println!("{game}");
    if game.is_checkmate() {
        let winner = match game.to_move().opponent() {
            Player::White => "White",
            Player::Black => "Black",
        };
        println!("Checkmate, {winner} wins.");
    } else if game.is_stalemate() {
        println!("Stalemate.");
    } else if game.is_over() {
        println!("Draw: neither side can mate.");
    } else {
        println!("Cut off after {MAX_PLIES} plies.");
    }
}
