//! Pseudo-legal move generation per piece kind, castling, and the legality
//! filter on top.
//!
//! Captures and quiet moves are generated by separate functions: the attack
//! detector probes a position by asking "what could this piece capture from
//! here", and reusing the capture generators verbatim keeps it honest.

use arrayvec::ArrayVec;
use strum::IntoEnumIterator;

use crate::chess::attacks;
use crate::chess::board::Board;
use crate::chess::core::{
    CastleSide, Direction, File, Move, Piece, PieceKind, Player, Promotion, Rank, Ray, Square,
    BOARD_WIDTH,
};

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub(super) const KING_STEPS: [(i8, i8); 8] = [
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
];

const SLIDER_DIRECTIONS: [Direction; 8] = [
    Direction::UpLeft,
    Direction::Up,
    Direction::UpRight,
    Direction::Right,
    Direction::DownRight,
    Direction::Down,
    Direction::DownLeft,
    Direction::Left,
];

const fn slider_directions(kind: PieceKind) -> &'static [Direction] {
    match kind {
        PieceKind::Queen => &SLIDER_DIRECTIONS,
        PieceKind::Rook => &[
            Direction::Up,
            Direction::Right,
            Direction::Down,
            Direction::Left,
        ],
        PieceKind::Bishop => &[
            Direction::UpLeft,
            Direction::UpRight,
            Direction::DownRight,
            Direction::DownLeft,
        ],
        _ => &[],
    }
}

/// Generates the capturing moves of a single piece, ignoring king safety.
pub(super) fn captures(board: &Board, from: Square, piece: Piece, moves: &mut Vec<Move>) {
    match piece.kind {
        PieceKind::King => step_captures(board, from, piece, &KING_STEPS, moves),
        PieceKind::Knight => step_captures(board, from, piece, &KNIGHT_JUMPS, moves),
        PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop => {
            for &direction in slider_directions(piece.kind) {
                for square in Ray::new(from, piece.owner, direction) {
                    match board.at(square) {
                        None => continue,
                        Some(target) => {
                            if target.owner != piece.owner {
                                moves.push(Move {
                                    captured: Some((square, target)),
                                    ..Move::new(piece, from, square)
                                });
                            }
                            break;
                        },
                    }
                }
            }
        },
        PieceKind::Pawn => pawn_captures(board, from, piece, moves),
    }
}

/// Generates the non-capturing moves of a single piece, ignoring king safety.
/// Castling counts as a quiet king move.
pub(super) fn quiets(board: &Board, from: Square, piece: Piece, moves: &mut Vec<Move>) {
    match piece.kind {
        PieceKind::King => {
            step_quiets(board, from, piece, &KING_STEPS, moves);
            castles(board, from, piece, moves);
        },
        PieceKind::Knight => step_quiets(board, from, piece, &KNIGHT_JUMPS, moves),
        PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop => {
            for &direction in slider_directions(piece.kind) {
                for square in Ray::new(from, piece.owner, direction) {
                    if board.at(square).is_some() {
                        break;
                    }
                    moves.push(Move::new(piece, from, square));
                }
            }
        },
        PieceKind::Pawn => pawn_quiets(board, from, piece, moves),
    }
}

fn step_captures(
    board: &Board,
    from: Square,
    piece: Piece,
    steps: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &step in steps {
        let Some(to) = from.offset(step) else {
            continue;
        };
        if let Some(target) = board.at(to) {
            if target.owner != piece.owner {
                moves.push(Move {
                    captured: Some((to, target)),
                    ..Move::new(piece, from, to)
                });
            }
        }
    }
}

fn step_quiets(
    board: &Board,
    from: Square,
    piece: Piece,
    steps: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &step in steps {
        let Some(to) = from.offset(step) else {
            continue;
        };
        if board.at(to).is_none() {
            moves.push(Move::new(piece, from, to));
        }
    }
}

fn pawn_captures(board: &Board, from: Square, piece: Piece, moves: &mut Vec<Move>) {
    let player = piece.owner;
    for direction in [Direction::UpLeft, Direction::UpRight] {
        let Some(to) = from.offset(direction.vector(player)) else {
            continue;
        };
        if board.en_passant() == Some(to) {
            // The captured pawn sits behind the target square. Attack probes
            // can reach this branch from squares where that square is empty;
            // no capture exists then.
            let victim_square = to.offset(Direction::Down.vector(player));
            if let Some(victim_square) = victim_square {
                if let Some(victim) = board.at(victim_square) {
                    moves.push(Move {
                        captured: Some((victim_square, victim)),
                        ..Move::new(piece, from, to)
                    });
                }
            }
            continue;
        }
        let Some(target) = board.at(to) else {
            continue;
        };
        if target.owner == player {
            continue;
        }
        if to.rank() == Rank::promotion(player) {
            for promotion in Promotion::ALL {
                moves.push(Move {
                    captured: Some((to, target)),
                    promotion: Some(promotion),
                    ..Move::new(piece, from, to)
                });
            }
        } else {
            moves.push(Move {
                captured: Some((to, target)),
                ..Move::new(piece, from, to)
            });
        }
    }
}

fn pawn_quiets(board: &Board, from: Square, piece: Piece, moves: &mut Vec<Move>) {
    let player = piece.owner;
    let ahead: ArrayVec<Square, { BOARD_WIDTH as usize }> =
        Ray::new(from, player, Direction::Up).collect();
    let Some(&single) = ahead.first() else {
        return;
    };
    if board.at(single).is_some() {
        return;
    }
    if single.rank() == Rank::promotion(player) {
        for promotion in Promotion::ALL {
            moves.push(Move {
                promotion: Some(promotion),
                ..Move::new(piece, from, single)
            });
        }
        return;
    }
    moves.push(Move::new(piece, from, single));
    if from.rank() == Rank::pawns_starting(player) {
        let double = ahead[1];
        if board.at(double).is_none() {
            moves.push(Move {
                en_passant_added: Some(single),
                ..Move::new(piece, from, double)
            });
        }
    }
}

/// Castling eligibility is derived entirely from the board: the king and the
/// corner rook of the castling side have never moved, the files between them
/// are empty and no square the king crosses (its own included) is attacked.
fn castles(board: &Board, from: Square, king: Piece, moves: &mut Vec<Move>) {
    if king.has_moved() {
        return;
    }
    let player = king.owner;
    let rank = from.rank();
    for (side, corner, empty_files, safe_files, destination) in [
        (
            CastleSide::Short,
            File::H,
            &[File::F, File::G][..],
            &[File::E, File::F, File::G][..],
            File::G,
        ),
        (
            CastleSide::Long,
            File::A,
            &[File::B, File::C, File::D][..],
            &[File::C, File::D, File::E][..],
            File::C,
        ),
    ] {
        match board.at(Square::new(corner, rank)) {
            Some(piece)
                if piece.kind == PieceKind::Rook
                    && piece.owner == player
                    && !piece.has_moved() => {},
            _ => continue,
        }
        if empty_files
            .iter()
            .any(|&file| board.at(Square::new(file, rank)).is_some())
        {
            continue;
        }
        if safe_files
            .iter()
            .any(|&file| attacks::is_attacked(board, Square::new(file, rank), player.opponent()))
        {
            continue;
        }
        moves.push(Move {
            castle: Some(side),
            ..Move::new(king, from, Square::new(destination, rank))
        });
    }
}

/// All moves of the player ignoring king safety, in board-scan order
/// (captures of a piece before its quiet moves).
#[must_use]
pub fn pseudo_legal_moves(board: &Board, player: Player) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    for from in Square::iter() {
        let Some(piece) = board.at(from) else {
            continue;
        };
        if piece.owner != player {
            continue;
        }
        captures(board, from, piece, &mut moves);
        quiets(board, from, piece, &mut moves);
    }
    moves
}

/// All legal moves of the player: pseudo-legal moves that do not leave their
/// own king in check. Each candidate is applied, tested and unwound; the
/// board comes back untouched.
#[must_use]
pub fn legal_moves(board: &mut Board, player: Player) -> Vec<Move> {
    let mut moves = pseudo_legal_moves(board, player);
    moves.retain_mut(|candidate| {
        board.apply(candidate);
        let safe = !attacks::in_check(board, player);
        board.unapply(candidate);
        safe
    });
    moves
}

/// Counts leaf nodes of the legal move tree to the given depth.
///
/// See <https://www.chessprogramming.org/Perft> for reference values.
#[must_use]
pub fn perft(board: &mut Board, player: Player, depth: u8) -> u64 {
    debug_assert!(depth > 0);
    let mut moves = legal_moves(board, player);
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for next_move in &mut moves {
        board.apply(next_move);
        nodes += perft(board, player.opponent(), depth - 1);
        board.unapply(next_move);
    }
    nodes
}
