//! Attack and check detection through probe pieces: a square is attacked by
//! a queen iff a queen standing on it could capture one, and likewise for
//! every other kind. Reusing the capture generators means attack detection
//! can never disagree with move generation.

use crate::chess::board::Board;
use crate::chess::core::{Piece, PieceKind, Player, Square};
use crate::chess::movegen;

const PROBE_KINDS: [PieceKind; 5] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Pawn,
];

/// True iff a piece of `attacker` attacks the given square. Kings are not in
/// the probe set; [`in_check`] handles king adjacency separately.
#[must_use]
pub fn is_attacked(board: &Board, square: Square, attacker: Player) -> bool {
    let mut captures = Vec::new();
    for kind in PROBE_KINDS {
        let probe = Piece::new(attacker.opponent(), kind);
        captures.clear();
        movegen::captures(board, square, probe, &mut captures);
        for capture in &captures {
            // A pawn probe can pick up an en passant capture whose victim
            // sits behind the destination; that pawn does not attack this
            // square, so only count victims standing on it.
            if let Some((victim_square, victim)) = capture.captured {
                if victim_square == capture.to && victim.kind == kind {
                    return true;
                }
            }
        }
    }
    false
}

/// True iff the player's king is under attack, counting the opposing king:
/// two kings a step apart leave both sides "in check" so the legality filter
/// rejects moves that bring them together.
#[must_use]
pub fn in_check(board: &Board, player: Player) -> bool {
    let king = board.king(player);
    if is_attacked(board, king, player.opponent()) {
        return true;
    }
    let enemy_king = board.king(player.opponent());
    movegen::KING_STEPS
        .iter()
        .any(|&step| king.offset(step) == Some(enemy_king))
}
