//! Mailbox board representation: an 8×8 grid of optional pieces plus the
//! en-passant target, with the reversible apply/unapply protocol on top.

use std::fmt::{self, Write};

use anyhow::bail;
use strum::IntoEnumIterator;

use crate::chess::core::{
    CastleRights, CastleSide, File, Move, Piece, PieceKind, Player, Rank, Square, BOARD_SIZE,
    BOARD_WIDTH,
};

/// Piece placement and the en-passant target. The board is the single owner
/// of all pieces; everything else refers to them by [`Square`].
///
/// [`Board::apply`] and [`Board::unapply`] assume moves produced by the
/// generator for the current position; feeding them anything else is
/// unspecified behavior guarded only by debug assertions.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; BOARD_SIZE as usize],
    en_passant: Option<Square>,
}

impl Board {
    /// An empty board with no en-passant target.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            squares: [None; BOARD_SIZE as usize],
            en_passant: None,
        }
    }

    /// Creates a board with the starting position.
    #[must_use]
    pub fn starting() -> Self {
        const BACKRANK: [PieceKind; BOARD_WIDTH as usize] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut board = Self::empty();
        for player in [Player::White, Player::Black] {
            for (file, kind) in File::iter().zip(BACKRANK) {
                board.put(
                    Square::new(file, Rank::backrank(player)),
                    Piece::new(player, kind),
                );
            }
            for file in File::iter() {
                board.put(
                    Square::new(file, Rank::pawns_starting(player)),
                    Piece::new(player, PieceKind::Pawn),
                );
            }
        }
        board
    }

    /// Parses the piece placement field of a FEN record (the first of the six
    /// space-separated fields).
    pub(super) fn from_placement(placement: &str) -> anyhow::Result<Self> {
        let mut board = Self::empty();
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != BOARD_WIDTH as usize {
            bail!(
                "placement should describe {BOARD_WIDTH} ranks, got {}",
                ranks.len()
            );
        }
        for (row, fragment) in ranks.iter().enumerate() {
            let rank = Rank::try_from(BOARD_WIDTH - 1 - row as u8)?;
            let mut file = 0u8;
            for symbol in fragment.chars() {
                if let Some(skip) = symbol.to_digit(10) {
                    file += skip as u8;
                    continue;
                }
                if file >= BOARD_WIDTH {
                    bail!("rank {rank} describes more than {BOARD_WIDTH} squares");
                }
                board.put(Square::new(File::try_from(file)?, rank), symbol.try_into()?);
                file += 1;
            }
            if file != BOARD_WIDTH {
                bail!("rank {rank} should describe exactly {BOARD_WIDTH} squares, got {file}");
            }
        }
        Ok(board)
    }

    /// The piece on the given square, if any.
    #[must_use]
    pub fn at(&self, square: Square) -> Option<Piece> {
        self.squares[square as usize]
    }

    /// The square a pawn that just double-pushed can be captured on.
    #[must_use]
    pub const fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub(super) fn set_en_passant(&mut self, target: Option<Square>) {
        self.en_passant = target;
    }

    pub(super) fn put(&mut self, square: Square, piece: Piece) {
        debug_assert!(self.at(square).is_none(), "{square} is already occupied");
        self.squares[square as usize] = Some(piece);
    }

    pub(super) fn clear(&mut self, square: Square) {
        debug_assert!(self.at(square).is_some(), "{square} is already empty");
        self.squares[square as usize] = None;
    }

    /// Bumps the move counter of the piece on the square, if any. Used when
    /// importing positions: a missing FEN castling right is represented by
    /// marking the corresponding corner rook as having moved.
    pub(super) fn mark_moved(&mut self, square: Square) {
        if let Some(piece) = &mut self.squares[square as usize] {
            piece.moves += 1;
        }
    }

    /// Locates the king of the given player.
    ///
    /// # Panics
    ///
    /// A board without both kings is broken beyond repair, so the lookup
    /// panics instead of returning an error.
    #[must_use]
    pub fn king(&self, player: Player) -> Square {
        for square in Square::iter() {
            if let Some(piece) = self.at(square) {
                if piece.kind == PieceKind::King && piece.owner == player {
                    return square;
                }
            }
        }
        panic!("no {player} king on the board");
    }

    /// Reconstructs the FEN castling field from move counters: a right is
    /// alive while the king stands unmoved on its starting square and the
    /// matching corner rook has never moved.
    pub(super) fn castle_rights(&self) -> CastleRights {
        let mut rights = CastleRights::empty();
        for (player, short, long) in [
            (
                Player::White,
                CastleRights::WHITE_SHORT,
                CastleRights::WHITE_LONG,
            ),
            (
                Player::Black,
                CastleRights::BLACK_SHORT,
                CastleRights::BLACK_LONG,
            ),
        ] {
            let backrank = Rank::backrank(player);
            match self.at(Square::new(File::E, backrank)) {
                Some(king)
                    if king.owner == player
                        && king.kind == PieceKind::King
                        && !king.has_moved() => {},
                _ => continue,
            }
            for (corner, right) in [(File::H, short), (File::A, long)] {
                if let Some(rook) = self.at(Square::new(corner, backrank)) {
                    if rook.owner == player && rook.kind == PieceKind::Rook && !rook.has_moved() {
                        rights |= right;
                    }
                }
            }
        }
        rights
    }

    /// Mutates the board, recording everything needed for [`Board::unapply`]
    /// into the move itself. Bumps the moving piece's counter, removes the
    /// captured piece from its own square (which differs from the destination
    /// for en passant), swaps the piece kind on promotion and relocates the
    /// rook when castling.
    pub fn apply(&mut self, next_move: &mut Move) {
        next_move.en_passant_removed = self.en_passant;
        self.en_passant = next_move.en_passant_added;
        if let Some((square, _)) = next_move.captured {
            self.clear(square);
        }
        self.clear(next_move.from);
        let mut piece = next_move.piece;
        piece.moves += 1;
        if let Some(promotion) = next_move.promotion {
            piece.kind = promotion.into();
        }
        self.put(next_move.to, piece);
        if let Some(side) = next_move.castle {
            let (rook_from, rook_to) = Self::rook_castle_squares(side, next_move.from.rank());
            let Some(mut rook) = self.at(rook_from) else {
                unreachable!("castling without a rook on {rook_from}")
            };
            rook.moves += 1;
            self.clear(rook_from);
            self.put(rook_to, rook);
        }
    }

    /// Exactly reverses [`Board::apply`] of the same move: occupancy, move
    /// counters and the en-passant target all return to their prior values.
    pub fn unapply(&mut self, done_move: &Move) {
        if let Some(side) = done_move.castle {
            let (rook_from, rook_to) = Self::rook_castle_squares(side, done_move.from.rank());
            let Some(mut rook) = self.at(rook_to) else {
                unreachable!("unwinding a castle without a rook on {rook_to}")
            };
            rook.moves -= 1;
            self.clear(rook_to);
            self.put(rook_from, rook);
        }
        self.clear(done_move.to);
        self.put(done_move.from, done_move.piece);
        if let Some((square, piece)) = done_move.captured {
            self.put(square, piece);
        }
        self.en_passant = done_move.en_passant_removed;
    }

    const fn rook_castle_squares(side: CastleSide, rank: Rank) -> (Square, Square) {
        match side {
            CastleSide::Short => (Square::new(File::H, rank), Square::new(File::F, rank)),
            CastleSide::Long => (Square::new(File::A, rank), Square::new(File::D, rank)),
        }
    }
}

impl fmt::Display for Board {
    /// Prints the board as the FEN piece placement field.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in Rank::iter().rev() {
            let mut empty = 0;
            for file in File::iter() {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty > 0 {
                            write!(f, "{empty}")?;
                            empty = 0;
                        }
                        write!(f, "{piece}")?;
                    },
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{empty}")?;
            }
            if rank != Rank::One {
                f.write_char('/')?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a simple grid format, a8 in the top left corner.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in Rank::iter().rev() {
            write!(f, "{rank} ")?;
            for file in File::iter() {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => write!(f, " {piece}")?,
                    None => f.write_str(" .")?,
                }
            }
            f.write_char('\n')?;
        }
        f.write_str("   a b c d e f g h")
    }
}
