//! Turn alternation on top of [`Board`]: the side to move flips with every
//! applied move, and game termination (checkmate, stalemate, dead position)
//! is adjudicated here. Full positions are imported and exported as FEN.

use std::fmt::{self, Write};

use anyhow::bail;
use strum::IntoEnumIterator;

use crate::chess::attacks;
use crate::chess::board::Board;
use crate::chess::core::{CastleRights, File, Move, PieceKind, Player, Rank, Square};
use crate::chess::movegen;

/// A game in progress: the board plus the player to move.
#[derive(Clone)]
pub struct Game {
    board: Board,
    on_turn: Player,
}

impl Game {
    /// Creates the starting position with White to move.
    #[must_use]
    pub fn starting() -> Self {
        Self {
            board: Board::starting(),
            on_turn: Player::White,
        }
    }

    /// Parses a [Forsyth-Edwards Notation] record. The halfmove clock and the
    /// fullmove counter are validated but not retained (nothing here reads
    /// them), which also makes 4-field [EPD] records acceptable.
    ///
    /// Castling rights are folded into piece move counters: a missing right
    /// marks the corresponding corner rook as having moved. An en passant
    /// target has to look like the product of a double push: on rank 3 or 6,
    /// with an opposing pawn in front of it.
    ///
    /// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
    /// [EPD]: https://www.chessprogramming.org/Extended_Position_Description
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let mut parts = input.split_ascii_whitespace();
        let (Some(placement), Some(side), Some(castling), Some(en_passant)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            bail!("FEN should have at least 4 fields, got '{input}'");
        };
        for clock in parts.by_ref().take(2) {
            if clock.parse::<u16>().is_err() {
                bail!("clock field should be a number, got '{clock}'");
            }
        }
        if parts.next().is_some() {
            bail!("FEN should have at most 6 fields, got '{input}'");
        }
        let mut board = Board::from_placement(placement)?;
        for player in [Player::White, Player::Black] {
            let kings = Square::iter()
                .filter_map(|square| board.at(square))
                .filter(|piece| piece.kind == PieceKind::King && piece.owner == player)
                .count();
            if kings != 1 {
                bail!("{player} should have exactly one king, got {kings}");
            }
        }
        let rights = CastleRights::try_from(castling)?;
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
            if !rights.contains(short) {
                board.mark_moved(Square::new(File::H, backrank));
            }
            if !rights.contains(long) {
                board.mark_moved(Square::new(File::A, backrank));
            }
        }
        let on_turn = Player::try_from(side)?;
        if en_passant != "-" {
            let target = Square::try_from(en_passant)?;
            let (pusher, pawn_rank) = match target.rank() {
                Rank::Three => (Player::White, Rank::Four),
                Rank::Six => (Player::Black, Rank::Five),
                _ => bail!("en passant target should be on rank 3 or 6, got {target}"),
            };
            if pusher == on_turn {
                bail!("en passant target {target} should come from the opponent's double push");
            }
            match board.at(Square::new(target.file(), pawn_rank)) {
                Some(piece) if piece.owner == pusher && piece.kind == PieceKind::Pawn => {},
                _ => bail!("en passant target {target} should have a {pusher} pawn in front of it"),
            }
            board.set_en_passant(Some(target));
        }
        Ok(Self { board, on_turn })
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The player whose turn it is.
    #[must_use]
    pub const fn to_move(&self) -> Player {
        self.on_turn
    }

    /// All legal moves of the player to move.
    #[must_use]
    pub fn legal_moves(&mut self) -> Vec<Move> {
        movegen::legal_moves(&mut self.board, self.on_turn)
    }

    /// Counts leaf nodes of the legal move tree to the given depth. See
    /// [`movegen::perft`].
    #[must_use]
    pub fn perft(&mut self, depth: u8) -> u64 {
        movegen::perft(&mut self.board, self.on_turn, depth)
    }

    /// Plays the move and passes the turn to the opponent.
    pub fn apply(&mut self, next_move: &mut Move) {
        self.board.apply(next_move);
        self.on_turn = self.on_turn.opponent();
    }

    /// Takes back the last applied move, returning the turn to its player.
    pub fn unapply(&mut self, done_move: &Move) {
        self.board.unapply(done_move);
        self.on_turn = self.on_turn.opponent();
    }

    /// True iff the player to move is in check.
    #[must_use]
    pub fn in_check(&self) -> bool {
        attacks::in_check(&self.board, self.on_turn)
    }

    /// True iff the player to move is in check with no legal moves.
    #[must_use]
    pub fn is_checkmate(&mut self) -> bool {
        self.in_check() && self.legal_moves().is_empty()
    }

    /// True iff the player to move has no legal moves but is not in check.
    #[must_use]
    pub fn is_stalemate(&mut self) -> bool {
        !self.in_check() && self.legal_moves().is_empty()
    }

    /// True when the game has ended: checkmate, stalemate or a dead position
    /// in which neither player retains mating material.
    #[must_use]
    pub fn is_over(&mut self) -> bool {
        if self.legal_moves().is_empty() {
            return true;
        }
        !self.has_mating_material(Player::White) && !self.has_mating_material(Player::Black)
    }

    /// A queen, rook or pawn is always enough; minor pieces suffice only as
    /// a bishop pair or bishop plus knight. Two knights cannot force mate.
    fn has_mating_material(&self, player: Player) -> bool {
        let mut bishops = 0;
        let mut knights = 0;
        for square in Square::iter() {
            let Some(piece) = self.board.at(square) else {
                continue;
            };
            if piece.owner != player {
                continue;
            }
            match piece.kind {
                PieceKind::Queen | PieceKind::Rook | PieceKind::Pawn => return true,
                PieceKind::Bishop => bishops += 1,
                PieceKind::Knight => knights += 1,
                PieceKind::King => {},
            }
        }
        bishops >= 2 || (bishops >= 1 && knights >= 1)
    }
}

impl TryFrom<&str> for Game {
    type Error = anyhow::Error;

    /// Parses a position from FEN, tolerating the `fen` and `epd` command
    /// prefixes and surrounding whitespace.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        for prefix in ["fen ", "epd "] {
            if let Some(stripped) = input.strip_prefix(prefix) {
                return Self::from_fen(stripped);
            }
        }
        Self::from_fen(input)
    }
}

impl fmt::Display for Game {
    /// Serializes the position back to FEN. Clocks are not tracked, so the
    /// last two fields are always "0 1".
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {} ",
            self.board,
            self.on_turn,
            self.board.castle_rights()
        )?;
        match self.board.en_passant() {
            Some(square) => write!(f, "{square}")?,
            None => f.write_char('-')?,
        }
        f.write_str(" 0 1")
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}\n{} to move", self.board, self.on_turn)
    }
}
