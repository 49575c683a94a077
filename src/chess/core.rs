//! Chess primitives commonly used within [`crate::chess`]: board geometry,
//! piece vocabulary and the [`Move`] descriptor.

use std::fmt::{self, Write};
use std::mem;

use anyhow::bail;
use itertools::Itertools;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// Board squares: from left to right, from bottom to the top:
///
/// ```
/// use patzer::chess::core::Square;
///
/// assert_eq!(Square::A1 as u8, 0);
/// assert_eq!(Square::E1 as u8, 4);
/// assert_eq!(Square::H1 as u8, 7);
/// assert_eq!(Square::A4 as u8, 8 * 3);
/// assert_eq!(Square::H8 as u8, 63);
/// ```
///
/// Square is a compact representation using only one byte.
///
/// ```
/// use patzer::chess::core::Square;
///
/// assert_eq!(std::mem::size_of::<Square>(), 1);
/// ```
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// Connects file (column) and rank (row) to form a full square.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        unsafe { mem::transmute(file as u8 + (rank as u8) * BOARD_WIDTH) }
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> File {
        unsafe { mem::transmute(self as u8 % BOARD_WIDTH) }
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> Rank {
        unsafe { mem::transmute(self as u8 / BOARD_WIDTH) }
    }

    /// Coordinate-wise sum with a direction vector. `None` when the result
    /// steps off the board: together with the enum representation this is the
    /// only bounds check the geometry needs, since every existing [`Square`]
    /// value is valid by construction.
    #[must_use]
    pub fn offset(self, (dx, dy): (i8, i8)) -> Option<Self> {
        let file = self.file() as i8 + dx;
        let rank = self.rank() as i8 + dy;
        let range = 0..BOARD_WIDTH as i8;
        if !range.contains(&file) || !range.contains(&rank) {
            return None;
        }
        Some(Self::new(
            File::try_from(file as u8).ok()?,
            Rank::try_from(rank as u8).ok()?,
        ))
    }
}

impl TryFrom<u8> for Square {
    type Error = anyhow::Error;

    /// Creates a square given its position on the board.
    ///
    /// # Errors
    ///
    /// If given square index is outside 0..[`BOARD_SIZE`] range.
    fn try_from(square_index: u8) -> anyhow::Result<Self> {
        // Exclusive range patterns are not allowed:
        // https://github.com/rust-lang/rust/issues/37854
        const MAX_INDEX: u8 = BOARD_SIZE - 1;
        match square_index {
            0..=MAX_INDEX => Ok(unsafe { mem::transmute::<u8, Self>(square_index) }),
            _ => bail!("square index should be in 0..BOARD_SIZE, got {square_index}"),
        }
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    fn try_from(square: &str) -> anyhow::Result<Self> {
        let (file, rank) = match square.chars().collect_tuple() {
            Some((file, rank)) => (file, rank),
            None => bail!(
                "square should be two-char, got {square} with {} chars",
                square.bytes().len()
            ),
        };
        Ok(Self::new(file.try_into()?, rank.try_into()?))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Represents a column (vertical row) of the chessboard. In chess notation, it
/// is normally represented with a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[allow(missing_docs)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl TryFrom<char> for File {
    type Error = anyhow::Error;

    fn try_from(file: char) -> anyhow::Result<Self> {
        match file {
            'a'..='h' => Ok(unsafe { mem::transmute::<u8, Self>(file as u8 - b'a') }),
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        }
    }
}

impl TryFrom<u8> for File {
    type Error = anyhow::Error;

    fn try_from(column: u8) -> anyhow::Result<Self> {
        match column {
            0..=7 => Ok(unsafe { mem::transmute::<u8, Self>(column) }),
            _ => bail!("file should be within 0..BOARD_WIDTH, got {column}"),
        }
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", (b'a' + *self as u8) as char)
    }
}

/// Represents a horizontal row of the chessboard. In chess notation, it is
/// represented with a number. The implementation assumes zero-based values
/// (i.e. rank 1 would be 0).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[allow(missing_docs)]
pub enum Rank {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
}

impl Rank {
    pub(super) const fn backrank(player: Player) -> Self {
        match player {
            Player::White => Self::One,
            Player::Black => Self::Eight,
        }
    }

    pub(super) const fn pawns_starting(player: Player) -> Self {
        match player {
            Player::White => Self::Two,
            Player::Black => Self::Seven,
        }
    }

    /// The farthest rank from the player's perspective: a pawn arriving here
    /// must promote.
    pub(super) const fn promotion(player: Player) -> Self {
        Self::backrank(player.opponent())
    }
}

impl TryFrom<char> for Rank {
    type Error = anyhow::Error;

    fn try_from(rank: char) -> anyhow::Result<Self> {
        match rank {
            '1'..='8' => Ok(unsafe { mem::transmute::<u8, Self>(rank as u8 - b'1') }),
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = anyhow::Error;

    fn try_from(row: u8) -> anyhow::Result<Self> {
        match row {
            0..=7 => Ok(unsafe { mem::transmute::<u8, Self>(row) }),
            _ => bail!("rank should be within 0..BOARD_WIDTH, got {row}"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("player should be 'w' or 'b', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match &self {
                Self::White => 'w',
                Self::Black => 'b',
            }
        )
    }
}

/// Directions on the board from the perspective of the moving player: "up"
/// always points at the opponent, so pawn and castling logic never
/// special-cases the color.
#[derive(Copy, Clone, Debug, strum::EnumIter)]
#[allow(missing_docs)]
pub enum Direction {
    UpLeft,
    Up,
    UpRight,
    Right,
    Left,
    DownLeft,
    Down,
    DownRight,
}

impl Direction {
    /// The (dx, dy) vector of the direction, mirrored for Black.
    pub(super) const fn vector(self, player: Player) -> (i8, i8) {
        let (dx, dy) = match self {
            Self::UpLeft => (-1, 1),
            Self::Up => (0, 1),
            Self::UpRight => (1, 1),
            Self::Right => (1, 0),
            Self::Left => (-1, 0),
            Self::DownLeft => (-1, -1),
            Self::Down => (0, -1),
            Self::DownRight => (1, -1),
        };
        match player {
            Player::White => (dx, dy),
            Player::Black => (-dx, -dy),
        }
    }
}

/// Walks from a square along a color-relative direction, yielding every
/// square starting one step past the origin and stopping at the board edge.
/// Rays are recomputed on every use and never cached: board contents may
/// differ between calls.
pub(super) struct Ray {
    cursor: Option<Square>,
    vector: (i8, i8),
}

impl Ray {
    pub(super) fn new(from: Square, player: Player, direction: Direction) -> Self {
        let vector = direction.vector(player);
        Self {
            cursor: from.offset(vector),
            vector,
        }
    }
}

impl Iterator for Ray {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        let current = self.cursor?;
        self.cursor = current.offset(self.vector);
        Some(current)
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl From<Promotion> for PieceKind {
    fn from(promotion: Promotion) -> Self {
        match promotion {
            Promotion::Queen => Self::Queen,
            Promotion::Rook => Self::Rook,
            Promotion::Bishop => Self::Bishop,
            Promotion::Knight => Self::Knight,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
        })
    }
}

/// A concrete piece owned by a player, together with the number of times it
/// has moved. The counter exists to answer "has this piece ever moved"
/// (castling eligibility); it is incremented by apply and restored by
/// unapply through the move's piece snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    #[allow(missing_docs)]
    pub owner: Player,
    #[allow(missing_docs)]
    pub kind: PieceKind,
    pub(super) moves: u16,
}

impl Piece {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(owner: Player, kind: PieceKind) -> Self {
        Self {
            owner,
            kind,
            moves: 0,
        }
    }

    /// True iff the piece has moved at least once since setup.
    #[must_use]
    pub const fn has_moved(&self) -> bool {
        self.moves > 0
    }
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        let owner = if symbol.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        let kind = match symbol.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => bail!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'"),
        };
        Ok(Self::new(owner, kind))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(match (&self.owner, &self.kind) {
            // White player: uppercase symbols.
            (Player::White, PieceKind::King) => 'K',
            (Player::White, PieceKind::Queen) => 'Q',
            (Player::White, PieceKind::Rook) => 'R',
            (Player::White, PieceKind::Bishop) => 'B',
            (Player::White, PieceKind::Knight) => 'N',
            (Player::White, PieceKind::Pawn) => 'P',
            // Black player: lowercase symbols.
            (Player::Black, PieceKind::King) => 'k',
            (Player::Black, PieceKind::Queen) => 'q',
            (Player::Black, PieceKind::Rook) => 'r',
            (Player::Black, PieceKind::Bishop) => 'b',
            (Player::Black, PieceKind::Knight) => 'n',
            (Player::Black, PieceKind::Pawn) => 'p',
        })
    }
}

/// A pawn can be promoted to a queen, rook, bishop or a knight.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    pub(super) const ALL: [Self; 4] = [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];
}

/// Castling is encoded as a king move; short castle ends on [`File::G`],
/// long castle on [`File::C`]. The rook relocation is performed by board
/// application, not by the generator.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastleSide {
    Short,
    Long,
}

bitflags::bitflags! {
    /// Castling abilities of both players as found in the FEN castling field.
    /// The engine itself derives eligibility from piece move counters; these
    /// flags only exist to import and export positions.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CastleRights: u8 {
        #[allow(missing_docs)]
        const WHITE_SHORT = 0b1000;
        #[allow(missing_docs)]
        const WHITE_LONG = 0b0100;
        #[allow(missing_docs)]
        const BLACK_SHORT = 0b0010;
        #[allow(missing_docs)]
        const BLACK_LONG = 0b0001;
    }
}

impl TryFrom<&str> for CastleRights {
    type Error = anyhow::Error;

    /// Parses the FEN castling field for both players. The caller is
    /// responsible for providing the bare field cleaned up from the rest of
    /// the FEN input.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        if input == "-" {
            return Ok(Self::empty());
        }
        let mut rights = Self::empty();
        for symbol in input.chars() {
            let right = match symbol {
                'K' => Self::WHITE_SHORT,
                'Q' => Self::WHITE_LONG,
                'k' => Self::BLACK_SHORT,
                'q' => Self::BLACK_LONG,
                _ => bail!("unknown castle rights symbol: '{symbol}'"),
            };
            if rights.contains(right) {
                bail!("duplicate castle rights symbol: '{symbol}'");
            }
            rights |= right;
        }
        Ok(rights)
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_char('-');
        }
        if self.contains(Self::WHITE_SHORT) {
            f.write_char('K')?;
        }
        if self.contains(Self::WHITE_LONG) {
            f.write_char('Q')?;
        }
        if self.contains(Self::BLACK_SHORT) {
            f.write_char('k')?;
        }
        if self.contains(Self::BLACK_LONG) {
            f.write_char('q')?;
        }
        Ok(())
    }
}

/// Describes one ply. A move is produced by generation, consumed by board
/// application and either discarded or handed back to unapply; it is never
/// persisted.
///
/// The captured piece is recorded together with its own square because an en
/// passant capture removes a pawn from a square other than the destination.
/// The en-passant targets added and removed by the move let unapply restore
/// the prior state exactly.
#[derive(Clone, Debug)]
pub struct Move {
    /// Snapshot of the moving piece before application.
    pub(super) piece: Piece,
    pub(super) from: Square,
    pub(super) to: Square,
    pub(super) captured: Option<(Square, Piece)>,
    pub(super) promotion: Option<Promotion>,
    pub(super) castle: Option<CastleSide>,
    pub(super) en_passant_added: Option<Square>,
    /// Filled in by apply: the en-passant target this move replaced.
    pub(super) en_passant_removed: Option<Square>,
}

impl Move {
    pub(super) const fn new(piece: Piece, from: Square, to: Square) -> Self {
        Self {
            piece,
            from,
            to,
            captured: None,
            promotion: None,
            castle: None,
            en_passant_added: None,
            en_passant_removed: None,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn to(&self) -> Square {
        self.to
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn promotion(&self) -> Option<Promotion> {
        self.promotion
    }

    /// True for regular and en passant captures alike.
    #[must_use]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl fmt::Display for Move {
    /// Serializes a move in [UCI format]. Castling prints as the king move
    /// (e1g1 rather than O-O).
    ///
    /// [UCI format]: http://wbec-ridderkerk.nl/html/UCIProtocol.html
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", PieceKind::from(promotion))?;
        }
        Ok(())
    }
}
