//! Legal-move generator for standard chess.
//!
//! The crate produces every legal move of a position, honoring check,
//! castling, en passant and promotion, and applies moves reversibly so that
//! callers can search, count ([perft]) or just play. The companion binary
//! plays the engine against itself with random moves.
//!
//! [perft]: https://www.chessprogramming.org/Perft

pub mod chess;
