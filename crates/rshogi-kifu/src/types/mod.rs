//! 基本型モジュール
//!
//! 棋譜の復元で使う盤・駒・指し手の型を定義する。
//!
//! ```text
//! Color
//!   ↓
//! File, Rank
//!   ↓
//! Square
//!   ↓
//! PieceType
//!   ↓
//! Piece ← Move
//!   ↓
//! Hand
//! ```

mod color;
mod file;
mod hand;
mod moves;
mod piece;
mod piece_type;
mod rank;
mod square;

pub use color::Color;
pub use file::File;
pub use hand::Hand;
pub use moves::Move;
pub use piece::Piece;
pub use piece_type::PieceType;
pub use rank::Rank;
pub use square::Square;
