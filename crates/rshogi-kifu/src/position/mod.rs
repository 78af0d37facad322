//! 局面表現モジュール
//!
//! 棋譜を再生するための盤面を表現し、手の実行・巻き戻しを行う。
//!
//! - `Position`: 局面（駒割り配列 + 持ち駒 + 手番 + 巻き戻し用スタック）
//! - `do_move` / `undo_move`: 手の実行と巻き戻し
//! - SFEN形式の解析・出力と局面の指紋（`fingerprint`）
//! - 合法手生成（`legal_moves`, `legal_moves_to`）

mod movegen;
mod pos;
mod sfen;

pub use pos::Position;
pub use sfen::{HANDICAPS, SFEN_HIRATE, SfenError, handicap_sfen};
