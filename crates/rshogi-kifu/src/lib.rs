//! KI2棋譜の変化木を復元するライブラリ
//!
//! KI2形式（「▲７六歩」「△同　銀」のような移動先+駒名の表記）の棋譜から、
//! 離れた位置に書かれた `変化：N手` ブロックを含めて局面グラフを組み立て、
//! 合流局面を検出し、全分岐を展開した棋譜を書き出す。
//!
//! - `types`: 盤・駒・指し手の基本型
//! - `position`: 局面と合法手生成
//! - `notation`: KI2表記と指し手の相互変換
//! - `record`: ブロック分割、親局面探し、展開、書き出し
//! - `config`: 設定

pub mod config;
pub mod notation;
pub mod position;
pub mod record;
pub mod types;

pub use config::Ki2Config;
pub use position::Position;
pub use record::{ExpandedRecord, reconstruct};
