//! KI2表記モジュール
//!
//! 「７六歩」「同　銀」「５八金右」のような移動先+駒名+補助記号の表記と、
//! 局面上の指し手との相互変換を扱う。
//!
//! - `ShorthandToken`: 表記1手分の構文
//! - `resolve`: 表記と局面から合法手を一つに決める
//! - `format`: 指し手から曖昧さのない最短の表記を作る

mod format;
mod names;
mod resolve;
mod token;

pub use format::format;
pub use names::{piece_name, square_label};
pub use resolve::{Resolution, resolve};
pub use token::{Destination, Horizontal, PromotionMarker, ShorthandToken, Vertical};

/// 表記の解決エラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// 表記として読めない
    #[error("cannot parse '{token}': {reason}")]
    TokenParse { token: String, reason: &'static str },
    /// 「同」の参照先がない
    #[error("no previous destination for '{0}'")]
    NoLastDestination(String),
    /// 表記に合う合法手がない
    #[error("no legal move matches '{0}'")]
    NoLegalCandidate(String),
}
