//! 指し手（Move）

use std::fmt;

use super::{PieceType, Square};

/// 指し手
///
/// 盤上の駒の移動か、持ち駒の打ち。USI文字列（`7g7f`, `8h2b+`, `P*5e`）が正規表現。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// 盤上の駒の移動
    Normal {
        from: Square,
        to: Square,
        promote: bool,
    },
    /// 駒打ち
    Drop { piece_type: PieceType, to: Square },
}

impl Move {
    /// 移動の指し手を生成
    #[inline]
    pub const fn new_move(from: Square, to: Square, promote: bool) -> Move {
        Move::Normal { from, to, promote }
    }

    /// 駒打ちの指し手を生成
    #[inline]
    pub const fn new_drop(piece_type: PieceType, to: Square) -> Move {
        Move::Drop { piece_type, to }
    }

    /// 移動先
    #[inline]
    pub const fn to(self) -> Square {
        match self {
            Move::Normal { to, .. } | Move::Drop { to, .. } => to,
        }
    }

    /// 移動元（駒打ちなら `None`）
    #[inline]
    pub const fn from(self) -> Option<Square> {
        match self {
            Move::Normal { from, .. } => Some(from),
            Move::Drop { .. } => None,
        }
    }

    /// 駒打ちかどうか
    #[inline]
    pub const fn is_drop(self) -> bool {
        matches!(self, Move::Drop { .. })
    }

    /// 成りかどうか
    #[inline]
    pub const fn is_promote(self) -> bool {
        matches!(self, Move::Normal { promote: true, .. })
    }

    /// USI形式の文字列に変換
    pub fn to_usi(self) -> String {
        match self {
            Move::Normal { from, to, promote } => {
                let suffix = if promote { "+" } else { "" };
                format!("{}{}{suffix}", from.to_usi(), to.to_usi())
            }
            Move::Drop { piece_type, to } => format!("{}*{}", piece_type.usi_char(), to.to_usi()),
        }
    }

    /// USI形式の文字列から変換
    pub fn from_usi(s: &str) -> Option<Move> {
        if let Some((piece, to)) = s.split_once('*') {
            let mut chars = piece.chars();
            let piece_type = PieceType::from_usi_char(chars.next()?)?;
            if chars.next().is_some() || !piece_type.is_hand_piece() {
                return None;
            }
            let to = Square::from_usi(to).filter(|_| to.len() == 2)?;
            return Some(Move::new_drop(piece_type, to));
        }

        let (body, promote) = match s.strip_suffix('+') {
            Some(body) => (body, true),
            None => (s, false),
        };
        if body.len() != 4 || !body.is_ascii() {
            return None;
        }
        let from = Square::from_usi(&body[..2])?;
        let to = Square::from_usi(&body[2..])?;
        Some(Move::new_move(from, to, promote))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_usi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, Rank};

    #[test]
    fn test_move_normal() {
        let from = Square::new(File::File7, Rank::Rank7);
        let to = Square::new(File::File7, Rank::Rank6);
        let m = Move::new_move(from, to, false);
        assert_eq!(m.from(), Some(from));
        assert_eq!(m.to(), to);
        assert!(!m.is_drop());
        assert!(!m.is_promote());
        assert_eq!(m.to_usi(), "7g7f");
    }

    #[test]
    fn test_move_drop() {
        let to = Square::new(File::File5, Rank::Rank5);
        let m = Move::new_drop(PieceType::Pawn, to);
        assert_eq!(m.from(), None);
        assert!(m.is_drop());
        assert_eq!(m.to_usi(), "P*5e");
    }

    #[test]
    fn test_move_from_usi() {
        for usi in ["7g7f", "8h2b+", "P*5e", "G*1a"] {
            let m = Move::from_usi(usi).unwrap();
            assert_eq!(m.to_string(), usi);
        }
        assert_eq!(Move::from_usi("K*5e"), None);
        assert_eq!(Move::from_usi("7g7"), None);
        assert_eq!(Move::from_usi("7g7f++"), None);
        assert_eq!(Move::from_usi("P*5"), None);
    }
}
