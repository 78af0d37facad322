//! 駒（Piece）

use super::{Color, PieceType};

/// 駒（先後の区別あり）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    color: Color,
    piece_type: PieceType,
}

impl Piece {
    /// ColorとPieceTypeから生成
    #[inline]
    pub const fn new(color: Color, piece_type: PieceType) -> Piece {
        Piece { color, piece_type }
    }

    /// 手番
    #[inline]
    pub const fn color(self) -> Color {
        self.color
    }

    /// 駒種
    #[inline]
    pub const fn piece_type(self) -> PieceType {
        self.piece_type
    }

    /// 成った駒（成れない駒はそのまま）
    #[inline]
    pub const fn promoted(self) -> Piece {
        match self.piece_type.promote() {
            Some(pt) => Piece::new(self.color, pt),
            None => self,
        }
    }

    /// SFEN表記（"P", "+r" 等）
    pub fn to_sfen(self) -> String {
        let c = self.piece_type.usi_char();
        let c = match self.color {
            Color::Black => c,
            Color::White => c.to_ascii_lowercase(),
        };
        if self.piece_type.is_promoted() {
            format!("+{c}")
        } else {
            c.to_string()
        }
    }

    /// SFENの駒文字から生駒を生成（大文字=先手、小文字=後手）
    pub fn from_sfen_char(c: char) -> Option<Piece> {
        let piece_type = PieceType::from_usi_char(c)?;
        let color = if c.is_ascii_uppercase() { Color::Black } else { Color::White };
        Some(Piece::new(color, piece_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_sfen() {
        assert_eq!(Piece::new(Color::Black, PieceType::Pawn).to_sfen(), "P");
        assert_eq!(Piece::new(Color::White, PieceType::Dragon).to_sfen(), "+r");
        assert_eq!(
            Piece::from_sfen_char('n'),
            Some(Piece::new(Color::White, PieceType::Knight))
        );
        assert_eq!(Piece::from_sfen_char('+'), None);
    }

    #[test]
    fn test_piece_promoted() {
        let silver = Piece::new(Color::White, PieceType::Silver);
        assert_eq!(silver.promoted(), Piece::new(Color::White, PieceType::ProSilver));
        let gold = Piece::new(Color::Black, PieceType::Gold);
        assert_eq!(gold.promoted(), gold);
    }
}
