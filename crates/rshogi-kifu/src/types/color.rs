//! 手番（Color）

/// 手番（先手/後手）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Color {
    /// 先手（下手）
    Black = 0,
    /// 後手（上手）
    White = 1,
}

impl Color {
    /// 手番の数
    pub const NUM: usize = 2;

    /// 全ての手番
    pub const ALL: [Color; 2] = [Color::Black, Color::White];

    /// 相手の手番
    #[inline]
    pub const fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// インデックスとして使用
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 棋譜の手番記号（▲/△）
    #[inline]
    pub const fn glyph(self) -> char {
        match self {
            Color::Black => '▲',
            Color::White => '△',
        }
    }

    /// 手番記号から変換
    ///
    /// `▽` と `▼` も受け付ける。
    pub const fn from_glyph(c: char) -> Option<Color> {
        match c {
            '▲' | '▼' => Some(Color::Black),
            '△' | '▽' => Some(Color::White),
            _ => None,
        }
    }

    /// 前進方向の段の増分（先手は1段目に向かう）
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::Black => -1,
            Color::White => 1,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        self.opponent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_opponent() {
        assert_eq!(Color::Black.opponent(), Color::White);
        assert_eq!(!Color::White, Color::Black);
    }

    #[test]
    fn test_color_glyph() {
        assert_eq!(Color::Black.glyph(), '▲');
        assert_eq!(Color::from_glyph('▽'), Some(Color::White));
        assert_eq!(Color::from_glyph('▼'), Some(Color::Black));
        assert_eq!(Color::from_glyph('歩'), None);
    }
}
