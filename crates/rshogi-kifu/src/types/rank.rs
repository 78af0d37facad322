//! 段（Rank）

use super::Color;

/// 段（一段〜九段）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Rank {
    Rank1 = 0,
    Rank2 = 1,
    Rank3 = 2,
    Rank4 = 3,
    Rank5 = 4,
    Rank6 = 5,
    Rank7 = 6,
    Rank8 = 7,
    Rank9 = 8,
}

impl Rank {
    /// 段の数
    pub const NUM: usize = 9;

    /// 全ての段
    pub const ALL: [Rank; 9] = [
        Rank::Rank1,
        Rank::Rank2,
        Rank::Rank3,
        Rank::Rank4,
        Rank::Rank5,
        Rank::Rank6,
        Rank::Rank7,
        Rank::Rank8,
        Rank::Rank9,
    ];

    /// 0-8 から変換
    #[inline]
    pub const fn from_index(n: usize) -> Option<Rank> {
        if n < Self::NUM { Some(Self::ALL[n]) } else { None }
    }

    /// 棋譜上の番号（1-9）から変換
    #[inline]
    pub const fn from_number(n: u32) -> Option<Rank> {
        if n >= 1 { Self::from_index(n as usize - 1) } else { None }
    }

    /// インデックスとして使用
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 手番から見た段（先手は一段目が0、後手は九段目が0）
    #[inline]
    pub const fn relative(self, color: Color) -> usize {
        match color {
            Color::Black => self as usize,
            Color::White => 8 - self as usize,
        }
    }

    /// 敵陣（成れる段）かどうか
    #[inline]
    pub const fn can_promote(self, color: Color) -> bool {
        self.relative(color) < 3
    }

    /// USI形式の文字（'a'-'i'）に変換
    #[inline]
    pub const fn to_usi_char(self) -> char {
        (b'a' + self as u8) as char
    }

    /// USI形式の文字から変換
    #[inline]
    pub const fn from_usi_char(c: char) -> Option<Rank> {
        if c.is_ascii_lowercase() {
            Rank::from_index((c as u8 - b'a') as usize)
        } else {
            None
        }
    }
}
