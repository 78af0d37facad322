//! 持ち駒（Hand）

use super::PieceType;

/// 片側の持ち駒
///
/// `PieceType::HAND_PIECES` の並びで枚数を持つ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hand([u8; PieceType::HAND_NUM]);

impl Hand {
    /// 空の持ち駒
    pub const EMPTY: Hand = Hand([0; PieceType::HAND_NUM]);

    /// 指定駒種の枚数
    #[inline]
    pub fn count(&self, pt: PieceType) -> u8 {
        pt.unpromote().hand_index().map_or(0, |i| self.0[i])
    }

    /// 1枚加える（成駒は生駒として加える。玉は無視）
    #[inline]
    pub fn add(&mut self, pt: PieceType) {
        self.add_n(pt, 1);
    }

    /// n枚加える
    #[inline]
    pub fn add_n(&mut self, pt: PieceType, n: u8) {
        if let Some(i) = pt.unpromote().hand_index() {
            self.0[i] = self.0[i].saturating_add(n);
        }
    }

    /// 1枚減らす。持っていなければ何もしない。
    #[inline]
    pub fn sub(&mut self, pt: PieceType) {
        if let Some(i) = pt.unpromote().hand_index() {
            self.0[i] = self.0[i].saturating_sub(1);
        }
    }

    /// 持ち駒が空か
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&n| n == 0)
    }

    /// 持っている駒種と枚数（飛角金銀桂香歩の順）
    pub fn iter(&self) -> impl Iterator<Item = (PieceType, u8)> + '_ {
        PieceType::HAND_PIECES
            .iter()
            .zip(self.0.iter())
            .filter(|(_, n)| **n > 0)
            .map(|(pt, n)| (*pt, *n))
    }
}
