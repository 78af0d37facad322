//! 局面（Position）

use crate::types::{Color, Hand, Move, Piece, PieceType, Square};

/// 巻き戻し用の状態
#[derive(Debug, Clone, Copy)]
struct StateInfo {
    /// この局面に至った指し手
    last_move: Move,
    /// 取った駒（成駒は成ったまま記録する）
    captured: Option<Piece>,
}

/// 局面
#[derive(Debug, Clone)]
pub struct Position {
    /// 盤上の駒
    pub(super) board: [Option<Piece>; Square::NUM],
    /// 持ち駒 [Color]
    pub(super) hand: [Hand; Color::NUM],
    /// 手番
    pub(super) side_to_move: Color,
    /// 手数（SFENの4番目のフィールド）
    pub(super) game_ply: i32,
    /// do_move で積まれる状態
    history: Vec<StateInfo>,
}

impl Position {
    /// 空の局面を生成
    pub fn new() -> Position {
        Position {
            board: [None; Square::NUM],
            hand: [Hand::EMPTY; Color::NUM],
            side_to_move: Color::Black,
            game_ply: 1,
            history: Vec::new(),
        }
    }

    /// 平手初期局面
    pub fn startpos() -> Position {
        let mut pos = Position::new();
        pos.set_hirate();
        pos
    }

    // =========================================================================
    // アクセサ
    // =========================================================================

    /// 升目の駒
    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.board[sq.index()]
    }

    /// 手番
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// 持ち駒
    #[inline]
    pub fn hand(&self, color: Color) -> Hand {
        self.hand[color.index()]
    }

    /// 直前の指し手（開始局面なら `None`）
    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|st| st.last_move)
    }

    /// do_move で進めた手数
    #[inline]
    pub fn moves_played(&self) -> usize {
        self.history.len()
    }

    /// 玉の位置（玉がなければ `None`）
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = Piece::new(color, PieceType::King);
        Square::all().find(|&sq| self.board[sq.index()] == Some(king))
    }

    /// 指し手で動く駒（成る前）
    pub fn moved_piece(&self, m: Move) -> Option<Piece> {
        match m {
            Move::Normal { from, .. } => self.piece_on(from),
            Move::Drop { piece_type, .. } => Some(Piece::new(self.side_to_move, piece_type)),
        }
    }

    // =========================================================================
    // 手の実行・巻き戻し
    // =========================================================================

    /// 指し手を実行する
    ///
    /// 合法性は検査しない。呼び出し側で `legal_moves` 由来の手を渡すこと。
    pub fn do_move(&mut self, m: Move) {
        let us = self.side_to_move;
        let captured = match m {
            Move::Normal { from, to, promote } => {
                let captured = self.board[to.index()].take();
                if let Some(pc) = captured {
                    self.hand[us.index()].add(pc.piece_type());
                }
                let moved = self.board[from.index()].take();
                self.board[to.index()] = moved.map(|pc| if promote { pc.promoted() } else { pc });
                captured
            }
            Move::Drop { piece_type, to } => {
                self.hand[us.index()].sub(piece_type);
                self.board[to.index()] = Some(Piece::new(us, piece_type));
                None
            }
        };

        self.history.push(StateInfo {
            last_move: m,
            captured,
        });
        self.side_to_move = !us;
        self.game_ply += 1;
    }

    /// 直前の指し手を巻き戻す。戻せる手がなければ `None`。
    pub fn undo_move(&mut self) -> Option<Move> {
        let st = self.history.pop()?;
        let us = !self.side_to_move;
        self.side_to_move = us;
        self.game_ply -= 1;

        match st.last_move {
            Move::Normal { from, to, promote } => {
                let moved = self.board[to.index()].take();
                self.board[from.index()] = moved.map(|pc| {
                    if promote {
                        Piece::new(pc.color(), pc.piece_type().unpromote())
                    } else {
                        pc
                    }
                });
                if let Some(pc) = st.captured {
                    self.hand[us.index()].sub(pc.piece_type());
                    self.board[to.index()] = Some(pc);
                }
            }
            Move::Drop { piece_type, to } => {
                self.board[to.index()] = None;
                self.hand[us.index()].add(piece_type);
            }
        }
        Some(st.last_move)
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usi(s: &str) -> Move {
        Move::from_usi(s).unwrap()
    }

    #[test]
    fn test_do_undo_restores_position() {
        let mut pos = Position::startpos();
        let before = pos.to_sfen();

        for m in ["7g7f", "3c3d", "8h2b+", "3a2b", "B*4e"] {
            pos.do_move(usi(m));
        }
        assert_eq!(pos.moves_played(), 5);
        assert_eq!(pos.hand(Color::Black).count(PieceType::Bishop), 0);
        assert_eq!(pos.hand(Color::White).count(PieceType::Bishop), 1);

        while pos.undo_move().is_some() {}
        assert_eq!(pos.to_sfen(), before);
        assert_eq!(pos.last_move(), None);
    }

    #[test]
    fn test_capture_of_promoted_piece() {
        let mut pos = Position::startpos();
        pos.do_move(usi("7g7f"));
        pos.do_move(usi("3c3d"));
        pos.do_move(usi("8h2b+"));
        let horse = pos.piece_on(usi("8h2b+").to()).unwrap();
        assert_eq!(horse.piece_type(), PieceType::Horse);

        pos.do_move(usi("3a2b"));
        assert_eq!(pos.hand(Color::White).count(PieceType::Bishop), 1);
        assert_eq!(pos.last_move(), Some(usi("3a2b")));

        pos.undo_move();
        assert_eq!(pos.piece_on(horse_square()), Some(horse));
        assert!(pos.hand(Color::White).is_empty());
    }

    fn horse_square() -> Square {
        Square::from_usi("2b").unwrap()
    }

    #[test]
    fn test_king_square() {
        let pos = Position::startpos();
        assert_eq!(pos.king_square(Color::Black), Square::from_usi("5i"));
        assert_eq!(pos.king_square(Color::White), Square::from_usi("5a"));
        assert_eq!(Position::new().king_square(Color::Black), None);
    }
}
