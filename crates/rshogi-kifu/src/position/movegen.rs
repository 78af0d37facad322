//! 合法手生成
//!
//! 駒割り配列を直接走査する単純な生成器。棋譜の再生と表記の曖昧さ解消に
//! 使う程度の呼び出し頻度を想定している。

use crate::types::{Color, Move, Piece, PieceType, Rank, Square};

use super::pos::Position;

type Board = [Option<Piece>; Square::NUM];

/// 先手から見た (筋の増分, 段の増分)。段は1段目方向が負。
type Delta = (i8, i8);

const PAWN_STEPS: &[Delta] = &[(0, -1)];
const KNIGHT_STEPS: &[Delta] = &[(-1, -2), (1, -2)];
const SILVER_STEPS: &[Delta] = &[(0, -1), (-1, -1), (1, -1), (-1, 1), (1, 1)];
const GOLD_STEPS: &[Delta] = &[(0, -1), (-1, -1), (1, -1), (-1, 0), (1, 0), (0, 1)];
const KING_STEPS: &[Delta] = &[
    (0, -1),
    (-1, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (0, 1),
    (-1, 1),
    (1, 1),
];
const ORTHOGONAL: &[Delta] = &[(0, -1), (0, 1), (-1, 0), (1, 0)];
const DIAGONAL: &[Delta] = &[(-1, -1), (1, -1), (-1, 1), (1, 1)];
const LANCE_RAYS: &[Delta] = &[(0, -1)];

/// 1マスだけ動ける方向
fn steps(pt: PieceType) -> &'static [Delta] {
    match pt {
        PieceType::Pawn => PAWN_STEPS,
        PieceType::Knight => KNIGHT_STEPS,
        PieceType::Silver => SILVER_STEPS,
        PieceType::Gold
        | PieceType::ProPawn
        | PieceType::ProLance
        | PieceType::ProKnight
        | PieceType::ProSilver => GOLD_STEPS,
        PieceType::King => KING_STEPS,
        PieceType::Horse => ORTHOGONAL,
        PieceType::Dragon => DIAGONAL,
        PieceType::Lance | PieceType::Bishop | PieceType::Rook => &[],
    }
}

/// 走り駒の方向
fn rays(pt: PieceType) -> &'static [Delta] {
    match pt {
        PieceType::Lance => LANCE_RAYS,
        PieceType::Bishop | PieceType::Horse => DIAGONAL,
        PieceType::Rook | PieceType::Dragon => ORTHOGONAL,
        _ => &[],
    }
}

/// 手番に合わせて向きを反転する
#[inline]
fn oriented(color: Color, (df, dr): Delta) -> Delta {
    match color {
        Color::Black => (df, dr),
        Color::White => (-df, -dr),
    }
}

/// 駒 `pc` が `from` から利いている升を列挙する
fn for_each_target(board: &Board, pc: Piece, from: Square, mut f: impl FnMut(Square)) {
    let color = pc.color();
    for &d in steps(pc.piece_type()) {
        let (df, dr) = oriented(color, d);
        if let Some(to) = from.offset(df, dr) {
            f(to);
        }
    }
    for &d in rays(pc.piece_type()) {
        let (df, dr) = oriented(color, d);
        let mut cur = from;
        while let Some(to) = cur.offset(df, dr) {
            f(to);
            if board[to.index()].is_some() {
                break;
            }
            cur = to;
        }
    }
}

/// `sq` に `by` 側の駒が利いているか
fn is_attacked(board: &Board, sq: Square, by: Color) -> bool {
    Square::all().any(|from| match board[from.index()] {
        Some(pc) if pc.color() == by => {
            let mut hit = false;
            for_each_target(board, pc, from, |to| hit |= to == sq);
            hit
        }
        _ => false,
    })
}

/// 生駒のまま置くと以後動けなくなる段か
#[inline]
fn is_dead_end(pt: PieceType, color: Color, rank: Rank) -> bool {
    let rel = rank.relative(color);
    match pt {
        PieceType::Pawn | PieceType::Lance => rel == 0,
        PieceType::Knight => rel <= 1,
        _ => false,
    }
}

/// 盤面に手を適用したコピーを返す（持ち駒は扱わない）
fn board_after(board: &Board, us: Color, m: Move) -> Board {
    let mut next = *board;
    match m {
        Move::Normal { from, to, promote } => {
            let pc = next[from.index()].take();
            next[to.index()] = pc.map(|pc| if promote { pc.promoted() } else { pc });
        }
        Move::Drop { piece_type, to } => {
            next[to.index()] = Some(Piece::new(us, piece_type));
        }
    }
    next
}

/// 手を指した後に自玉が取られる状態でないか
fn leaves_king_safe(board: &Board, us: Color, m: Move) -> bool {
    let next = board_after(board, us, m);
    let king = Piece::new(us, PieceType::King);
    match Square::all().find(|sq| next[sq.index()] == Some(king)) {
        Some(ksq) => !is_attacked(&next, ksq, !us),
        None => true,
    }
}

impl Position {
    /// 全ての合法手
    pub fn legal_moves(&self) -> Vec<Move> {
        self.generate(None)
    }

    /// `to` に移動する合法手
    pub fn legal_moves_to(&self, to: Square) -> Vec<Move> {
        self.generate(Some(to))
    }

    fn generate(&self, target: Option<Square>) -> Vec<Move> {
        let us = self.side_to_move;
        let mut moves = Vec::new();
        self.push_board_moves(us, target, &mut moves);
        self.push_drops(us, target, &mut moves);
        moves.retain(|&m| leaves_king_safe(&self.board, us, m));
        moves.retain(|&m| !self.is_pawn_drop_mate(m));
        moves
    }

    /// 盤上の駒の移動（自玉の安全は見ない）
    fn push_board_moves(&self, us: Color, target: Option<Square>, moves: &mut Vec<Move>) {
        for from in Square::all() {
            let Some(pc) = self.board[from.index()] else {
                continue;
            };
            if pc.color() != us {
                continue;
            }
            let pt = pc.piece_type();
            for_each_target(&self.board, pc, from, |to| {
                if target.is_some_and(|t| t != to) {
                    return;
                }
                if self.board[to.index()].is_some_and(|c| c.color() == us) {
                    return;
                }
                let promotable = pt.can_promote()
                    && (from.rank().can_promote(us) || to.rank().can_promote(us));
                if promotable {
                    moves.push(Move::new_move(from, to, true));
                }
                if !is_dead_end(pt, us, to.rank()) {
                    moves.push(Move::new_move(from, to, false));
                }
            });
        }
    }

    /// 駒打ち（打ち歩詰めは見ない）
    fn push_drops(&self, us: Color, target: Option<Square>, moves: &mut Vec<Move>) {
        let hand = self.hand[us.index()];
        if hand.is_empty() {
            return;
        }
        let own_pawn = Piece::new(us, PieceType::Pawn);
        let squares: Vec<Square> = match target {
            Some(to) => vec![to],
            None => Square::all().collect(),
        };

        for to in squares {
            if self.board[to.index()].is_some() {
                continue;
            }
            for (pt, _) in hand.iter() {
                if is_dead_end(pt, us, to.rank()) {
                    continue;
                }
                if pt == PieceType::Pawn {
                    let file = to.file();
                    let nifu = Square::all()
                        .filter(|sq| sq.file() == file)
                        .any(|sq| self.board[sq.index()] == Some(own_pawn));
                    if nifu {
                        continue;
                    }
                }
                moves.push(Move::new_drop(pt, to));
            }
        }
    }

    /// 打ち歩詰めか
    ///
    /// 相手玉の正面への歩打ちで、相手に玉を救う盤上の手がない場合に真。
    /// 歩による王手は合駒で防げないので、相手の駒打ちは考えない。
    fn is_pawn_drop_mate(&self, m: Move) -> bool {
        let Move::Drop {
            piece_type: PieceType::Pawn,
            to,
        } = m
        else {
            return false;
        };
        let us = self.side_to_move;
        let them = !us;
        let Some(ksq) = self.king_square(them) else {
            return false;
        };
        if to.offset(0, us.forward()) != Some(ksq) {
            return false;
        }

        let next = board_after(&self.board, us, m);
        for from in Square::all() {
            let Some(pc) = next[from.index()] else {
                continue;
            };
            if pc.color() != them {
                continue;
            }
            let mut escapes = false;
            for_each_target(&next, pc, from, |dest| {
                if escapes || next[dest.index()].is_some_and(|c| c.color() == them) {
                    return;
                }
                // 成り・不成は玉の安全に影響しないので不成で代表させる
                let reply = Move::new_move(from, dest, false);
                escapes = leaves_king_safe(&next, them, reply);
            });
            if escapes {
                return false;
            }
        }
        true
    }
}
