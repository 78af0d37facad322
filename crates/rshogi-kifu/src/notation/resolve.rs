//! 表記から指し手への変換（曖昧さ解消）

use smallvec::SmallVec;

use crate::position::Position;
use crate::types::{Color, Move, Square};

use super::ResolveError;
use super::token::{Destination, Horizontal, PromotionMarker, ShorthandToken, Vertical};

type Candidates = SmallVec<[Move; 8]>;

/// 表記の解決結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub mv: Move,
    /// 補助記号で絞り切れず升目番号で決めた場合、その時点の候補数
    pub ambiguous: Option<usize>,
}

/// 表記を局面上の合法手に解決する
///
/// `last_destination` は局面に履歴がないときの「同」の参照先。
pub fn resolve(
    pos: &Position,
    last_destination: Option<Square>,
    text: &str,
) -> Result<Resolution, ResolveError> {
    let token = ShorthandToken::parse(text)?;

    let to = match token.destination {
        Destination::Square(sq) => sq,
        Destination::Same => pos
            .last_move()
            .map(Move::to)
            .or(last_destination)
            .ok_or_else(|| ResolveError::NoLastDestination(text.to_string()))?,
    };

    let legal = pos.legal_moves_to(to);
    let mut candidates: Candidates = legal
        .iter()
        .copied()
        .filter(|&m| matches_token(pos, m, &token, token.promotion))
        .collect();
    if candidates.is_empty() && token.promotion.is_none() {
        // 成りしか選べない手を「成」なしで書いた棋譜を受け付ける
        candidates = legal
            .iter()
            .copied()
            .filter(|&m| matches_token(pos, m, &token, Some(PromotionMarker::Promote)))
            .collect();
    }

    match candidates.len() {
        0 => return Err(ResolveError::NoLegalCandidate(text.to_string())),
        1 => return Ok(Resolution { mv: candidates[0], ambiguous: None }),
        _ => {}
    }

    let us = pos.side_to_move();
    let settled = narrow(&mut candidates, |m| !token.drop || m.is_drop())
        || narrow(&mut candidates, |m| !m.is_drop())
        || token
            .vertical
            .is_some_and(|v| narrow(&mut candidates, |m| is_vertical(m, us, v)))
        || token
            .horizontal
            .is_some_and(|h| narrow_horizontal(&mut candidates, us, h));

    if settled {
        return Ok(Resolution { mv: candidates[0], ambiguous: None });
    }

    let remaining = candidates.len();
    let mv = candidates
        .into_iter()
        .min_by_key(|m| m.from().map_or(usize::MAX, Square::index))
        .ok_or_else(|| ResolveError::NoLegalCandidate(text.to_string()))?;
    log::debug!("'{text}' is ambiguous among {remaining} moves; chose {mv}");
    Ok(Resolution {
        mv,
        ambiguous: Some(remaining),
    })
}

/// 候補が表記の駒種・成不成と合うか
fn matches_token(
    pos: &Position,
    m: Move,
    token: &ShorthandToken,
    promotion: Option<PromotionMarker>,
) -> bool {
    match m {
        Move::Drop { piece_type, .. } => {
            piece_type == token.piece_type && promotion != Some(PromotionMarker::Promote)
        }
        Move::Normal { from, promote, .. } => {
            let Some(pc) = pos.piece_on(from) else {
                return false;
            };
            pc.piece_type() == token.piece_type
                && promote == (promotion == Some(PromotionMarker::Promote))
        }
    }
}

/// 条件に合う候補があればそれだけに絞る。候補が一つになったら真。
fn narrow(candidates: &mut Candidates, keep: impl Fn(Move) -> bool) -> bool {
    let kept: Candidates = candidates.iter().copied().filter(|&m| keep(m)).collect();
    if !kept.is_empty() {
        *candidates = kept;
    }
    candidates.len() == 1
}

/// 手番から見て前進する手か
fn is_advancing(from: Square, to: Square, us: Color) -> bool {
    match us {
        Color::Black => from.rank() > to.rank(),
        Color::White => from.rank() < to.rank(),
    }
}

fn is_vertical(m: Move, us: Color, v: Vertical) -> bool {
    let Move::Normal { from, to, .. } = m else {
        return false;
    };
    match v {
        Vertical::Up => is_advancing(from, to, us),
        Vertical::Down => is_advancing(to, from, us),
        Vertical::Sideways => from.rank() == to.rank(),
    }
}

/// 手番から見て `from` が `to` の左にあるか（先手の左は9筋側）
fn is_left_of(from: Square, to: Square, us: Color) -> bool {
    match us {
        Color::Black => from.file() > to.file(),
        Color::White => from.file() < to.file(),
    }
}

fn is_horizontal(m: Move, us: Color, h: Horizontal) -> bool {
    let Move::Normal { from, to, .. } = m else {
        return false;
    };
    match h {
        Horizontal::Straight => from.file() == to.file() && is_advancing(from, to, us),
        Horizontal::Left => is_left_of(from, to, us),
        Horizontal::Right => is_left_of(to, from, us),
    }
}

/// 左右の絞り込み
///
/// 移動先との比較で該当がなければ、最も左（右）の筋にいる候補を残す。
fn narrow_horizontal(candidates: &mut Candidates, us: Color, h: Horizontal) -> bool {
    if candidates.iter().any(|&m| is_horizontal(m, us, h)) {
        return narrow(candidates, |m| is_horizontal(m, us, h));
    }

    let leftmost = matches!(
        (h, us),
        (Horizontal::Left, Color::Black) | (Horizontal::Right, Color::White)
    );
    let files = candidates.iter().filter_map(|m| m.from()).map(|sq| sq.file());
    let extreme = match (h, leftmost) {
        (Horizontal::Straight, _) => None,
        (_, true) => files.max(),
        (_, false) => files.min(),
    };
    match extreme {
        Some(file) => narrow(candidates, |m| m.from().is_some_and(|sq| sq.file() == file)),
        None => candidates.len() == 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(moves: &[&str]) -> Position {
        let mut pos = Position::startpos();
        for m in moves {
            pos.do_move(Move::from_usi(m).unwrap());
        }
        pos
    }

    fn resolved(pos: &Position, text: &str) -> String {
        resolve(pos, None, text).unwrap().mv.to_usi()
    }

    #[test]
    fn test_resolve_basic() {
        let pos = Position::startpos();
        assert_eq!(resolved(&pos, "▲７六歩"), "7g7f");
        assert_eq!(resolved(&pos, "▲２六歩"), "2g2f");
    }

    #[test]
    fn test_resolve_same_square() {
        let pos = play(&["7g7f", "3c3d", "8h2b+"]);
        assert_eq!(resolved(&pos, "△同　銀"), "3a2b");
        assert_eq!(resolved(&pos, "△同銀"), "3a2b");
    }

    #[test]
    fn test_resolve_promotion_marker() {
        let pos = play(&["7g7f", "3c3d"]);
        assert_eq!(resolved(&pos, "▲２二角成"), "8h2b+");
        assert_eq!(resolved(&pos, "▲２二角不成"), "8h2b");
        assert_eq!(resolved(&pos, "▲２二角"), "8h2b");
    }

    #[test]
    fn test_resolve_forced_promotion_without_marker() {
        let pos = Position::from_sfen("4k4/P8/9/9/9/9/9/9/4K4 b - 1").unwrap();
        assert_eq!(resolved(&pos, "▲９一歩"), "9b9a+");
        assert_eq!(resolved(&pos, "▲９一歩成"), "9b9a+");
        assert!(matches!(
            resolve(&pos, None, "▲９一歩不成"),
            Err(ResolveError::NoLegalCandidate(_))
        ));
    }

    #[test]
    fn test_resolve_same_without_history() {
        let pos = Position::from_sfen("4k4/9/9/9/9/4p4/4P4/9/4K4 b - 1").unwrap();
        let target = Square::from_usi("5f").unwrap();
        let r = resolve(&pos, Some(target), "▲同　歩").unwrap();
        assert_eq!(r.mv.to(), target);
        assert!(matches!(
            resolve(&pos, None, "▲同　歩"),
            Err(ResolveError::NoLastDestination(_))
        ));
    }

    #[test]
    fn test_resolve_no_candidate() {
        let pos = Position::startpos();
        assert!(matches!(
            resolve(&pos, None, "▲５五歩"),
            Err(ResolveError::NoLegalCandidate(_))
        ));
        assert!(matches!(
            resolve(&pos, None, "▲７六"),
            Err(ResolveError::TokenParse { .. })
        ));
    }

    #[test]
    fn test_resolve_left_right_gold() {
        // 6九金と4九金がともに5八へ
        let pos = Position::startpos();
        assert_eq!(resolved(&pos, "▲５八金左"), "6i5h");
        assert_eq!(resolved(&pos, "▲５八金右"), "4i5h");

        // 後手は左右が逆
        let pos = play(&["2g2f"]);
        assert_eq!(resolved(&pos, "△５二金左"), "4a5b");
        assert_eq!(resolved(&pos, "△５二金右"), "6a5b");
    }

    #[test]
    fn test_resolve_vertical_black_and_white() {
        // 先手: 5八の金は6八へ寄れる。7九銀は6八へ上がれる。
        let pos = Position::from_sfen("4k4/9/9/9/9/9/9/4G4/2S1K4 b - 1").unwrap();
        assert_eq!(resolved(&pos, "▲６八金寄"), "5h6h");
        assert_eq!(resolved(&pos, "▲６八銀上"), "7i6h");

        // 金が上と引の両方から来る
        let pos = Position::from_sfen("4k4/9/9/9/5G3/9/5G3/9/4K4 b - 1").unwrap();
        assert_eq!(resolved(&pos, "▲４六金上"), "4g4f");
        assert_eq!(resolved(&pos, "▲４六金引"), "4e4f");

        let pos = Position::from_sfen("4k4/9/5g3/9/5g3/9/9/9/4K4 w - 1").unwrap();
        assert_eq!(resolved(&pos, "△４四金上"), "4c4d");
        assert_eq!(resolved(&pos, "△４四金引"), "4e4d");
    }

    #[test]
    fn test_resolve_straight() {
        // 銀が6九と5九にいて5八へ
        let pos = Position::from_sfen("4k4/9/9/9/9/9/9/9/3SS3K b - 1").unwrap();
        assert_eq!(resolved(&pos, "▲５八銀直"), "5i5h");
        assert_eq!(resolved(&pos, "▲５八銀左"), "6i5h");
    }

    #[test]
    fn test_resolve_drop_marker() {
        // 持ち駒の金と盤上の金がともに5八へ
        let pos = Position::from_sfen("4k4/9/9/9/9/9/9/9/3G1K3 b G 1").unwrap();
        assert_eq!(resolved(&pos, "▲５八金打"), "G*5h");
        assert_eq!(resolved(&pos, "▲５八金"), "6i5h");
    }

    #[test]
    fn test_resolve_extreme_file_fallback() {
        // 9一龍と9九龍がともに9五へ。どちらも移動先と同じ筋にいる。
        let pos = Position::from_sfen("+R8/4k4/9/9/9/9/9/9/+R3K4 b - 1").unwrap();
        let r = resolve(&pos, None, "▲９五龍左").unwrap();
        assert_eq!(r.ambiguous, Some(2));
        assert_eq!(r.mv.to_usi(), "9a9e");
        assert_eq!(resolved(&pos, "▲９五龍引"), "9a9e");
        assert_eq!(resolved(&pos, "▲９五龍上"), "9i9e");

        // 2七銀と1七銀が2六へ。移動先より左の候補がないので最も左の筋が残る
        let pos = Position::from_sfen("4k4/9/9/9/9/9/7SS/9/4K4 b - 1").unwrap();
        assert_eq!(resolved(&pos, "▲２六銀左"), "2g2f");
        assert_eq!(resolved(&pos, "▲２六銀右"), "1g2f");
    }
}
