//! 指し手から表記への変換

use crate::position::Position;
use crate::types::Move;

use super::names::{piece_name, square_label};
use super::resolve::resolve;
use super::token::{Horizontal, Vertical};

/// 補助記号の候補（試す順）
fn marker_options() -> Vec<String> {
    let mut options = vec![String::new()];
    options.extend(Vertical::ALL.iter().map(|v| v.as_str().to_string()));
    options.extend(Horizontal::ALL.iter().map(|h| h.as_str().to_string()));
    for h in [Horizontal::Left, Horizontal::Right] {
        for v in Vertical::ALL {
            options.push(format!("{}{}", h.as_str(), v.as_str()));
        }
    }
    options
}

/// 指し手をKI2表記にする（手番記号は付けない）
///
/// 補助記号は、なし・縦・横・縦横の順に試し、`resolve` で同じ手に戻る最初のものを使う。
pub fn format(pos: &Position, m: Move) -> String {
    let to = m.to();
    let dest = if pos.last_move().map(Move::to) == Some(to) {
        "同　".to_string()
    } else {
        square_label(to)
    };

    let Some(pc) = pos.moved_piece(m) else {
        log::warn!("no piece to move for {m}");
        return format!("{dest}{m}");
    };
    let pt = pc.piece_type();
    let name = piece_name(pt);

    let from = match m {
        Move::Drop { piece_type, .. } => {
            let board_move_exists = pos.legal_moves_to(to).iter().any(|&c| {
                c.from()
                    .and_then(|from| pos.piece_on(from))
                    .is_some_and(|p| p.piece_type() == piece_type)
            });
            let suffix = if board_move_exists { "打" } else { "" };
            return format!("{dest}{name}{suffix}");
        }
        Move::Normal { from, .. } => from,
    };

    let us = pos.side_to_move();
    let promotion = if m.is_promote() {
        "成"
    } else if pt.can_promote() && (from.rank().can_promote(us) || to.rank().can_promote(us)) {
        "不成"
    } else {
        ""
    };

    let texts: Vec<String> = marker_options()
        .iter()
        .map(|marker| format!("{dest}{name}{marker}{promotion}"))
        .collect();

    let exact = texts.iter().find(|text| {
        resolve(pos, None, text).is_ok_and(|r| r.mv == m && r.ambiguous.is_none())
    });
    let loose = || {
        texts
            .iter()
            .find(|text| resolve(pos, None, text).is_ok_and(|r| r.mv == m))
    };
    match exact.or_else(loose) {
        Some(text) => text.clone(),
        None => {
            log::debug!("no marker set resolves back to {m}");
            texts[0].clone()
        }
    }
}
