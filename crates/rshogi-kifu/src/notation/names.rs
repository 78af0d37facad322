//! 駒名・升目の漢字表記

use crate::types::{PieceType, Square};

/// 駒名と駒種（別名を含む）
pub(super) const PIECE_NAMES: &[(&str, PieceType)] = &[
    ("成香", PieceType::ProLance),
    ("成桂", PieceType::ProKnight),
    ("成銀", PieceType::ProSilver),
    ("歩", PieceType::Pawn),
    ("香", PieceType::Lance),
    ("桂", PieceType::Knight),
    ("銀", PieceType::Silver),
    ("金", PieceType::Gold),
    ("角", PieceType::Bishop),
    ("飛", PieceType::Rook),
    ("玉", PieceType::King),
    ("王", PieceType::King),
    ("と", PieceType::ProPawn),
    ("杏", PieceType::ProLance),
    ("圭", PieceType::ProKnight),
    ("全", PieceType::ProSilver),
    ("馬", PieceType::Horse),
    ("龍", PieceType::Dragon),
    ("竜", PieceType::Dragon),
];

const FILE_ZENKAKU: [&str; 9] = ["１", "２", "３", "４", "５", "６", "７", "８", "９"];
const RANK_KANJI: [&str; 9] = ["一", "二", "三", "四", "五", "六", "七", "八", "九"];

/// 駒の表記名（現在の駒種の名前。成駒は「と」「成銀」「馬」等）
pub fn piece_name(pt: PieceType) -> &'static str {
    match pt {
        PieceType::Pawn => "歩",
        PieceType::Lance => "香",
        PieceType::Knight => "桂",
        PieceType::Silver => "銀",
        PieceType::Gold => "金",
        PieceType::Bishop => "角",
        PieceType::Rook => "飛",
        PieceType::King => "玉",
        PieceType::ProPawn => "と",
        PieceType::ProLance => "成香",
        PieceType::ProKnight => "成桂",
        PieceType::ProSilver => "成銀",
        PieceType::Horse => "馬",
        PieceType::Dragon => "龍",
    }
}

/// 升目の表記（"７六" 等）
pub fn square_label(sq: Square) -> String {
    format!(
        "{}{}",
        FILE_ZENKAKU[sq.file().index()],
        RANK_KANJI[sq.rank().index()]
    )
}

/// 筋・段の数字（全角、半角、漢数字）を 1-9 に変換
pub(super) fn decode_digit(c: char) -> Option<u32> {
    match c {
        '１'..='９' => Some(c as u32 - '１' as u32 + 1),
        '1'..='9' => c.to_digit(10),
        _ => RANK_KANJI
            .iter()
            .position(|k| k.starts_with(c))
            .map(|i| i as u32 + 1),
    }
}

/// 先頭に一致する最長の駒名。駒種と駒名の長さ（バイト数）を返す。
pub(super) fn match_piece_name(s: &str) -> Option<(PieceType, usize)> {
    PIECE_NAMES
        .iter()
        .filter(|(name, _)| s.starts_with(name))
        .max_by_key(|(name, _)| name.chars().count())
        .map(|(name, pt)| (*pt, name.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_label() {
        assert_eq!(square_label(Square::from_usi("7f").unwrap()), "７六");
        assert_eq!(square_label(Square::from_usi("1a").unwrap()), "１一");
        assert_eq!(square_label(Square::from_usi("9i").unwrap()), "９九");
    }

    #[test]
    fn test_decode_digit() {
        assert_eq!(decode_digit('７'), Some(7));
        assert_eq!(decode_digit('7'), Some(7));
        assert_eq!(decode_digit('七'), Some(7));
        assert_eq!(decode_digit('一'), Some(1));
        assert_eq!(decode_digit('0'), None);
        assert_eq!(decode_digit('０'), None);
        assert_eq!(decode_digit('十'), None);
    }

    #[test]
    fn test_match_piece_name() {
        assert_eq!(match_piece_name("成銀右"), Some((PieceType::ProSilver, 6)));
        assert_eq!(match_piece_name("銀成"), Some((PieceType::Silver, 3)));
        assert_eq!(match_piece_name("竜引"), Some((PieceType::Dragon, 3)));
        assert_eq!(match_piece_name("王"), Some((PieceType::King, 3)));
        assert_eq!(match_piece_name("成"), None);
    }

    #[test]
    fn test_piece_name_roundtrip() {
        for &(_, pt) in PIECE_NAMES {
            let name = piece_name(pt);
            assert_eq!(match_piece_name(name).map(|(p, _)| p), Some(pt));
        }
    }
}
