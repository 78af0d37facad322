//! 表記1手分の構文解析

use crate::types::{Color, File, PieceType, Rank, Square};

use super::ResolveError;
use super::names::{decode_digit, match_piece_name};

/// 移動先
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// 升目の明示
    Square(Square),
    /// 「同」（直前の指し手の移動先）
    Same,
}

/// 縦方向の補助記号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    /// 上・行（前進）
    Up,
    /// 引（後退）
    Down,
    /// 寄（横移動）
    Sideways,
}

impl Vertical {
    pub const ALL: [Vertical; 3] = [Vertical::Up, Vertical::Down, Vertical::Sideways];

    pub const fn as_str(self) -> &'static str {
        match self {
            Vertical::Up => "上",
            Vertical::Down => "引",
            Vertical::Sideways => "寄",
        }
    }
}

/// 横方向の補助記号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {
    /// 直（真っ直ぐ前進）
    Straight,
    /// 左
    Left,
    /// 右
    Right,
}

impl Horizontal {
    pub const ALL: [Horizontal; 3] = [Horizontal::Straight, Horizontal::Left, Horizontal::Right];

    pub const fn as_str(self) -> &'static str {
        match self {
            Horizontal::Straight => "直",
            Horizontal::Left => "左",
            Horizontal::Right => "右",
        }
    }
}

/// 成・不成の指定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionMarker {
    Promote,
    NoPromote,
}

/// 表記1手分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShorthandToken {
    /// 手番記号（省略可）
    pub color: Option<Color>,
    pub destination: Destination,
    pub piece_type: PieceType,
    pub vertical: Option<Vertical>,
    pub horizontal: Option<Horizontal>,
    /// 「打」
    pub drop: bool,
    pub promotion: Option<PromotionMarker>,
}

fn is_blank(c: char) -> bool {
    c.is_whitespace()
}

impl ShorthandToken {
    /// 表記を解析する
    ///
    /// 補助記号の並び順は問わない。解釈できない文字が残ればエラー。
    pub fn parse(text: &str) -> Result<ShorthandToken, ResolveError> {
        let err = |reason| ResolveError::TokenParse {
            token: text.to_string(),
            reason,
        };

        let mut rest = text.trim_matches(is_blank);
        let mut color = None;
        let mut chars = rest.chars();
        if let Some(side) = chars.next().and_then(Color::from_glyph) {
            color = Some(side);
            rest = chars.as_str().trim_start_matches(is_blank);
        }
        if rest.is_empty() {
            return Err(err("empty move"));
        }

        let destination = if let Some(after) = rest.strip_prefix('同') {
            rest = after.trim_start_matches(is_blank);
            Destination::Same
        } else {
            let mut chars = rest.chars();
            let (Some(f), Some(r)) = (chars.next(), chars.next()) else {
                return Err(err("missing destination"));
            };
            let file = decode_digit(f).and_then(File::from_number);
            let rank = decode_digit(r).and_then(Rank::from_number);
            let (Some(file), Some(rank)) = (file, rank) else {
                return Err(err("invalid destination"));
            };
            rest = chars.as_str().trim_start_matches(is_blank);
            Destination::Square(Square::new(file, rank))
        };

        let Some((piece_type, len)) = match_piece_name(rest) else {
            return Err(err("unknown piece name"));
        };
        rest = &rest[len..];

        let mut token = ShorthandToken {
            color,
            destination,
            piece_type,
            vertical: None,
            horizontal: None,
            drop: false,
            promotion: None,
        };

        let mut chars = rest.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '上' | '行' => token.vertical = Some(Vertical::Up),
                '引' => token.vertical = Some(Vertical::Down),
                '寄' => token.vertical = Some(Vertical::Sideways),
                '直' => token.horizontal = Some(Horizontal::Straight),
                '左' => token.horizontal = Some(Horizontal::Left),
                '右' => token.horizontal = Some(Horizontal::Right),
                '打' => token.drop = true,
                '成' => token.promotion = Some(PromotionMarker::Promote),
                '不' if chars.peek() == Some(&'成') => {
                    chars.next();
                    token.promotion = Some(PromotionMarker::NoPromote);
                }
                c if is_blank(c) => {}
                _ => return Err(err("unexpected suffix")),
            }
        }

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_usi(s).unwrap()
    }

    #[test]
    fn test_parse_simple() {
        let t = ShorthandToken::parse("▲７六歩").unwrap();
        assert_eq!(t.color, Some(Color::Black));
        assert_eq!(t.destination, Destination::Square(sq("7f")));
        assert_eq!(t.piece_type, PieceType::Pawn);
        assert_eq!(t.vertical, None);
        assert_eq!(t.promotion, None);
    }

    #[test]
    fn test_parse_same_with_fullwidth_space() {
        let t = ShorthandToken::parse("△同　銀").unwrap();
        assert_eq!(t.color, Some(Color::White));
        assert_eq!(t.destination, Destination::Same);
        assert_eq!(t.piece_type, PieceType::Silver);

        let t = ShorthandToken::parse("同成銀").unwrap();
        assert_eq!(t.piece_type, PieceType::ProSilver);
        assert_eq!(t.color, None);
    }

    #[test]
    fn test_parse_digit_styles() {
        for text in ["７六歩", "7六歩", "76歩", "七六歩", "７6歩"] {
            let t = ShorthandToken::parse(text).unwrap();
            assert_eq!(t.destination, Destination::Square(sq("7f")), "{text}");
        }
    }

    #[test]
    fn test_parse_markers() {
        let t = ShorthandToken::parse("▲５八金左上").unwrap();
        assert_eq!(t.horizontal, Some(Horizontal::Left));
        assert_eq!(t.vertical, Some(Vertical::Up));

        let t = ShorthandToken::parse("▲２二角不成").unwrap();
        assert_eq!(t.promotion, Some(PromotionMarker::NoPromote));

        let t = ShorthandToken::parse("▲２二角成").unwrap();
        assert_eq!(t.promotion, Some(PromotionMarker::Promote));

        let t = ShorthandToken::parse("▽５五歩打").unwrap();
        assert!(t.drop);
        assert_eq!(t.color, Some(Color::White));

        let t = ShorthandToken::parse("▲１一龍行").unwrap();
        assert_eq!(t.vertical, Some(Vertical::Up));
    }

    #[test]
    fn test_parse_errors() {
        for text in ["", "▲", "▲７", "▲０六歩", "▲７六", "▲７六象", "▲７六歩x", "▲７六歩不"] {
            assert!(
                matches!(ShorthandToken::parse(text), Err(ResolveError::TokenParse { .. })),
                "{text}"
            );
        }
    }
}
