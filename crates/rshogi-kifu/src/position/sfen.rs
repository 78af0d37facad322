//! SFEN形式の解析・出力

use crate::types::{Color, File, Piece, Rank, Square};

use super::pos::Position;

/// 平手初期局面のSFEN
pub const SFEN_HIRATE: &str = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";

/// 手合割の名前と開始局面（駒落ちは上手=後手が先に指す）
pub const HANDICAPS: &[(&str, &str)] = &[
    ("平手", SFEN_HIRATE),
    ("香落ち", "lnsgkgsn1/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1"),
    ("右香落ち", "1nsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1"),
    ("角落ち", "lnsgkgsnl/1r7/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1"),
    ("飛車落ち", "lnsgkgsnl/7b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1"),
    ("飛香落ち", "lnsgkgsn1/7b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1"),
    ("二枚落ち", "lnsgkgsnl/9/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1"),
    ("三枚落ち", "lnsgkgsn1/9/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1"),
    ("四枚落ち", "1nsgkgsn1/9/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1"),
    ("五枚落ち", "1nsgkgs2/9/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1"),
    ("左五枚落ち", "2sgkgsn1/9/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1"),
    ("六枚落ち", "2sgkgs2/9/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1"),
    ("八枚落ち", "3gkg3/9/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1"),
    ("十枚落ち", "4k4/9/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1"),
];

/// 手合割の名前から開始局面のSFENを引く
pub fn handicap_sfen(name: &str) -> Option<&'static str> {
    let name = name.trim();
    HANDICAPS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, sfen)| *sfen)
}

/// SFENパースエラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SfenError {
    /// 盤面の形式が不正
    #[error("Invalid board: {0}")]
    Board(String),
    /// 手番の形式が不正
    #[error("Invalid side to move: {0}")]
    SideToMove(String),
    /// 手駒の形式が不正
    #[error("Invalid hand: {0}")]
    Hand(String),
    /// 手数の形式が不正
    #[error("Invalid ply: {0}")]
    Ply(String),
}

impl Position {
    /// 平手初期局面を設定
    pub fn set_hirate(&mut self) {
        *self = Position::new();
        self.parse_board("lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL")
            .unwrap_or_else(|e| unreachable!("hirate board is well-formed: {e}"));
    }

    /// SFEN文字列から局面を生成
    pub fn from_sfen(sfen: &str) -> Result<Position, SfenError> {
        let mut pos = Position::new();
        pos.set_sfen(sfen)?;
        Ok(pos)
    }

    /// SFEN文字列から局面を設定（履歴は消える）
    pub fn set_sfen(&mut self, sfen: &str) -> Result<(), SfenError> {
        *self = Position::new();

        let parts: Vec<&str> = sfen.split_whitespace().collect();
        if parts.len() < 3 {
            return Err(SfenError::Board("SFEN must have at least 3 parts".to_string()));
        }

        // 1. 盤面
        self.parse_board(parts[0])?;

        // 2. 手番
        self.side_to_move = match parts[1] {
            "b" => Color::Black,
            "w" => Color::White,
            other => {
                return Err(SfenError::SideToMove(format!("Expected 'b' or 'w', got '{other}'")));
            }
        };

        // 3. 手駒
        self.parse_hand(parts[2])?;

        // 4. 手数（オプション）
        if let Some(ply) = parts.get(3) {
            self.game_ply = ply.parse().map_err(|_| SfenError::Ply(ply.to_string()))?;
        }

        Ok(())
    }

    /// 盤面部分をパース
    fn parse_board(&mut self, board_str: &str) -> Result<(), SfenError> {
        let ranks: Vec<&str> = board_str.split('/').collect();
        if ranks.len() != Rank::NUM {
            return Err(SfenError::Board(format!("Expected 9 ranks, got {}", ranks.len())));
        }

        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = Rank::ALL[rank_idx];
            // SFENは9筋から1筋へ並ぶ
            let mut file_idx: i32 = 8;
            let mut promoted = false;

            for c in rank_str.chars() {
                if file_idx < 0 {
                    return Err(SfenError::Board(format!("Too many squares in rank {}", rank_idx + 1)));
                }
                if let Some(n) = c.to_digit(10) {
                    if promoted || n == 0 {
                        return Err(SfenError::Board(format!("Unexpected '{c}' in '{rank_str}'")));
                    }
                    file_idx -= n as i32;
                    continue;
                }
                if c == '+' {
                    if promoted {
                        return Err(SfenError::Board(format!("Double '+' in '{rank_str}'")));
                    }
                    promoted = true;
                    continue;
                }

                let pc = Piece::from_sfen_char(c)
                    .ok_or_else(|| SfenError::Board(format!("Invalid piece char: {c}")))?;
                let pc = if promoted {
                    if !pc.piece_type().can_promote() {
                        return Err(SfenError::Board(format!("Cannot promote: {c}")));
                    }
                    pc.promoted()
                } else {
                    pc
                };
                promoted = false;

                let sq = Square::new(File::ALL[file_idx as usize], rank);
                self.board[sq.index()] = Some(pc);
                file_idx -= 1;
            }

            if file_idx != -1 || promoted {
                return Err(SfenError::Board(format!(
                    "Rank {} does not cover 9 files: '{rank_str}'",
                    rank_idx + 1
                )));
            }
        }

        Ok(())
    }

    /// 持ち駒部分をパース
    fn parse_hand(&mut self, hand_str: &str) -> Result<(), SfenError> {
        if hand_str == "-" {
            return Ok(());
        }

        let mut count: u32 = 0;
        for c in hand_str.chars() {
            if let Some(d) = c.to_digit(10) {
                count = count * 10 + d;
                if count > 18 {
                    return Err(SfenError::Hand(format!("Count too large in '{hand_str}'")));
                }
                continue;
            }
            let pc = Piece::from_sfen_char(c)
                .filter(|pc| pc.piece_type().is_hand_piece())
                .ok_or_else(|| SfenError::Hand(format!("Invalid hand piece: {c}")))?;
            let n = if count == 0 { 1 } else { count as u8 };
            self.hand[pc.color().index()].add_n(pc.piece_type(), n);
            count = 0;
        }
        if count != 0 {
            return Err(SfenError::Hand(format!("Dangling count in '{hand_str}'")));
        }

        Ok(())
    }

    /// 現局面のSFEN文字列を取得
    pub fn to_sfen(&self) -> String {
        format!("{} {}", self.fingerprint(), self.game_ply)
    }

    /// 局面の指紋（盤面・手番・持ち駒。手数を含まないSFEN）
    pub fn fingerprint(&self) -> String {
        let mut result = String::with_capacity(96);

        // 1. 盤面
        for (rank_idx, &rank) in Rank::ALL.iter().enumerate() {
            let mut empty_count = 0;
            for &file in File::ALL.iter().rev() {
                match self.piece_on(Square::new(file, rank)) {
                    None => empty_count += 1,
                    Some(pc) => {
                        if empty_count > 0 {
                            result.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        result.push_str(&pc.to_sfen());
                    }
                }
            }
            if empty_count > 0 {
                result.push_str(&empty_count.to_string());
            }
            if rank_idx < 8 {
                result.push('/');
            }
        }

        // 2. 手番
        result.push(' ');
        result.push(match self.side_to_move {
            Color::Black => 'b',
            Color::White => 'w',
        });

        // 3. 手駒
        result.push(' ');
        let hand_str = self.hand_to_sfen();
        if hand_str.is_empty() {
            result.push('-');
        } else {
            result.push_str(&hand_str);
        }

        result
    }

    /// 持ち駒をSFEN形式に変換（先手、後手の順）
    fn hand_to_sfen(&self) -> String {
        let mut result = String::new();
        for color in Color::ALL {
            for (pt, n) in self.hand[color.index()].iter() {
                if n > 1 {
                    result.push_str(&n.to_string());
                }
                result.push_str(&Piece::new(color, pt).to_sfen());
            }
        }
        result
    }
}
