//! FEN parsing/formatting and UCI long-algebraic move notation.

use std::str::FromStr;

use super::BitPosition;
use crate::board::error::{FenError, MoveParseError};
use crate::board::types::{CastlingRights, Color, Move, Piece, Square};

impl BitPosition {
    /// Parse a position from FEN notation.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        let mut pos = BitPosition::empty();
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        for (rank_idx, rank_str) in parts[0].split('/').enumerate() {
            if rank_idx >= 8 {
                return Err(FenError::InvalidRank { rank: rank_idx });
            }
            let mut file = 0;
            for c in rank_str.chars() {
                if c.is_ascii_digit() {
                    file += c.to_digit(10).unwrap() as usize;
                } else {
                    let color = if c.is_uppercase() { Color::White } else { Color::Black };
                    let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                    if file >= 8 {
                        return Err(FenError::TooManyFiles { rank: rank_idx, files: file + 1 });
                    }
                    pos.set_piece(Square::new(7 - rank_idx, file), color, piece);
                    file += 1;
                }
            }
        }

        pos.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidSideToMove { found: other.to_string() }),
        };

        let mut castling = CastlingRights::none();
        for c in parts[2].chars() {
            match c {
                'K' => castling.set(Color::White, true),
                'Q' => castling.set(Color::White, false),
                'k' => castling.set(Color::Black, true),
                'q' => castling.set(Color::Black, false),
                '-' => {}
                _ => return Err(FenError::InvalidCastling { char: c }),
            }
        }
        pos.castling = castling;

        pos.en_passant = if parts[3] == "-" {
            None
        } else {
            let chars: Vec<char> = parts[3].chars().collect();
            if chars.len() == 2 && ('a'..='h').contains(&chars[0]) && ('1'..='8').contains(&chars[1]) {
                Some(Square::new(rank_from_char(chars[1]), file_from_char(chars[0])))
            } else {
                return Err(FenError::InvalidEnPassant { found: parts[3].to_string() });
            }
        };

        if parts.len() >= 5 {
            pos.halfmove_clock = parts[4].parse().unwrap_or(0);
        }
        if parts.len() >= 6 {
            let fullmove: u32 = parts[5].parse().unwrap_or(1);
            pos.ply = fullmove.saturating_sub(1) * 2 + u32::from(pos.side_to_move == Color::Black);
        }

        pos.hash = pos.compute_hash_from_scratch();
        pos.repetitions.set(pos.hash, 1);
        pos.nnue.reset(&pos);
        pos.recompute_checkers_and_pins();
        Ok(pos)
    }

    /// Parse a position from FEN notation.
    ///
    /// # Panics
    /// Panics if the FEN string is invalid. Use [`Self::try_from_fen`] for
    /// fallible parsing.
    #[must_use]
    pub fn from_fen(fen: &str) -> Self {
        Self::try_from_fen(fen).expect("invalid FEN string")
    }

    /// Render the position as a FEN string.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows = Vec::with_capacity(8);
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8 {
                let sq = Square::new(rank, file);
                if let Some((color, piece)) = self.piece_at(sq) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.to_fen_char(color));
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let active = if self.side_to_move == Color::White { "w" } else { "b" };
        let mut castling = String::new();
        if self.castling.has(Color::White, true) {
            castling.push('K');
        }
        if self.castling.has(Color::White, false) {
            castling.push('Q');
        }
        if self.castling.has(Color::Black, true) {
            castling.push('k');
        }
        if self.castling.has(Color::Black, false) {
            castling.push('q');
        }
        if castling.is_empty() {
            castling.push('-');
        }
        let ep = self.en_passant.map_or_else(|| "-".to_string(), |sq| sq.to_string());
        let fullmove = self.ply / 2 + 1;

        format!("{} {} {} {} {} {}", rows.join("/"), active, castling, ep, self.halfmove_clock, fullmove)
    }

    /// Parse a move in UCI long algebraic notation (e.g. `e2e4`, `e7e8q`)
    /// against this position's legal moves.
    pub fn parse_move(&self, uci: &str) -> Result<Move, MoveParseError> {
        if uci.len() < 4 || uci.len() > 5 {
            return Err(MoveParseError::InvalidLength { len: uci.len() });
        }
        let chars: Vec<char> = uci.chars().collect();
        if !('a'..='h').contains(&chars[0])
            || !('1'..='8').contains(&chars[1])
            || !('a'..='h').contains(&chars[2])
            || !('1'..='8').contains(&chars[3])
        {
            return Err(MoveParseError::InvalidSquare { notation: uci.to_string() });
        }
        let from = Square::new(rank_from_char(chars[1]), file_from_char(chars[0]));
        let to = Square::new(rank_from_char(chars[3]), file_from_char(chars[2]));

        let promotion = if uci.len() == 5 {
            let piece = Piece::from_char(chars[4]).ok_or(MoveParseError::InvalidPromotion { char: chars[4] })?;
            if matches!(piece, Piece::Pawn | Piece::King) {
                return Err(MoveParseError::InvalidPromotion { char: chars[4] });
            }
            Some(piece)
        } else {
            None
        };

        let legal_moves = self.generate_legal_moves();
        for legal_move in &legal_moves {
            if legal_move.from() == from && legal_move.to() == to && legal_move.promotion() == promotion {
                return Ok(*legal_move);
            }
        }
        Err(MoveParseError::IllegalMove { notation: uci.to_string() })
    }

    /// Parse and make a UCI long-algebraic move in one call.
    pub fn make_move_uci(&mut self, uci: &str) -> Result<Move, MoveParseError> {
        let m = self.parse_move(uci)?;
        self.make_move(m);
        Ok(m)
    }
}

fn rank_from_char(c: char) -> usize {
    (c as u8 - b'1') as usize
}

fn file_from_char(c: char) -> usize {
    (c as u8 - b'a') as usize
}

impl FromStr for BitPosition {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BitPosition::try_from_fen(s)
    }
}

impl BitPosition {
    fn compute_hash_from_scratch(&self) -> u64 {
        let mut hash = 0u64;
        for color in [Color::White, Color::Black] {
            for piece in [Piece::Pawn, Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King] {
                for sq in self.pieces[color.index()][piece.index()].iter() {
                    hash ^= crate::board::zobrist::piece_square_key(color, piece, sq);
                }
            }
        }
        if self.side_to_move == Color::Black {
            hash ^= crate::board::zobrist::side_to_move_key();
        }
        hash ^= crate::board::zobrist::castling_key(self.castling);
        if let Some(ep) = self.en_passant {
            hash ^= crate::board::zobrist::en_passant_key(ep.file());
        }
        hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_round_trips_through_fen() {
        let pos = BitPosition::new();
        let fen = pos.to_fen();
        let reparsed = BitPosition::from_fen(&fen);
        assert_eq!(pos.hash(), reparsed.hash());
        assert_eq!(reparsed.to_fen(), fen);
    }

    #[test]
    fn kiwipete_fen_parses_with_expected_side_to_move_and_castling() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let pos = BitPosition::from_fen(fen);
        assert_eq!(pos.side_to_move(), Color::White);
        assert!(pos.castling_rights().has(Color::White, true));
        assert!(pos.castling_rights().has(Color::Black, false));
    }

    #[test]
    fn parse_move_resolves_promotion_suffix() {
        let pos = BitPosition::from_fen("8/P6k/8/8/8/8/7K/8 w - - 0 1");
        let m = pos.parse_move("a7a8q").expect("promotion move should be legal");
        assert_eq!(m.promotion(), Some(Piece::Queen));
    }

    #[test]
    fn make_move_uci_rejects_illegal_move() {
        let mut pos = BitPosition::new();
        assert!(pos.make_move_uci("e2e5").is_err());
    }
}
