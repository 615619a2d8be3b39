//! Position notation.
//!
//! A compact single-line encoding of a full position, in the spirit of
//! chess FEN.
//!
//! Format: `<turn>/<ambers one>:<ambers two>/<pieces>`
//!
//! `<pieces>` is `-` for an empty board or a comma-separated list of
//! `<team><kind><x><y>[*<height>]` entries, e.g. `0C03`, `1S74*2`. The team
//! is its index digit, the kind one of `C G S L`. Moves are written
//! `<x><y>-<x><y>`.

use crate::board::{Board, Move, Piece, PieceKind, Square, Team, BOARD_SIZE};
use crate::rules::Position;

/// Errors that can occur while parsing notation.
#[derive(Debug, thiserror::Error)]
pub enum NotationError {
    #[error("expected 3 sections separated by '/', got {0}")]
    WrongSectionCount(usize),

    #[error("invalid turn number: '{0}'")]
    InvalidTurn(String),

    #[error("invalid amber counts: '{0}'")]
    InvalidAmbers(String),

    #[error("invalid team character: '{0}'")]
    InvalidTeam(char),

    #[error("invalid piece kind character: '{0}'")]
    InvalidKind(char),

    #[error("invalid coordinate: '{0}'")]
    InvalidCoordinate(String),

    #[error("invalid stack height in entry: '{0}'")]
    InvalidHeight(String),

    #[error("invalid piece entry: '{0}'")]
    InvalidPieceEntry(String),

    #[error("duplicate piece at square '{0}'")]
    DuplicatePiece(String),

    #[error("invalid move: '{0}'")]
    InvalidMove(String),
}

/// Parses a two-digit square like `"47"` (column 4, row 7).
pub fn parse_square(s: &str) -> Result<Square, NotationError> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return Err(NotationError::InvalidCoordinate(s.to_string()));
    }
    let digit = |b: u8| -> Option<u8> {
        let d = b.checked_sub(b'0')?;
        (d < BOARD_SIZE).then_some(d)
    };
    match (digit(bytes[0]), digit(bytes[1])) {
        (Some(x), Some(y)) => Ok(Square::new(x, y)),
        _ => Err(NotationError::InvalidCoordinate(s.to_string())),
    }
}

/// Parses a move like `"03-14"`.
pub fn parse_move(s: &str) -> Result<Move, NotationError> {
    let (from, to) = s
        .trim()
        .split_once('-')
        .ok_or_else(|| NotationError::InvalidMove(s.to_string()))?;
    let from = parse_square(from).map_err(|_| NotationError::InvalidMove(s.to_string()))?;
    let to = parse_square(to).map_err(|_| NotationError::InvalidMove(s.to_string()))?;
    Ok(Move::new(from, to))
}

/// Parses a single piece entry like `"1S74*2"`.
fn parse_piece_entry(entry: &str) -> Result<(Square, Piece), NotationError> {
    let (body, height) = match entry.split_once('*') {
        Some((body, h)) => {
            let count: u8 = h
                .parse()
                .map_err(|_| NotationError::InvalidHeight(entry.to_string()))?;
            if count == 0 {
                return Err(NotationError::InvalidHeight(entry.to_string()));
            }
            (body, count)
        }
        None => (entry, 1),
    };

    if body.len() != 4 || !body.is_ascii() {
        return Err(NotationError::InvalidPieceEntry(entry.to_string()));
    }

    let mut chars = body.chars();
    let team_char = chars.next().unwrap_or_default();
    let kind_char = chars.next().unwrap_or_default();

    let team = team_char
        .to_digit(10)
        .and_then(|d| Team::from_index(d as usize))
        .ok_or(NotationError::InvalidTeam(team_char))?;
    let kind = PieceKind::from_notation_char(kind_char).ok_or(NotationError::InvalidKind(kind_char))?;
    let square = parse_square(&body[2..])?;

    Ok((square, Piece::tower(kind, team, height)))
}

/// Parses the piece section (comma-separated entries or "-") into a board.
pub fn parse_pieces(s: &str) -> Result<Board, NotationError> {
    let mut board = Board::empty();
    if s == "-" || s.is_empty() {
        return Ok(board);
    }
    for entry in s.split(',') {
        let (square, piece) = parse_piece_entry(entry.trim())?;
        if !board.place(square, piece) {
            return Err(NotationError::DuplicatePiece(square.to_string()));
        }
    }
    Ok(board)
}

/// Parses a full position string.
pub fn parse_position(s: &str) -> Result<Position, NotationError> {
    let sections: Vec<&str> = s.trim().split('/').collect();
    if sections.len() != 3 {
        return Err(NotationError::WrongSectionCount(sections.len()));
    }

    let turn: u32 = sections[0]
        .parse()
        .map_err(|_| NotationError::InvalidTurn(sections[0].to_string()))?;

    let (one, two) = sections[1]
        .split_once(':')
        .ok_or_else(|| NotationError::InvalidAmbers(sections[1].to_string()))?;
    let parse_amber = |a: &str| {
        a.parse::<u8>()
            .map_err(|_| NotationError::InvalidAmbers(sections[1].to_string()))
    };
    let ambers = [parse_amber(one)?, parse_amber(two)?];

    let board = parse_pieces(sections[2])?;

    Ok(Position {
        board,
        turn,
        ambers,
    })
}

/// Encodes the pieces of a board, in square order.
pub fn encode_pieces(board: &Board) -> String {
    let entries: Vec<String> = board
        .pieces()
        .map(|(sq, p)| {
            let mut entry = format!("{}{}{}", p.team.index(), p.kind.notation_char(), sq);
            if p.count > 1 {
                entry.push_str(&format!("*{}", p.count));
            }
            entry
        })
        .collect();
    if entries.is_empty() {
        "-".to_string()
    } else {
        entries.join(",")
    }
}

/// Encodes a full position.
pub fn encode_position(pos: &Position) -> String {
    format!(
        "{}/{}:{}/{}",
        pos.turn,
        pos.ambers[0],
        pos.ambers[1],
        encode_pieces(&pos.board)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIDGAME: &str = "14/1:0/0C21,0L30,0S33*2,1G43,1C56,1L77";

    #[test]
    fn parse_midgame_position() {
        let pos = parse_position(MIDGAME).unwrap();
        assert_eq!(pos.turn, 14);
        assert_eq!(pos.ambers, [1, 0]);
        assert_eq!(
            pos.board.get(Square::new(3, 3)),
            Some(Piece::tower(PieceKind::Starfish, Team::One, 2))
        );
        assert_eq!(
            pos.board.get(Square::new(7, 7)),
            Some(Piece::new(PieceKind::Seal, Team::Two))
        );
        assert_eq!(pos.board.pieces().count(), 6);
    }

    #[test]
    fn encode_matches_parse() {
        let pos = parse_position(MIDGAME).unwrap();
        let encoded = encode_position(&pos);
        assert_eq!(parse_position(&encoded).unwrap(), pos);
    }

    #[test]
    fn empty_board_encodes_as_dash() {
        let pos = parse_position("0/0:0/-").unwrap();
        assert_eq!(pos.board.pieces().count(), 0);
        assert_eq!(encode_position(&pos), "0/0:0/-");
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(
            parse_position("garbage"),
            Err(NotationError::WrongSectionCount(1))
        ));
        assert!(matches!(
            parse_position("x/0:0/-"),
            Err(NotationError::InvalidTurn(_))
        ));
        assert!(matches!(
            parse_position("0/00/-"),
            Err(NotationError::InvalidAmbers(_))
        ));
        assert!(matches!(
            parse_pieces("2G00"),
            Err(NotationError::InvalidTeam('2'))
        ));
        assert!(matches!(
            parse_pieces("0Q00"),
            Err(NotationError::InvalidKind('Q'))
        ));
        assert!(matches!(
            parse_pieces("0G08"),
            Err(NotationError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            parse_pieces("0G00*0"),
            Err(NotationError::InvalidHeight(_))
        ));
        assert!(matches!(
            parse_pieces("0G00,1G00"),
            Err(NotationError::DuplicatePiece(_))
        ));
        assert!(matches!(
            parse_pieces("0G0"),
            Err(NotationError::InvalidPieceEntry(_))
        ));
    }

    #[test]
    fn parse_move_notation() {
        let mv = parse_move("03-14").unwrap();
        assert_eq!(mv, Move::new(Square::new(0, 3), Square::new(1, 4)));
        assert_eq!(mv.to_string(), "03-14");
        assert!(parse_move("0314").is_err());
        assert!(parse_move("03-94").is_err());
    }
}
