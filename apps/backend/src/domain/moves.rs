//! Move model: squares, sides, the move-kind sum type and its wire rendering.

use std::fmt;
use std::str::FromStr;

use lazy_regex::regex_is_match;
use serde::{Deserialize, Serialize, Serializer};

use crate::errors::domain::{DomainError, ValidationKind};

/// Standard chess starting position.
pub const STARTING_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A board square in algebraic form (`a1` through `h8`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square(String);

impl Square {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized = raw.trim().to_ascii_lowercase();
        if regex_is_match!(r"^[a-h][1-8]$", &normalized) {
            Ok(Self(normalized))
        } else {
            Err(DomainError::validation(
                ValidationKind::InvalidSquare,
                format!("`{raw}` is not a board square"),
            ))
        }
    }

    /// Caller guarantees `file` in `a..=h` and `rank` in `1..=8`.
    pub(crate) fn from_parts(file: char, rank: char) -> Self {
        Self(format!("{file}{rank}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn file(&self) -> char {
        self.0.as_bytes()[0] as char
    }

    pub fn rank(&self) -> char {
        self.0.as_bytes()[1] as char
    }
}

impl TryFrom<String> for Square {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Square::parse(&value)
    }
}

impl From<Square> for String {
    fn from(value: Square) -> Self {
        value.0
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::White => "white",
            Side::Black => "black",
        }
    }

    /// Side to move according to the second field of a FEN string.
    pub fn from_fen(fen: &str) -> Option<Self> {
        match fen.split_whitespace().nth(1)? {
            "w" => Some(Side::White),
            "b" => Some(Side::Black),
            _ => None,
        }
    }
}

impl FromStr for Side {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" | "w" => Ok(Side::White),
            "black" | "b" => Ok(Side::Black),
            other => Err(DomainError::validation(
                ValidationKind::InvalidSide,
                format!("`{other}` is not a side"),
            )),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Playing,
    Checkmate,
    Stalemate,
    Draw,
}

impl GameStatus {
    /// Engine status strings; anything unrecognised means the game goes on.
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "checkmate" => GameStatus::Checkmate,
            "stalemate" => GameStatus::Stalemate,
            "draw" => GameStatus::Draw,
            _ => GameStatus::Playing,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Playing)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::Playing => "playing",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
            GameStatus::Draw => "draw",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromotionPiece {
    #[default]
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl PromotionPiece {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "q" | "queen" => Ok(PromotionPiece::Queen),
            "r" | "rook" => Ok(PromotionPiece::Rook),
            "b" | "bishop" => Ok(PromotionPiece::Bishop),
            "n" | "knight" => Ok(PromotionPiece::Knight),
            other => Err(DomainError::validation(
                ValidationKind::Other("promotion_piece".into()),
                format!("`{other}` is not a promotion piece"),
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PromotionPiece::Queen => "queen",
            PromotionPiece::Rook => "rook",
            PromotionPiece::Bishop => "bishop",
            PromotionPiece::Knight => "knight",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastleSide {
    Kingside,
    Queenside,
}

/// `special_move` as it travels on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialMove {
    CastlingKingside,
    CastlingQueenside,
    Promotion,
    PromotionCapture,
    #[serde(other)]
    Other,
}

/// The rook's half of a castling move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RookHop {
    pub from: Square,
    pub to: Square,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveKind {
    Plain,
    Capture {
        captured: String,
    },
    Castling {
        side: CastleSide,
        rook: Option<RookHop>,
    },
    Promotion {
        piece: PromotionPiece,
    },
    PromotionCapture {
        piece: PromotionPiece,
        captured: String,
    },
}

impl MoveKind {
    /// Classify loose wire metadata into a move kind.
    pub fn classify(
        special: Option<SpecialMove>,
        promotion: Option<PromotionPiece>,
        captured: Option<String>,
        rook: Option<RookHop>,
    ) -> Self {
        match special {
            Some(SpecialMove::CastlingKingside) => MoveKind::Castling {
                side: CastleSide::Kingside,
                rook,
            },
            Some(SpecialMove::CastlingQueenside) => MoveKind::Castling {
                side: CastleSide::Queenside,
                rook,
            },
            Some(SpecialMove::Promotion) => MoveKind::Promotion {
                piece: promotion.unwrap_or_default(),
            },
            Some(SpecialMove::PromotionCapture) => MoveKind::PromotionCapture {
                piece: promotion.unwrap_or_default(),
                captured: captured.unwrap_or_else(|| "unknown".to_string()),
            },
            Some(SpecialMove::Other) | None => match captured {
                Some(captured) => MoveKind::Capture { captured },
                None => MoveKind::Plain,
            },
        }
    }

    pub fn special_move(&self) -> Option<SpecialMove> {
        match self {
            MoveKind::Plain | MoveKind::Capture { .. } => None,
            MoveKind::Castling {
                side: CastleSide::Kingside,
                ..
            } => Some(SpecialMove::CastlingKingside),
            MoveKind::Castling {
                side: CastleSide::Queenside,
                ..
            } => Some(SpecialMove::CastlingQueenside),
            MoveKind::Promotion { .. } => Some(SpecialMove::Promotion),
            MoveKind::PromotionCapture { .. } => Some(SpecialMove::PromotionCapture),
        }
    }

    pub fn promotion_piece(&self) -> Option<PromotionPiece> {
        match self {
            MoveKind::Promotion { piece } | MoveKind::PromotionCapture { piece, .. } => {
                Some(*piece)
            }
            _ => None,
        }
    }

    pub fn captured_piece(&self) -> Option<&str> {
        match self {
            MoveKind::Capture { captured } | MoveKind::PromotionCapture { captured, .. } => {
                Some(captured)
            }
            _ => None,
        }
    }

    pub fn rook_hop(&self) -> Option<&RookHop> {
        match self {
            MoveKind::Castling { rook, .. } => rook.as_ref(),
            _ => None,
        }
    }

    /// Combine what the proposer said about a move with what the engine said.
    ///
    /// The proposer's classification wins unless it had none; a castling
    /// rook hop missing on the proposal is taken from the engine.
    pub fn merge(proposed: &MoveKind, confirmed: MoveKind) -> MoveKind {
        match (proposed, confirmed) {
            (MoveKind::Plain, confirmed) => confirmed,
            (
                MoveKind::Castling { side, rook: None },
                MoveKind::Castling {
                    rook: Some(rook), ..
                },
            ) => MoveKind::Castling {
                side: *side,
                rook: Some(rook),
            },
            (proposed, _) => proposed.clone(),
        }
    }
}

/// Optional annotations carried alongside a move.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MoveMeta {
    pub notation: Option<String>,
    pub gives_check: bool,
    /// Opaque list reported by the board controller (pieces available for promotion).
    pub available_pieces: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
    pub meta: MoveMeta,
}

impl Move {
    pub fn plain(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            kind: MoveKind::Plain,
            meta: MoveMeta::default(),
        }
    }

    pub fn with_kind(mut self, kind: MoveKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn same_squares(&self, from: &Square, to: &Square) -> bool {
        &self.from == from && &self.to == to
    }

    /// Fold a pending proposal into the engine's confirmed version of the move.
    pub fn folded_with(self, proposed: &Move) -> Move {
        let kind = MoveKind::merge(&proposed.kind, self.kind);
        let available_pieces = proposed
            .meta
            .available_pieces
            .clone()
            .or(self.meta.available_pieces);
        Move {
            from: self.from,
            to: self.to,
            kind,
            meta: MoveMeta {
                notation: self.meta.notation.or_else(|| proposed.meta.notation.clone()),
                gives_check: self.meta.gives_check,
                available_pieces,
            },
        }
    }
}

#[derive(Serialize)]
struct MoveWire<'a> {
    from: &'a Square,
    to: &'a Square,
    #[serde(skip_serializing_if = "Option::is_none")]
    special_move: Option<SpecialMove>,
    #[serde(skip_serializing_if = "Option::is_none")]
    promotion_piece: Option<PromotionPiece>,
    #[serde(skip_serializing_if = "Option::is_none")]
    captured_piece: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    additional_moves: Option<[&'a RookHop; 1]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notation: Option<&'a str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    gives_check: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    available_pieces: Option<&'a serde_json::Value>,
}

impl Serialize for Move {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        MoveWire {
            from: &self.from,
            to: &self.to,
            special_move: self.kind.special_move(),
            promotion_piece: self.kind.promotion_piece(),
            captured_piece: self.kind.captured_piece(),
            additional_moves: self.kind.rook_hop().map(|hop| [hop]),
            notation: self.meta.notation.as_deref(),
            gives_check: self.meta.gives_check,
            available_pieces: self.meta.available_pieces.as_ref(),
        }
        .serialize(serializer)
    }
}
