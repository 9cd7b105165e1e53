//! Domain layer: pure chess bookkeeping types and helpers.

pub mod instructions;
pub mod moves;
pub mod state;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod tests_instructions;
#[cfg(test)]
mod tests_moves;
#[cfg(test)]
mod tests_props_state;
#[cfg(test)]
mod tests_state;

// Re-exports for ergonomics
pub use instructions::{derive_instruction, InstructionAction, PhysicalInstruction};
pub use moves::{
    CastleSide, GameStatus, Move, MoveKind, MoveMeta, PromotionPiece, RookHop, Side, SpecialMove,
    Square, STARTING_POSITION,
};
pub use state::{
    ConfirmOutcome, Confirmation, GameSnapshot, GameState, HistoryEntry, PendingMove,
};
