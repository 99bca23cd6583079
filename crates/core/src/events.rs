//! Board events - what changed, in the order it changed
//!
//! The board records an event for every visible state transition. Render and
//! audio collaborators drain them in batches; the grid is already in its final
//! state for the batch when they see it.

use arrayvec::ArrayVec;

use crate::tile::TileId;
use crate::types::{Pos, PowerUp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEvent {
    /// A tile came out of the supply and was placed
    Spawned { tile: TileId, pos: Pos, color: u8 },
    /// A tile fell during collapse
    Moved { tile: TileId, from: Pos, to: Pos },
    /// Two cells exchanged contents (a swap or its rollback)
    Swapped { a: Pos, b: Pos },
    Destroyed { tile: TileId, pos: Pos },
    Upgraded { tile: TileId, pos: Pos, power: PowerUp },
    /// A power-up went off at `pos`
    Activated { tile: TileId, pos: Pos, power: PowerUp },
    Scored { points: u64, multiplier: u32 },
}

/// Sound an audio collaborator plays for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Land,
    Swap,
    Resolve,
    Upgrade,
    PowerUp,
    Score,
}

impl BoardEvent {
    pub fn sound_cue(&self) -> Option<SoundCue> {
        match self {
            BoardEvent::Spawned { .. } => None,
            BoardEvent::Moved { .. } => Some(SoundCue::Land),
            BoardEvent::Swapped { .. } => Some(SoundCue::Swap),
            BoardEvent::Destroyed { .. } => Some(SoundCue::Resolve),
            BoardEvent::Upgraded { .. } => Some(SoundCue::Upgrade),
            BoardEvent::Activated { .. } => Some(SoundCue::PowerUp),
            BoardEvent::Scored { .. } => Some(SoundCue::Score),
        }
    }

    /// Cells that hold a tile in motion once the event has been applied
    pub fn animated_cells(&self) -> ArrayVec<Pos, 2> {
        let mut cells = ArrayVec::new();
        match *self {
            BoardEvent::Spawned { pos, .. } | BoardEvent::Upgraded { pos, .. } => cells.push(pos),
            BoardEvent::Moved { to, .. } => cells.push(to),
            BoardEvent::Swapped { a, b } => {
                cells.push(a);
                cells.push(b);
            }
            BoardEvent::Destroyed { .. }
            | BoardEvent::Activated { .. }
            | BoardEvent::Scored { .. } => {}
        }
        cells
    }
}

/// Distinct sound cues of a batch, in first-seen order
pub fn batch_cues(batch: &[BoardEvent]) -> ArrayVec<SoundCue, 6> {
    let mut cues = ArrayVec::new();
    for cue in batch.iter().filter_map(BoardEvent::sound_cue) {
        if !cues.contains(&cue) {
            cues.push(cue);
        }
    }
    cues
}
