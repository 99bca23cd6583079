//! Animator seam between the session and whatever draws the board
//!
//! The session hands over one batch of [`BoardEvent`]s at a time, after the
//! board already reflects them, and waits for the returned future before it
//! touches the board again. Cells holding a moving tile are flagged busy in
//! the snapshot for the duration of the batch.

use std::future::Future;

use tui_match3_core::{BoardEvent, GameSnapshot};

pub trait Animator {
    /// Animate one batch; resolves when the animation is finished
    fn play(
        &mut self,
        batch: &[BoardEvent],
        snapshot: &GameSnapshot,
    ) -> impl Future<Output = anyhow::Result<()>>;

    /// Show a state change that has nothing to animate (cursor, timer, hint)
    fn present(&mut self, snapshot: &GameSnapshot) -> anyhow::Result<()>;
}

/// Completes every animation at once
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAnimator;

impl Animator for NullAnimator {
    fn play(
        &mut self,
        _batch: &[BoardEvent],
        _snapshot: &GameSnapshot,
    ) -> impl Future<Output = anyhow::Result<()>> {
        std::future::ready(Ok(()))
    }

    fn present(&mut self, _snapshot: &GameSnapshot) -> anyhow::Result<()> {
        Ok(())
    }
}
