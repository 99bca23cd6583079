//! Session tests - the async driver over a real pooled game

use std::future::Future;

use tokio::sync::{mpsc, oneshot};
use tui_match3::core::{BoardEvent, EngineConfig, Game, GameSnapshot, SwapRequest, TilePool};
use tui_match3::engine::{Animator, NullAnimator, Session, SessionCommand};
use tui_match3::types::GameAction;

fn game(seed: u32) -> Game<TilePool> {
    Game::with_pool(EngineConfig::default().with_seed(seed)).unwrap()
}

/// Records whether input was enabled during each batch
#[derive(Default)]
struct Counter {
    input_enabled: Vec<bool>,
}

impl Counter {
    fn batches(&self) -> usize {
        self.input_enabled.len()
    }
}

impl Animator for Counter {
    fn play(
        &mut self,
        _batch: &[BoardEvent],
        snapshot: &GameSnapshot,
    ) -> impl Future<Output = anyhow::Result<()>> {
        self.input_enabled.push(snapshot.input_enabled);
        std::future::ready(Ok(()))
    }

    fn present(&mut self, _snapshot: &GameSnapshot) -> anyhow::Result<()> {
        Ok(())
    }
}

#[test]
fn hinted_swap_plays_in_batches() {
    tokio_test::block_on(async {
        let mut session = Session::new(game(12345), Counter::default());
        session.start().await.unwrap();
        // The opening drop is one batch of spawns.
        assert_eq!(session.animator().batches(), 1);

        session.handle(GameAction::Hint).await.unwrap();
        let (first, second) = session.game().hint().unwrap();
        let outcome = session
            .play_swap(SwapRequest { first, second })
            .await
            .unwrap();

        assert!(!outcome.is_rejected());
        // Swap, settle and at least the refill.
        let played = &session.animator().input_enabled[1..];
        assert!(played.len() >= 3);
        assert!(played.iter().all(|enabled| !enabled));

        let game = session.game();
        assert!(game.score() > 0);
        assert!(game.accepts_input());
        assert!(game.board().is_settled());
        assert_eq!(game.board().grid().occupied(), 64);
    });
}

#[test]
fn restart_through_the_session_flushes_the_new_board() {
    tokio_test::block_on(async {
        let mut session = Session::new(game(3), Counter::default());
        session.start().await.unwrap();
        let before = session.animator().batches();

        assert_eq!(session.handle(GameAction::Restart).await.unwrap(), None);
        assert_eq!(session.game().episode_id(), 1);
        assert_eq!(session.animator().batches(), before + 1);
        assert!(session.game().board().events().is_empty());
    });
}

#[tokio::test]
async fn run_applies_actions_until_quit() {
    let (tx, rx) = mpsc::channel(8);
    let (_stop, shutdown) = oneshot::channel();

    tx.send(SessionCommand::Action(GameAction::CursorLeft))
        .await
        .unwrap();
    tx.send(SessionCommand::Action(GameAction::Pause)).await.unwrap();
    tx.send(SessionCommand::Quit).await.unwrap();

    let session = Session::new(game(8), NullAnimator).run(rx, shutdown).await.unwrap();
    let game = session.game();
    assert!(game.started());
    assert!(game.paused());
    assert_eq!(game.cursor().focus().x, 3);
}

#[tokio::test]
async fn run_stops_when_the_channel_closes() {
    let (tx, rx) = mpsc::channel::<SessionCommand>(1);
    let (_stop, shutdown) = oneshot::channel();
    drop(tx);

    let session = Session::new(game(8), NullAnimator).run(rx, shutdown).await.unwrap();
    assert_eq!(session.game().score(), 0);
}
