use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Mutex;

use shared::shared_wheel_game::{
    select_weighted, target_rotation, validate_segments, Easing, Segment, SpinAnimation,
    SpinResult, WheelGame, MIN_SPINS, SPIN_DURATION_MS,
};

use crate::error::Error;
use crate::renderer::{NoCues, SpinCues, SpinRenderer};
use crate::services::balance_service::BalanceLedger;

struct SessionInner {
    game: WheelGame,
    rotation: f64,
    rng: StdRng,
}

/// Coordinates one wheel: accepts spin requests, draws the outcome, hands the
/// tween to the renderer and settles the prize into the ledger. At most one
/// spin is in flight at a time; duplicate requests while spinning are answered
/// with `Ok(None)` instead of queuing a second spin.
pub struct SpinSession {
    segments: Vec<Segment>,
    inner: Mutex<SessionInner>,
    ledger: Arc<Mutex<BalanceLedger>>,
    renderer: Box<dyn SpinRenderer>,
    cues: Box<dyn SpinCues>,
}

impl std::fmt::Debug for SpinSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpinSession")
            .field("segments", &self.segments)
            .finish_non_exhaustive()
    }
}

impl SpinSession {
    /// Builds a session over a validated segment table. A malformed table is
    /// rejected here, before any spin can be requested.
    pub fn new(
        segments: Vec<Segment>,
        ledger: Arc<Mutex<BalanceLedger>>,
        renderer: Box<dyn SpinRenderer>,
    ) -> Result<Self, Error> {
        validate_segments(&segments)?;
        Ok(Self {
            segments,
            inner: Mutex::new(SessionInner {
                game: WheelGame::new(),
                rotation: 0.0,
                rng: StdRng::from_entropy(),
            }),
            ledger,
            renderer,
            cues: Box::new(NoCues),
        })
    }

    pub fn with_cues(mut self, cues: Box<dyn SpinCues>) -> Self {
        self.cues = cues;
        self
    }

    /// Replaces the outcome RNG, so tests can drive the wheel
    /// deterministically.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.inner.get_mut().rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Snapshot of the state machine for display code.
    pub async fn game(&self) -> WheelGame {
        self.inner.lock().await.game.clone()
    }

    pub async fn rotation(&self) -> f64 {
        self.inner.lock().await.rotation
    }

    /// Runs one spin to completion. Returns `Ok(None)` without side effects
    /// if a spin is already in flight; otherwise resolves the winning
    /// segment, waits for the renderer to finish the tween, and credits the
    /// prize to the ledger.
    pub async fn request_spin(&self) -> Result<Option<SpinResult>, Error> {
        let (winning_index, animation) = {
            let mut inner = self.inner.lock().await;
            if inner.game.is_spinning {
                tracing::info!("Spin requested while the wheel is already spinning, ignoring");
                return Ok(None);
            }
            inner.game.start_spin();
            let winning_index = match select_weighted(&self.segments, &mut inner.rng) {
                Ok(index) => index,
                Err(err) => {
                    inner.game.abort_spin();
                    return Err(err.into());
                }
            };
            let target = target_rotation(
                inner.rotation,
                winning_index,
                self.segments.len(),
                MIN_SPINS,
            );
            (
                winning_index,
                SpinAnimation {
                    target_rotation: target,
                    duration_ms: SPIN_DURATION_MS,
                    easing: Easing::EaseOut,
                },
            )
        };

        self.cues.spin_started();

        // The only suspension point: the wheel stays in the spinning state
        // until the renderer reports the tween finished or failed.
        if let Err(err) = self.renderer.animate(animation).await {
            let mut inner = self.inner.lock().await;
            inner.game.abort_spin();
            tracing::warn!("Renderer failed mid-spin, no result produced: {}", err);
            return Err(err);
        }

        let result = SpinResult {
            winning_index,
            amount: self.segments[winning_index].amount,
        };

        {
            let mut inner = self.inner.lock().await;
            inner.rotation = animation.target_rotation;
            inner.game.complete_spin(result.clone());
        }
        self.cues.spin_landed(&result);

        let new_balance = {
            let mut ledger = self.ledger.lock().await;
            ledger.add(result.amount)
        };
        self.cues.balance_updated(new_balance, result.amount);

        tracing::info!(
            "🎡 WHEEL SPIN: landed on segment {} for {}, new balance {}",
            result.winning_index,
            result.amount,
            new_balance
        );

        Ok(Some(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use shared::constants::DEFAULT_BALANCE;
    use shared::shared_wheel_game::DEFAULT_SEGMENTS;

    use crate::storage::MemoryStorage;

    struct InstantRenderer;

    #[async_trait]
    impl SpinRenderer for InstantRenderer {
        async fn animate(&self, _animation: SpinAnimation) -> Result<(), Error> {
            Ok(())
        }
    }

    /// Renderer that parks until the test releases it, so a spin can be held
    /// in flight.
    struct GatedRenderer {
        entered: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl SpinRenderer for GatedRenderer {
        async fn animate(&self, _animation: SpinAnimation) -> Result<(), Error> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(())
        }
    }

    /// Renderer whose first tween fails and whose later tweens succeed.
    struct FlakyRenderer {
        calls: AtomicU32,
    }

    #[async_trait]
    impl SpinRenderer for FlakyRenderer {
        async fn animate(&self, _animation: SpinAnimation) -> Result<(), Error> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(Error::Renderer("tween dropped".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn test_ledger() -> Arc<Mutex<BalanceLedger>> {
        Arc::new(Mutex::new(BalanceLedger::new(
            Box::new(MemoryStorage::new()),
            DEFAULT_BALANCE,
        )))
    }

    #[tokio::test]
    async fn test_spin_credits_winning_amount() {
        let ledger = test_ledger();
        let session = SpinSession::new(
            DEFAULT_SEGMENTS.to_vec(),
            ledger.clone(),
            Box::new(InstantRenderer),
        )
        .unwrap()
        .with_rng_seed(7);

        let result = session.request_spin().await.unwrap().unwrap();
        assert!(result.winning_index < DEFAULT_SEGMENTS.len());
        assert_eq!(result.amount, DEFAULT_SEGMENTS[result.winning_index].amount);

        let ledger = ledger.lock().await;
        assert_eq!(ledger.get(), DEFAULT_BALANCE + result.amount);
        assert_eq!(ledger.last_win(), result.amount);

        let game = session.game().await;
        assert!(!game.is_spinning);
        assert_eq!(game.last_result, Some(result));
    }

    #[tokio::test]
    async fn test_spin_rotation_stops_on_winning_segment() {
        let session = SpinSession::new(
            DEFAULT_SEGMENTS.to_vec(),
            test_ledger(),
            Box::new(InstantRenderer),
        )
        .unwrap()
        .with_rng_seed(21);

        let before = session.rotation().await;
        let result = session.request_spin().await.unwrap().unwrap();
        let after = session.rotation().await;

        let segment_angle = 360.0 / DEFAULT_SEGMENTS.len() as f64;
        let center = result.winning_index as f64 * segment_angle + segment_angle / 2.0;
        assert!((after.rem_euclid(360.0) - center).abs() < 1e-9);
        assert!(after - before >= MIN_SPINS * 360.0);
    }

    #[tokio::test]
    async fn test_second_spin_request_is_rejected_while_spinning() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let session = Arc::new(
            SpinSession::new(
                DEFAULT_SEGMENTS.to_vec(),
                test_ledger(),
                Box::new(GatedRenderer {
                    entered: entered.clone(),
                    release: release.clone(),
                }),
            )
            .unwrap(),
        );

        let first = {
            let session = session.clone();
            tokio::spawn(async move { session.request_spin().await })
        };

        // Wait until the first spin is parked inside the renderer, then try
        // to spin again.
        entered.notified().await;
        let second = session.request_spin().await.unwrap();
        assert!(second.is_none());

        release.notify_one();
        let first = first.await.unwrap().unwrap();
        assert!(first.is_some());
    }

    #[tokio::test]
    async fn test_renderer_failure_returns_wheel_to_idle() {
        let ledger = test_ledger();
        let session = SpinSession::new(
            DEFAULT_SEGMENTS.to_vec(),
            ledger.clone(),
            Box::new(FlakyRenderer {
                calls: AtomicU32::new(0),
            }),
        )
        .unwrap();

        let err = session.request_spin().await.unwrap_err();
        assert!(matches!(err, Error::Renderer(_)));
        assert!(!session.game().await.is_spinning);
        assert_eq!(ledger.lock().await.get(), DEFAULT_BALANCE);

        // The fault is recoverable: the next request spins normally.
        let result = session.request_spin().await.unwrap();
        assert!(result.is_some());
    }

    #[tokio::test]
    async fn test_empty_table_is_rejected_at_construction() {
        let err =
            SpinSession::new(Vec::new(), test_ledger(), Box::new(InstantRenderer)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
