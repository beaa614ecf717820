use async_trait::async_trait;

use shared::shared_wheel_game::{SpinAnimation, SpinResult};

use crate::error::Error;

/// The animation layer the session delegates the visible spin to. The core
/// never depends on how the tween runs, only on the contract that `animate`
/// resolves exactly once per spin request.
#[async_trait]
pub trait SpinRenderer: Send + Sync {
    async fn animate(&self, animation: SpinAnimation) -> Result<(), Error>;
}

/// Fire-and-forget presentation hooks fired around a spin: audio stings, the
/// win popup, balance widgets. None of them participate in the correctness of
/// the spin itself.
pub trait SpinCues: Send + Sync {
    fn spin_started(&self) {}
    fn spin_landed(&self, _result: &SpinResult) {}
    fn balance_updated(&self, _new_balance: f64, _last_win: f64) {}
}

/// Default cues for hosts with nothing to show.
pub struct NoCues;

impl SpinCues for NoCues {}
