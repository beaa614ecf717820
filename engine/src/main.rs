use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tracing::info;

use shared::constants::DEFAULT_BALANCE;
use shared::shared_wheel_game::{SpinAnimation, SpinResult, DEFAULT_SEGMENTS};

use crate::error::Error;
use crate::games::engine_wheel_game::SpinSession;
use crate::renderer::{SpinCues, SpinRenderer};
use crate::services::balance_service::BalanceLedger;
use crate::storage::FileStorage;

mod error;
mod games;
mod logging;
mod renderer;
mod services;
mod storage;

/// Console stand-in for the animation layer: reports the tween it was asked
/// for, waits it out, then signals completion.
struct ConsoleRenderer;

#[async_trait]
impl SpinRenderer for ConsoleRenderer {
    async fn animate(&self, animation: SpinAnimation) -> Result<(), Error> {
        println!(
            "Spinning to {:.1}° over {:.1}s...",
            animation.target_rotation,
            f64::from(animation.duration_ms) / 1000.0
        );
        tokio::time::sleep(Duration::from_millis(u64::from(animation.duration_ms))).await;
        Ok(())
    }
}

struct ConsoleCues;

impl SpinCues for ConsoleCues {
    fn spin_landed(&self, result: &SpinResult) {
        println!(
            "*** The wheel stops on segment {}: you win {}! ***",
            result.winning_index, result.amount
        );
    }

    fn balance_updated(&self, new_balance: f64, last_win: f64) {
        println!("BALANCE: {}    WIN: {}", new_balance, last_win);
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    logging::setup();

    let save_path =
        std::env::var("WHEEL_SAVE_PATH").unwrap_or_else(|_| "wheel-save.json".to_string());
    let storage = FileStorage::open(save_path);
    let ledger = Arc::new(Mutex::new(BalanceLedger::new(
        Box::new(storage),
        DEFAULT_BALANCE,
    )));

    let session = SpinSession::new(
        DEFAULT_SEGMENTS.to_vec(),
        ledger.clone(),
        Box::new(ConsoleRenderer),
    )?
    .with_cues(Box::new(ConsoleCues));

    info!("Wheel ready with {} segments", session.segments().len());
    println!("BALANCE: {}", ledger.lock().await.get());
    println!("Press enter to spin, q to quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().eq_ignore_ascii_case("q") {
            break;
        }
        if session.request_spin().await?.is_none() {
            println!("Already spinning...");
            continue;
        }
        println!("Press enter to spin, q to quit.");
    }

    Ok(())
}
