use shared::constants::{BALANCE_STORAGE_KEY, DEFAULT_BALANCE};

use crate::storage::Storage;

/// Running player balance plus the most recent adjustment, persisted through
/// the storage collaborator on every balance mutation.
///
/// The in-memory value is authoritative for the running process: a failed
/// write is logged and the game keeps going.
pub struct BalanceLedger {
    storage: Box<dyn Storage>,
    current_balance: f64,
    last_win: f64,
}

impl BalanceLedger {
    /// Loads the persisted balance, falling back to `initial_balance` on a
    /// fresh store. `last_win` always starts at zero; it is deliberately not
    /// persisted across runs.
    pub fn new(storage: Box<dyn Storage>, initial_balance: f64) -> Self {
        let current_balance = storage
            .get_number(BALANCE_STORAGE_KEY)
            .unwrap_or(initial_balance);
        Self {
            storage,
            current_balance,
            last_win: 0.0,
        }
    }

    /// Get the current balance
    pub fn get(&self) -> f64 {
        self.current_balance
    }

    pub fn last_win(&self) -> f64 {
        self.last_win
    }

    /// Add to the current balance (negative amounts debit) and record the
    /// amount as the last win. Returns the new balance.
    pub fn add(&mut self, amount: f64) -> f64 {
        self.current_balance += amount;
        self.last_win = amount;
        self.save();
        self.current_balance
    }

    /// Set the balance to a specific amount. Leaves `last_win` untouched.
    pub fn set(&mut self, amount: f64) {
        self.current_balance = amount;
        self.save();
    }

    /// Reset balance to the default value (1000)
    pub fn reset(&mut self) {
        self.set(DEFAULT_BALANCE);
    }

    fn save(&mut self) {
        if let Err(err) = self
            .storage
            .set_number(BALANCE_STORAGE_KEY, self.current_balance)
        {
            tracing::warn!(
                "Failed to persist balance, keeping in-memory value: {}",
                err
            );
        }
    }
}
