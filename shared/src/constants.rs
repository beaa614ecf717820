pub const BALANCE_STORAGE_KEY: &str = "player_balance";
pub const DEFAULT_BALANCE: f64 = 1000.0;
