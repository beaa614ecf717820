pub mod engine_wheel_game;
