pub mod balance_service;
