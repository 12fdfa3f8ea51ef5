pub mod account_locks;
pub mod ledger_service;
