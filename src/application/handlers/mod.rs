pub mod ledger_handler;
