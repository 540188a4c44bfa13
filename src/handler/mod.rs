pub mod age_handler;
