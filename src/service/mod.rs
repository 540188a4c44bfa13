pub mod age_service;
