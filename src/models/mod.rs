pub mod age_model;
