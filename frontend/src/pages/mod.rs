pub mod achievements;
pub mod not_found;
