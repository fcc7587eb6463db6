pub mod achievements;
pub mod list_params;
pub mod seed;
