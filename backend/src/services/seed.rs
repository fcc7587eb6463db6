use serde::Deserialize;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::models::resolve_progress;
use crate::services::achievements::{self, AchievementError};
use shared::Achievement;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Seed file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Achievement(#[from] AchievementError),
}

/// Seed files are either a bare array or a mock-server style db file.
#[derive(Deserialize)]
#[serde(untagged)]
enum SeedDocument {
    List(Vec<Achievement>),
    Database { achievements: Vec<Achievement> },
}

pub fn parse_seed(json: &str) -> Result<Vec<Achievement>, serde_json::Error> {
    let mut achievements = match serde_json::from_str(json)? {
        SeedDocument::List(list) => list,
        SeedDocument::Database { achievements } => achievements,
    };

    for achievement in &mut achievements {
        achievement.progress = Some(resolve_progress(achievement.progress, achievement.todos()));
        achievement.updated_at = achievement.updated_at.max(achievement.created_at);
    }

    Ok(achievements)
}

/// Inserts the seed records, but only into an empty table. Returns how many
/// were inserted.
pub async fn seed_if_empty(
    pool: &SqlitePool,
    achievements: &[Achievement],
) -> Result<usize, SeedError> {
    let existing = achievements::count_achievements(pool).await?;
    if existing > 0 {
        log::info!("Skipping seed, {} achievements already stored", existing);
        return Ok(0);
    }

    for achievement in achievements {
        achievements::insert_achievement(pool, achievement).await?;
    }

    Ok(achievements.len())
}

pub async fn seed_from_file(pool: &SqlitePool, path: &str) -> Result<usize, SeedError> {
    let json = std::fs::read_to_string(path)?;
    let achievements = parse_seed(&json)?;
    seed_if_empty(pool, &achievements).await
}
