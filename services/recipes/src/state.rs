use std::path::PathBuf;

use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbFollowRepository, DbIngredientRepository, DbRecipeRelationRepository, DbRecipeRepository,
    DbTagRepository, DbUserRepository,
};
use crate::infra::image_store::FsImageStore;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub media_root: PathBuf,
    /// Public prefix stored image paths are appended to, e.g. `/media/`.
    pub media_url: String,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn ingredient_repo(&self) -> DbIngredientRepository {
        DbIngredientRepository {
            db: self.db.clone(),
        }
    }

    pub fn tag_repo(&self) -> DbTagRepository {
        DbTagRepository {
            db: self.db.clone(),
        }
    }

    pub fn recipe_repo(&self) -> DbRecipeRepository {
        DbRecipeRepository {
            db: self.db.clone(),
        }
    }

    pub fn relation_repo(&self) -> DbRecipeRelationRepository {
        DbRecipeRelationRepository {
            db: self.db.clone(),
        }
    }

    pub fn follow_repo(&self) -> DbFollowRepository {
        DbFollowRepository {
            db: self.db.clone(),
        }
    }

    pub fn image_store(&self) -> FsImageStore {
        FsImageStore {
            root: self.media_root.clone(),
        }
    }

    /// Public URL of a stored image path.
    pub fn image_url(&self, path: &str) -> String {
        format!("{}/{}", self.media_url.trim_end_matches('/'), path)
    }
}
