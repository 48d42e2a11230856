use std::collections::HashSet;

use chrono::Utc;
use uuid::Uuid;

use foodgram_domain::pagination::{Page, PageRequest};

use crate::domain::repository::{FollowRepository, UserRepository};
use crate::domain::types::{User, UserProfile, validate_email, validate_username};
use crate::error::RecipesServiceError;

const MAX_PERSONAL_NAME_LEN: usize = 150;

// ── CreateProfile ────────────────────────────────────────────────────────────

pub struct CreateProfileInput {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

pub struct CreateProfileUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> CreateProfileUseCase<R> {
    /// The profile id is the identity-provider id of the caller.
    pub async fn execute(
        &self,
        user_id: Uuid,
        role: u8,
        input: CreateProfileInput,
    ) -> Result<User, RecipesServiceError> {
        let email = input.email.trim().to_lowercase();
        let username = input.username.trim().to_owned();
        if !validate_username(&username) || !validate_email(&email) {
            return Err(RecipesServiceError::InvalidProfile);
        }
        let names_valid = [&input.first_name, &input.last_name]
            .iter()
            .all(|n| !n.trim().is_empty() && n.chars().count() <= MAX_PERSONAL_NAME_LEN);
        if !names_valid {
            return Err(RecipesServiceError::InvalidProfile);
        }
        let user = User {
            id: user_id,
            email,
            username,
            first_name: input.first_name.trim().to_owned(),
            last_name: input.last_name.trim().to_owned(),
            role,
            created_at: Utc::now(),
        };
        self.repo.create(&user).await?;
        tracing::info!(%user_id, username = %user.username, "profile created");
        Ok(user)
    }
}

// ── GetProfile ───────────────────────────────────────────────────────────────

pub struct GetProfileUseCase<U: UserRepository, F: FollowRepository> {
    pub users: U,
    pub follows: F,
}

impl<U: UserRepository, F: FollowRepository> GetProfileUseCase<U, F> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<UserProfile, RecipesServiceError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(RecipesServiceError::UserNotFound)?;
        let is_subscribed = match viewer {
            Some(viewer) if viewer != user.id => self
                .follows
                .following_among(viewer, &[user.id])
                .await?
                .contains(&user.id),
            _ => false,
        };
        Ok(UserProfile {
            user,
            is_subscribed,
        })
    }
}

// ── ListProfiles ─────────────────────────────────────────────────────────────

pub struct ListProfilesUseCase<U: UserRepository, F: FollowRepository> {
    pub users: U,
    pub follows: F,
}

impl<U: UserRepository, F: FollowRepository> ListProfilesUseCase<U, F> {
    pub async fn execute(
        &self,
        page: PageRequest,
        viewer: Option<Uuid>,
    ) -> Result<Page<UserProfile>, RecipesServiceError> {
        let users = self.users.list(page).await?;
        let followed = match viewer {
            Some(viewer) => {
                let ids: Vec<Uuid> = users.results.iter().map(|u| u.id).collect();
                self.follows.following_among(viewer, &ids).await?
            }
            None => HashSet::new(),
        };
        Ok(users.map(|user| UserProfile {
            is_subscribed: followed.contains(&user.id),
            user,
        }))
    }
}
