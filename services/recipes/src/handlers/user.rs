use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use foodgram_auth_types::identity::IdentityHeaders;
use foodgram_domain::pagination::{Page, PageRequest};

use crate::domain::types::UserProfile;
use crate::error::RecipesServiceError;
use crate::handlers::representation::UserResponse;
use crate::state::AppState;
use crate::usecase::user::{
    CreateProfileInput, CreateProfileUseCase, GetProfileUseCase, ListProfilesUseCase,
};

// ── POST /api/users ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateProfileRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

pub async fn create_profile(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<UserResponse>), RecipesServiceError> {
    let usecase = CreateProfileUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(
            identity.user_id,
            identity.user_role,
            CreateProfileInput {
                email: body.email,
                username: body.username,
                first_name: body.first_name,
                last_name: body.last_name,
            },
        )
        .await?;
    let profile = UserProfile {
        user,
        is_subscribed: false,
    };
    Ok((StatusCode::CREATED, Json(profile.into())))
}

// ── GET /api/users ───────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct ProfileListQuery {
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

pub async fn list_profiles(
    identity: Option<IdentityHeaders>,
    State(state): State<AppState>,
    Query(query): Query<ProfileListQuery>,
) -> Result<Json<Page<UserResponse>>, RecipesServiceError> {
    let usecase = ListProfilesUseCase {
        users: state.user_repo(),
        follows: state.follow_repo(),
    };
    let page = usecase
        .execute(
            PageRequest::from_query(query.limit, query.page),
            identity.map(|i| i.user_id),
        )
        .await?;
    Ok(Json(page.map(UserResponse::from)))
}

// ── GET /api/users/me ────────────────────────────────────────────────────────

pub async fn get_me(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, RecipesServiceError> {
    let usecase = GetProfileUseCase {
        users: state.user_repo(),
        follows: state.follow_repo(),
    };
    let profile = usecase
        .execute(identity.user_id, Some(identity.user_id))
        .await?;
    Ok(Json(profile.into()))
}

// ── GET /api/users/{id} ──────────────────────────────────────────────────────

pub async fn get_profile(
    identity: Option<IdentityHeaders>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, RecipesServiceError> {
    let usecase = GetProfileUseCase {
        users: state.user_repo(),
        follows: state.follow_repo(),
    };
    let profile = usecase.execute(id, identity.map(|i| i.user_id)).await?;
    Ok(Json(profile.into()))
}
