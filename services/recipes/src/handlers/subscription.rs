use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use foodgram_auth_types::identity::IdentityHeaders;
use foodgram_domain::pagination::{Page, PageRequest};

use crate::error::RecipesServiceError;
use crate::handlers::representation::SubscriptionResponse;
use crate::state::AppState;
use crate::usecase::relation::{ListSubscriptionsUseCase, SubscribeUseCase, UnsubscribeUseCase};

#[derive(Deserialize, Default)]
pub struct SubscriptionQuery {
    pub limit: Option<u32>,
    pub page: Option<u32>,
    /// Cap on the recipe preview of each author.
    pub recipes_limit: Option<u32>,
}

// ── GET /api/users/subscriptions ─────────────────────────────────────────────

pub async fn list_subscriptions(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    query: Result<Query<SubscriptionQuery>, QueryRejection>,
) -> Result<Json<Page<SubscriptionResponse>>, RecipesServiceError> {
    let Query(query) = query.map_err(|_| RecipesServiceError::MissingData)?;
    let usecase = ListSubscriptionsUseCase {
        follows: state.follow_repo(),
        recipes: state.recipe_repo(),
    };
    let page = usecase
        .execute(
            identity.user_id,
            PageRequest::from_query(query.limit, query.page),
            query.recipes_limit,
        )
        .await?;
    Ok(Json(page.map(|s| SubscriptionResponse::new(&state, s))))
}

// ── POST /api/users/{id}/subscribe ───────────────────────────────────────────

pub async fn subscribe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
    query: Result<Query<SubscriptionQuery>, QueryRejection>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), RecipesServiceError> {
    let Query(query) = query.map_err(|_| RecipesServiceError::MissingData)?;
    let usecase = SubscribeUseCase {
        users: state.user_repo(),
        follows: state.follow_repo(),
        recipes: state.recipe_repo(),
    };
    let subscription = usecase
        .execute(identity.user_id, author_id, query.recipes_limit)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SubscriptionResponse::new(&state, subscription)),
    ))
}

// ── DELETE /api/users/{id}/subscribe ─────────────────────────────────────────

pub async fn unsubscribe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
) -> Result<StatusCode, RecipesServiceError> {
    let usecase = UnsubscribeUseCase {
        users: state.user_repo(),
        follows: state.follow_repo(),
    };
    usecase.execute(identity.user_id, author_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
