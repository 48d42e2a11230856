use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use foodgram_auth_types::identity::IdentityHeaders;

use crate::domain::types::RecipeRelation;
use crate::error::RecipesServiceError;
use crate::handlers::representation::RecipeShortResponse;
use crate::state::AppState;
use crate::usecase::relation::{AddRecipeRelationUseCase, RemoveRecipeRelationUseCase};
use crate::usecase::shopping_list::DownloadShoppingListUseCase;

async fn add_relation(
    identity: IdentityHeaders,
    state: AppState,
    relation: RecipeRelation,
    recipe_id: i32,
) -> Result<(StatusCode, Json<RecipeShortResponse>), RecipesServiceError> {
    let usecase = AddRecipeRelationUseCase {
        recipes: state.recipe_repo(),
        relations: state.relation_repo(),
    };
    let recipe = usecase
        .execute(identity.user_id, relation, recipe_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RecipeShortResponse::new(&state, recipe)),
    ))
}

async fn remove_relation(
    identity: IdentityHeaders,
    state: AppState,
    relation: RecipeRelation,
    recipe_id: i32,
) -> Result<StatusCode, RecipesServiceError> {
    let usecase = RemoveRecipeRelationUseCase {
        recipes: state.recipe_repo(),
        relations: state.relation_repo(),
    };
    usecase
        .execute(identity.user_id, relation, recipe_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST|DELETE /api/recipes/{id}/favorite ───────────────────────────────────

pub async fn add_favorite(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<RecipeShortResponse>), RecipesServiceError> {
    add_relation(identity, state, RecipeRelation::Favorite, id).await
}

pub async fn remove_favorite(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, RecipesServiceError> {
    remove_relation(identity, state, RecipeRelation::Favorite, id).await
}

// ── POST|DELETE /api/recipes/{id}/shopping_cart ──────────────────────────────

pub async fn add_to_shopping_cart(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<RecipeShortResponse>), RecipesServiceError> {
    add_relation(identity, state, RecipeRelation::ShoppingCart, id).await
}

pub async fn remove_from_shopping_cart(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, RecipesServiceError> {
    remove_relation(identity, state, RecipeRelation::ShoppingCart, id).await
}

// ── GET /api/recipes/download_shopping_cart ──────────────────────────────────

pub async fn download_shopping_cart(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, RecipesServiceError> {
    let usecase = DownloadShoppingListUseCase {
        users: state.user_repo(),
        relations: state.relation_repo(),
    };
    let file = usecase.execute(identity.user_id).await?;
    let disposition = format!("attachment; filename=\"{}\"", file.filename);
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_owned()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.body,
    ))
}
