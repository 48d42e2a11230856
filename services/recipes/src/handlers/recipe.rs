use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::{Query, QueryRejection};
use serde::Deserialize;
use uuid::Uuid;

use foodgram_auth_types::identity::IdentityHeaders;
use foodgram_domain::pagination::{Page, PageRequest};

use crate::domain::types::{Actor, IngredientAmount};
use crate::error::RecipesServiceError;
use crate::handlers::representation::RecipeResponse;
use crate::state::AppState;
use crate::usecase::recipe::{
    CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeUseCase, ListRecipesInput,
    ListRecipesUseCase, RecipeInput, UpdateRecipeUseCase,
};

// ── Request types ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct IngredientAmountRequest {
    pub id: i32,
    pub amount: i32,
}

#[derive(Deserialize)]
pub struct RecipeRequest {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientAmountRequest>,
    #[serde(default)]
    pub tags: Vec<i32>,
}

impl From<RecipeRequest> for RecipeInput {
    fn from(body: RecipeRequest) -> Self {
        Self {
            name: body.name,
            text: body.text,
            cooking_time: body.cooking_time,
            image: body.image,
            ingredients: body
                .ingredients
                .into_iter()
                .map(|i| IngredientAmount {
                    ingredient_id: i.id,
                    amount: i.amount,
                })
                .collect(),
            tag_ids: body.tags,
        }
    }
}

/// `tags` may repeat: `?tags=breakfast&tags=lunch`.
#[derive(Deserialize, Default)]
pub struct RecipeListQuery {
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: Option<Uuid>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

fn flag(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "true" | "True"))
}

fn actor(identity: &IdentityHeaders) -> Actor {
    Actor {
        user_id: identity.user_id,
        is_admin: identity.is_admin(),
    }
}

// ── GET /api/recipes ─────────────────────────────────────────────────────────

pub async fn list_recipes(
    identity: Option<IdentityHeaders>,
    State(state): State<AppState>,
    query: Result<Query<RecipeListQuery>, QueryRejection>,
) -> Result<Json<Page<RecipeResponse>>, RecipesServiceError> {
    let Query(query) = query.map_err(|_| RecipesServiceError::MissingData)?;
    let usecase = ListRecipesUseCase {
        repo: state.recipe_repo(),
    };
    let input = ListRecipesInput {
        only_favorited: flag(query.is_favorited.as_deref()),
        only_in_shopping_cart: flag(query.is_in_shopping_cart.as_deref()),
        tags: query.tags,
        author: query.author,
        page: PageRequest::from_query(query.limit, query.page),
    };
    let page = usecase
        .execute(input, identity.map(|i| i.user_id))
        .await?;
    Ok(Json(page.map(|detail| RecipeResponse::new(&state, detail))))
}

// ── POST /api/recipes ────────────────────────────────────────────────────────

pub async fn create_recipe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<RecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), RecipesServiceError> {
    let usecase = CreateRecipeUseCase {
        recipes: state.recipe_repo(),
        ingredients: state.ingredient_repo(),
        tags: state.tag_repo(),
        users: state.user_repo(),
        images: state.image_store(),
    };
    let detail = usecase.execute(identity.user_id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(RecipeResponse::new(&state, detail))))
}

// ── GET /api/recipes/{id} ────────────────────────────────────────────────────

pub async fn get_recipe(
    identity: Option<IdentityHeaders>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RecipeResponse>, RecipesServiceError> {
    let usecase = GetRecipeUseCase {
        repo: state.recipe_repo(),
    };
    let detail = usecase.execute(id, identity.map(|i| i.user_id)).await?;
    Ok(Json(RecipeResponse::new(&state, detail)))
}

// ── PUT|PATCH /api/recipes/{id} ──────────────────────────────────────────────

pub async fn update_recipe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<RecipeRequest>,
) -> Result<Json<RecipeResponse>, RecipesServiceError> {
    let usecase = UpdateRecipeUseCase {
        recipes: state.recipe_repo(),
        ingredients: state.ingredient_repo(),
        tags: state.tag_repo(),
        images: state.image_store(),
    };
    let detail = usecase.execute(actor(&identity), id, body.into()).await?;
    Ok(Json(RecipeResponse::new(&state, detail)))
}

// ── DELETE /api/recipes/{id} ─────────────────────────────────────────────────

pub async fn delete_recipe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, RecipesServiceError> {
    let usecase = DeleteRecipeUseCase {
        recipes: state.recipe_repo(),
        images: state.image_store(),
    };
    usecase.execute(actor(&identity), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
