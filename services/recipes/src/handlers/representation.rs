//! JSON shapes shared by several endpoints.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::types::{
    Ingredient, Recipe, RecipeDetail, RecipeIngredient, Subscription, Tag, UserProfile,
};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub email: String,
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

impl From<UserProfile> for UserResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            email: profile.user.email,
            id: profile.user.id,
            username: profile.user.username,
            first_name: profile.user.first_name,
            last_name: profile.user.last_name,
            is_subscribed: profile.is_subscribed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IngredientResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            color: tag.color,
            slug: tag.slug,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeIngredientResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl From<RecipeIngredient> for RecipeIngredientResponse {
    fn from(entry: RecipeIngredient) -> Self {
        Self {
            id: entry.ingredient.id,
            name: entry.ingredient.name,
            measurement_unit: entry.ingredient.measurement_unit,
            amount: entry.amount,
        }
    }
}

/// Full recipe representation.
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i32,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub tags: Vec<TagResponse>,
    pub image: String,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl RecipeResponse {
    pub fn new(state: &AppState, detail: RecipeDetail) -> Self {
        Self {
            id: detail.recipe.id,
            author: detail.author.into(),
            ingredients: detail.ingredients.into_iter().map(Into::into).collect(),
            tags: detail.tags.into_iter().map(Into::into).collect(),
            image: state.image_url(&detail.recipe.image),
            name: detail.recipe.name,
            text: detail.recipe.text,
            cooking_time: detail.recipe.cooking_time,
            is_favorited: detail.is_favorited,
            is_in_shopping_cart: detail.is_in_shopping_cart,
        }
    }
}

/// Short recipe representation used by relation endpoints and subscriptions.
#[derive(Debug, Serialize)]
pub struct RecipeShortResponse {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl RecipeShortResponse {
    pub fn new(state: &AppState, recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            image: state.image_url(&recipe.image),
            name: recipe.name,
            cooking_time: recipe.cooking_time,
        }
    }
}

/// A followed author: the profile fields plus a recipe preview.
#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub recipes: Vec<RecipeShortResponse>,
    pub recipes_count: u64,
}

impl SubscriptionResponse {
    pub fn new(state: &AppState, subscription: Subscription) -> Self {
        Self {
            user: UserProfile {
                user: subscription.author,
                is_subscribed: true,
            }
            .into(),
            recipes: subscription
                .recipes
                .into_iter()
                .map(|recipe| RecipeShortResponse::new(state, recipe))
                .collect(),
            recipes_count: subscription.recipes_count,
        }
    }
}
