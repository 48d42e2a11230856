#![allow(async_fn_in_trait)]

use std::collections::HashSet;

use uuid::Uuid;

use foodgram_domain::pagination::{Page, PageRequest};

use crate::domain::image::ImagePayload;
use crate::domain::shopping_list::ShoppingListLine;
use crate::domain::types::{
    Ingredient, NewRecipe, Recipe, RecipeChanges, RecipeDetail, RecipeFilter, RecipeRelation, Tag,
    User,
};
use crate::error::RecipesServiceError;

/// Repository for user profiles.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RecipesServiceError>;
    async fn list(&self, page: PageRequest) -> Result<Page<User>, RecipesServiceError>;
    /// Fails with `UserAlreadyExists` when the id, email or username is taken.
    async fn create(&self, user: &User) -> Result<(), RecipesServiceError>;
}

/// Read-only ingredient catalog.
pub trait IngredientRepository: Send + Sync {
    /// Ordered by name; `name_prefix` is matched case-insensitively.
    async fn list(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, RecipesServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, RecipesServiceError>;
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Ingredient>, RecipesServiceError>;
}

/// Read-only tag catalog.
pub trait TagRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Tag>, RecipesServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, RecipesServiceError>;
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Tag>, RecipesServiceError>;
}

pub trait RecipeRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, RecipesServiceError>;

    /// Whether `author_id` already owns a recipe called `name`, ignoring `exclude`.
    async fn name_taken(
        &self,
        author_id: Uuid,
        name: &str,
        exclude: Option<i32>,
    ) -> Result<bool, RecipesServiceError>;

    /// Newest first.
    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Page<Recipe>, RecipesServiceError>;

    /// Resolve author, ingredients, tags and the viewer's relation flags for
    /// each recipe. Output order follows input order.
    async fn details(
        &self,
        recipes: Vec<Recipe>,
        viewer: Option<Uuid>,
    ) -> Result<Vec<RecipeDetail>, RecipesServiceError>;

    /// Insert the recipe with its ingredient and tag sets in one transaction.
    async fn create(&self, recipe: &NewRecipe) -> Result<Recipe, RecipesServiceError>;

    /// Update the recipe row and replace both association sets in one transaction.
    async fn replace(
        &self,
        id: i32,
        changes: &RecipeChanges,
    ) -> Result<Recipe, RecipesServiceError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, RecipesServiceError>;

    /// Newest first, at most `limit` rows when given.
    async fn list_by_author(
        &self,
        author_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<Recipe>, RecipesServiceError>;

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RecipesServiceError>;
}

/// Favorites and shopping cart entries.
pub trait RecipeRelationRepository: Send + Sync {
    /// Returns `false` if the relation already existed.
    async fn add(
        &self,
        relation: RecipeRelation,
        user_id: Uuid,
        recipe_id: i32,
    ) -> Result<bool, RecipesServiceError>;

    /// Returns `false` if there was nothing to remove.
    async fn remove(
        &self,
        relation: RecipeRelation,
        user_id: Uuid,
        recipe_id: i32,
    ) -> Result<bool, RecipesServiceError>;

    /// Ingredient totals over every recipe in the user's cart, grouped by
    /// `(name, unit)`.
    async fn cart_ingredients(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ShoppingListLine>, RecipesServiceError>;
}

pub trait FollowRepository: Send + Sync {
    /// Returns `false` if the follow already existed.
    async fn add(&self, user_id: Uuid, following_id: Uuid) -> Result<bool, RecipesServiceError>;

    /// Returns `false` if there was nothing to remove.
    async fn remove(&self, user_id: Uuid, following_id: Uuid) -> Result<bool, RecipesServiceError>;

    /// Subset of `candidates` that `user_id` follows.
    async fn following_among(
        &self,
        user_id: Uuid,
        candidates: &[Uuid],
    ) -> Result<HashSet<Uuid>, RecipesServiceError>;

    /// Followed authors, most recent follow first.
    async fn list_following(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<User>, RecipesServiceError>;
}

/// Storage for uploaded recipe images.
pub trait ImageStore: Send + Sync {
    /// Persist the image and return its path relative to the media root.
    async fn save(&self, image: &ImagePayload) -> Result<String, RecipesServiceError>;

    /// Remove a stored image. Missing files are not an error.
    async fn delete(&self, path: &str) -> Result<(), RecipesServiceError>;
}
