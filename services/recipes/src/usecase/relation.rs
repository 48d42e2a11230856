use uuid::Uuid;

use foodgram_domain::pagination::{Page, PageRequest};

use crate::domain::repository::{
    FollowRepository, RecipeRelationRepository, RecipeRepository, UserRepository,
};
use crate::domain::types::{Recipe, RecipeRelation, Subscription, User};
use crate::error::RecipesServiceError;

fn already_exists(relation: RecipeRelation) -> RecipesServiceError {
    match relation {
        RecipeRelation::Favorite => RecipesServiceError::AlreadyFavorited,
        RecipeRelation::ShoppingCart => RecipesServiceError::AlreadyInShoppingCart,
    }
}

fn not_found(relation: RecipeRelation) -> RecipesServiceError {
    match relation {
        RecipeRelation::Favorite => RecipesServiceError::FavoriteNotFound,
        RecipeRelation::ShoppingCart => RecipesServiceError::ShoppingCartEntryNotFound,
    }
}

// ── AddRecipeRelation (favorite / shopping cart) ─────────────────────────────

pub struct AddRecipeRelationUseCase<R: RecipeRepository, L: RecipeRelationRepository> {
    pub recipes: R,
    pub relations: L,
}

impl<R: RecipeRepository, L: RecipeRelationRepository> AddRecipeRelationUseCase<R, L> {
    /// Returns the linked recipe for the short representation.
    pub async fn execute(
        &self,
        user_id: Uuid,
        relation: RecipeRelation,
        recipe_id: i32,
    ) -> Result<Recipe, RecipesServiceError> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(RecipesServiceError::RecipeNotFound)?;
        if !self.relations.add(relation, user_id, recipe_id).await? {
            return Err(already_exists(relation));
        }
        Ok(recipe)
    }
}

// ── RemoveRecipeRelation ─────────────────────────────────────────────────────

pub struct RemoveRecipeRelationUseCase<R: RecipeRepository, L: RecipeRelationRepository> {
    pub recipes: R,
    pub relations: L,
}

impl<R: RecipeRepository, L: RecipeRelationRepository> RemoveRecipeRelationUseCase<R, L> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        relation: RecipeRelation,
        recipe_id: i32,
    ) -> Result<(), RecipesServiceError> {
        if self.recipes.find_by_id(recipe_id).await?.is_none() {
            return Err(RecipesServiceError::RecipeNotFound);
        }
        if !self.relations.remove(relation, user_id, recipe_id).await? {
            return Err(not_found(relation));
        }
        Ok(())
    }
}

async fn subscription_for<R: RecipeRepository>(
    recipes: &R,
    author: User,
    recipes_limit: Option<u32>,
) -> Result<Subscription, RecipesServiceError> {
    let recipes_count = recipes.count_by_author(author.id).await?;
    let preview = recipes
        .list_by_author(author.id, recipes_limit.map(u64::from))
        .await?;
    Ok(Subscription {
        author,
        recipes_count,
        recipes: preview,
    })
}

// ── Subscribe ────────────────────────────────────────────────────────────────

pub struct SubscribeUseCase<U: UserRepository, F: FollowRepository, R: RecipeRepository> {
    pub users: U,
    pub follows: F,
    pub recipes: R,
}

impl<U: UserRepository, F: FollowRepository, R: RecipeRepository> SubscribeUseCase<U, F, R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        author_id: Uuid,
        recipes_limit: Option<u32>,
    ) -> Result<Subscription, RecipesServiceError> {
        if user_id == author_id {
            return Err(RecipesServiceError::SelfFollow);
        }
        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or(RecipesServiceError::UserNotFound)?;
        if !self.follows.add(user_id, author_id).await? {
            return Err(RecipesServiceError::AlreadySubscribed);
        }
        tracing::info!(%user_id, %author_id, "subscribed");
        subscription_for(&self.recipes, author, recipes_limit).await
    }
}

// ── Unsubscribe ──────────────────────────────────────────────────────────────

pub struct UnsubscribeUseCase<U: UserRepository, F: FollowRepository> {
    pub users: U,
    pub follows: F,
}

impl<U: UserRepository, F: FollowRepository> UnsubscribeUseCase<U, F> {
    pub async fn execute(&self, user_id: Uuid, author_id: Uuid) -> Result<(), RecipesServiceError> {
        if self.users.find_by_id(author_id).await?.is_none() {
            return Err(RecipesServiceError::UserNotFound);
        }
        if !self.follows.remove(user_id, author_id).await? {
            return Err(RecipesServiceError::SubscriptionNotFound);
        }
        Ok(())
    }
}

// ── ListSubscriptions ────────────────────────────────────────────────────────

pub struct ListSubscriptionsUseCase<F: FollowRepository, R: RecipeRepository> {
    pub follows: F,
    pub recipes: R,
}

impl<F: FollowRepository, R: RecipeRepository> ListSubscriptionsUseCase<F, R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        page: PageRequest,
        recipes_limit: Option<u32>,
    ) -> Result<Page<Subscription>, RecipesServiceError> {
        let authors = self.follows.list_following(user_id, page).await?;
        let mut results = Vec::with_capacity(authors.results.len());
        for author in authors.results {
            results.push(subscription_for(&self.recipes, author, recipes_limit).await?);
        }
        Ok(Page::new(authors.count, results))
    }
}
