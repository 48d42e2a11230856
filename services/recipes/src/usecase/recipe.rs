use std::collections::HashSet;

use uuid::Uuid;

use foodgram_domain::pagination::{Page, PageRequest};

use crate::domain::image::ImagePayload;
use crate::domain::recipe::{
    check_associations_present, check_fields, check_ingredients, check_tags,
};
use crate::domain::repository::{
    ImageStore, IngredientRepository, RecipeRepository, TagRepository, UserRepository,
};
use crate::domain::types::{
    Actor, IngredientAmount, NewRecipe, Recipe, RecipeChanges, RecipeDetail, RecipeFilter,
};
use crate::error::RecipesServiceError;

/// Body of a recipe create or replace request. `image` is base64.
#[derive(Debug, Clone)]
pub struct RecipeInput {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: Option<String>,
    pub ingredients: Vec<IngredientAmount>,
    pub tag_ids: Vec<i32>,
}

/// Shape rules that need no storage access.
fn check_shape(input: &RecipeInput) -> Result<(), RecipesServiceError> {
    check_associations_present(&input.ingredients, &input.tag_ids)?;
    check_fields(&input.name, &input.text, input.cooking_time)
}

/// Resolve every requested ingredient and tag against the catalog.
async fn check_catalog<I: IngredientRepository, T: TagRepository>(
    ingredients: &I,
    tags: &T,
    input: &RecipeInput,
) -> Result<(), RecipesServiceError> {
    let requested: Vec<i32> = input.ingredients.iter().map(|e| e.ingredient_id).collect();
    let known: HashSet<i32> = ingredients
        .find_by_ids(&requested)
        .await?
        .into_iter()
        .map(|i| i.id)
        .collect();
    check_ingredients(&input.ingredients, &known)?;

    let known: HashSet<i32> = tags
        .find_by_ids(&input.tag_ids)
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();
    check_tags(&input.tag_ids, &known)
}

/// Best-effort removal; a leftover file is only logged.
async fn discard_image<S: ImageStore>(images: &S, path: &str) {
    if let Err(e) = images.delete(path).await {
        tracing::warn!(error = %e, path, "failed to remove recipe image");
    }
}

async fn single_detail<R: RecipeRepository>(
    recipes: &R,
    recipe: Recipe,
    viewer: Option<Uuid>,
) -> Result<RecipeDetail, RecipesServiceError> {
    recipes
        .details(vec![recipe], viewer)
        .await?
        .into_iter()
        .next()
        .ok_or(RecipesServiceError::RecipeNotFound)
}

// ── CreateRecipe ─────────────────────────────────────────────────────────────

pub struct CreateRecipeUseCase<R, I, T, U, S>
where
    R: RecipeRepository,
    I: IngredientRepository,
    T: TagRepository,
    U: UserRepository,
    S: ImageStore,
{
    pub recipes: R,
    pub ingredients: I,
    pub tags: T,
    pub users: U,
    pub images: S,
}

impl<R, I, T, U, S> CreateRecipeUseCase<R, I, T, U, S>
where
    R: RecipeRepository,
    I: IngredientRepository,
    T: TagRepository,
    U: UserRepository,
    S: ImageStore,
{
    pub async fn execute(
        &self,
        author_id: Uuid,
        input: RecipeInput,
    ) -> Result<RecipeDetail, RecipesServiceError> {
        check_shape(&input)?;
        if self.users.find_by_id(author_id).await?.is_none() {
            return Err(RecipesServiceError::UserNotFound);
        }
        check_catalog(&self.ingredients, &self.tags, &input).await?;

        let image = match input.image.as_deref() {
            Some(raw) => ImagePayload::from_base64(raw)?,
            None => return Err(RecipesServiceError::MissingImage),
        };
        let name = input.name.trim().to_owned();
        if self.recipes.name_taken(author_id, &name, None).await? {
            return Err(RecipesServiceError::RecipeAlreadyExists);
        }

        let image_path = self.images.save(&image).await?;
        let new_recipe = NewRecipe {
            author_id,
            name,
            text: input.text,
            cooking_time: input.cooking_time,
            image: image_path.clone(),
            ingredients: input.ingredients,
            tag_ids: input.tag_ids,
        };
        let recipe = match self.recipes.create(&new_recipe).await {
            Ok(recipe) => recipe,
            Err(e) => {
                discard_image(&self.images, &image_path).await;
                return Err(e);
            }
        };
        tracing::info!(recipe_id = recipe.id, %author_id, "recipe created");

        single_detail(&self.recipes, recipe, Some(author_id)).await
    }
}

// ── UpdateRecipe ─────────────────────────────────────────────────────────────

pub struct UpdateRecipeUseCase<R, I, T, S>
where
    R: RecipeRepository,
    I: IngredientRepository,
    T: TagRepository,
    S: ImageStore,
{
    pub recipes: R,
    pub ingredients: I,
    pub tags: T,
    pub images: S,
}

impl<R, I, T, S> UpdateRecipeUseCase<R, I, T, S>
where
    R: RecipeRepository,
    I: IngredientRepository,
    T: TagRepository,
    S: ImageStore,
{
    pub async fn execute(
        &self,
        actor: Actor,
        recipe_id: i32,
        input: RecipeInput,
    ) -> Result<RecipeDetail, RecipesServiceError> {
        let current = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(RecipesServiceError::RecipeNotFound)?;
        if !actor.can_modify(&current) {
            return Err(RecipesServiceError::Forbidden);
        }
        check_shape(&input)?;
        check_catalog(&self.ingredients, &self.tags, &input).await?;

        // An absent or blank image keeps the stored one.
        let image = input
            .image
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(ImagePayload::from_base64)
            .transpose()?;
        let name = input.name.trim().to_owned();
        if self
            .recipes
            .name_taken(current.author_id, &name, Some(recipe_id))
            .await?
        {
            return Err(RecipesServiceError::RecipeAlreadyExists);
        }

        let new_image = match image {
            Some(image) => Some(self.images.save(&image).await?),
            None => None,
        };
        let changes = RecipeChanges {
            name,
            text: input.text,
            cooking_time: input.cooking_time,
            image: new_image.clone(),
            ingredients: input.ingredients,
            tag_ids: input.tag_ids,
        };
        let recipe = match self.recipes.replace(recipe_id, &changes).await {
            Ok(recipe) => recipe,
            Err(e) => {
                if let Some(path) = &new_image {
                    discard_image(&self.images, path).await;
                }
                return Err(e);
            }
        };
        if new_image.is_some() {
            discard_image(&self.images, &current.image).await;
        }
        tracing::info!(recipe_id, actor = %actor.user_id, "recipe updated");

        single_detail(&self.recipes, recipe, Some(actor.user_id)).await
    }
}

// ── DeleteRecipe ─────────────────────────────────────────────────────────────

pub struct DeleteRecipeUseCase<R: RecipeRepository, S: ImageStore> {
    pub recipes: R,
    pub images: S,
}

impl<R: RecipeRepository, S: ImageStore> DeleteRecipeUseCase<R, S> {
    pub async fn execute(&self, actor: Actor, recipe_id: i32) -> Result<(), RecipesServiceError> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(RecipesServiceError::RecipeNotFound)?;
        if !actor.can_modify(&recipe) {
            return Err(RecipesServiceError::Forbidden);
        }
        if !self.recipes.delete(recipe_id).await? {
            return Err(RecipesServiceError::RecipeNotFound);
        }
        discard_image(&self.images, &recipe.image).await;
        tracing::info!(recipe_id, actor = %actor.user_id, "recipe deleted");
        Ok(())
    }
}

// ── GetRecipe ────────────────────────────────────────────────────────────────

pub struct GetRecipeUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> GetRecipeUseCase<R> {
    pub async fn execute(
        &self,
        recipe_id: i32,
        viewer: Option<Uuid>,
    ) -> Result<RecipeDetail, RecipesServiceError> {
        let recipe = self
            .repo
            .find_by_id(recipe_id)
            .await?
            .ok_or(RecipesServiceError::RecipeNotFound)?;
        single_detail(&self.repo, recipe, viewer).await
    }
}

// ── ListRecipes ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ListRecipesInput {
    pub tags: Vec<String>,
    pub author: Option<Uuid>,
    pub only_favorited: bool,
    pub only_in_shopping_cart: bool,
    pub page: PageRequest,
}

pub struct ListRecipesUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> ListRecipesUseCase<R> {
    /// Relation filters only apply to authenticated viewers; anonymous
    /// callers get the unfiltered list.
    pub async fn execute(
        &self,
        input: ListRecipesInput,
        viewer: Option<Uuid>,
    ) -> Result<Page<RecipeDetail>, RecipesServiceError> {
        let filter = RecipeFilter {
            tags: input.tags,
            author: input.author,
            favorited_by: viewer.filter(|_| input.only_favorited),
            in_cart_of: viewer.filter(|_| input.only_in_shopping_cart),
        };
        let page = self.repo.list(&filter, input.page).await?;
        let results = self.repo.details(page.results, viewer).await?;
        Ok(Page::new(page.count, results))
    }
}
