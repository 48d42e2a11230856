use std::collections::{HashMap, HashSet};

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, FromQueryResult, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, SqlErr, Statement, TransactionError,
    TransactionTrait,
    sea_query::{Expr, Func, OnConflict, Query},
};
use uuid::Uuid;

use foodgram_domain::pagination::{Page, PageRequest};
use foodgram_recipes_schema::{
    favorites, follows, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_carts,
    tags, users,
};

use crate::domain::repository::{
    FollowRepository, IngredientRepository, RecipeRelationRepository, RecipeRepository,
    TagRepository, UserRepository,
};
use crate::domain::shopping_list::ShoppingListLine;
use crate::domain::types::{
    Ingredient, IngredientAmount, NewRecipe, Recipe, RecipeChanges, RecipeDetail, RecipeFilter,
    RecipeIngredient, RecipeRelation, Tag, User, UserProfile,
};
use crate::error::RecipesServiceError;

const RECIPE_NAME_CONSTRAINT: &str = "uq_recipes_name_author_id";

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RecipesServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model).transpose()?)
    }

    async fn list(&self, page: PageRequest) -> Result<Page<User>, RecipesServiceError> {
        let page = page.clamped();
        let count = users::Entity::find()
            .count(&self.db)
            .await
            .context("count users")?;
        let models = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Id)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list users")?;
        let users = models
            .into_iter()
            .map(user_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Page::new(count, users))
    }

    async fn create(&self, user: &User) -> Result<(), RecipesServiceError> {
        let result = users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            username: Set(user.username.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            role: Set(i16::from(user.role)),
            created_at: Set(user.created_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(RecipesServiceError::UserAlreadyExists)
            }
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }
}

fn user_from_model(model: users::Model) -> anyhow::Result<User> {
    let role = u8::try_from(model.role)
        .with_context(|| format!("user {} has out-of-range role {}", model.id, model.role))?;
    Ok(User {
        id: model.id,
        email: model.email,
        username: model.username,
        first_name: model.first_name,
        last_name: model.last_name,
        role,
        created_at: model.created_at,
    })
}

// ── Ingredient repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIngredientRepository {
    pub db: DatabaseConnection,
}

impl IngredientRepository for DbIngredientRepository {
    async fn list(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, RecipesServiceError> {
        let mut query = ingredients::Entity::find();
        if let Some(prefix) = name_prefix.map(str::trim).filter(|p| !p.is_empty()) {
            let pattern = format!("{}%", escape_like(&prefix.to_lowercase()));
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(ingredients::Column::Name))).like(pattern),
            );
        }
        let models = query
            .order_by_asc(ingredients::Column::Name)
            .order_by_asc(ingredients::Column::MeasurementUnit)
            .all(&self.db)
            .await
            .context("list ingredients")?;
        Ok(models.into_iter().map(ingredient_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, RecipesServiceError> {
        let model = ingredients::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find ingredient by id")?;
        Ok(model.map(ingredient_from_model))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Ingredient>, RecipesServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = ingredients::Entity::find()
            .filter(ingredients::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .context("find ingredients by ids")?;
        Ok(models.into_iter().map(ingredient_from_model).collect())
    }
}

fn ingredient_from_model(model: ingredients::Model) -> Ingredient {
    Ingredient {
        id: model.id,
        name: model.name,
        measurement_unit: model.measurement_unit,
    }
}

/// Escape LIKE metacharacters so user input only ever matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// ── Tag repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTagRepository {
    pub db: DatabaseConnection,
}

impl TagRepository for DbTagRepository {
    async fn list(&self) -> Result<Vec<Tag>, RecipesServiceError> {
        let models = tags::Entity::find()
            .order_by_asc(tags::Column::Id)
            .all(&self.db)
            .await
            .context("list tags")?;
        Ok(models.into_iter().map(tag_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, RecipesServiceError> {
        let model = tags::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find tag by id")?;
        Ok(model.map(tag_from_model))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Tag>, RecipesServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = tags::Entity::find()
            .filter(tags::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .context("find tags by ids")?;
        Ok(models.into_iter().map(tag_from_model).collect())
    }
}

fn tag_from_model(model: tags::Model) -> Tag {
    Tag {
        id: model.id,
        name: model.name,
        color: model.color,
        slug: model.slug,
    }
}

// ── Recipe repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRecipeRepository {
    pub db: DatabaseConnection,
}

impl RecipeRepository for DbRecipeRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, RecipesServiceError> {
        let model = recipes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find recipe by id")?;
        Ok(model.map(recipe_from_model))
    }

    async fn name_taken(
        &self,
        author_id: Uuid,
        name: &str,
        exclude: Option<i32>,
    ) -> Result<bool, RecipesServiceError> {
        let mut query = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author_id))
            .filter(recipes::Column::Name.eq(name));
        if let Some(id) = exclude {
            query = query.filter(recipes::Column::Id.ne(id));
        }
        let count = query
            .count(&self.db)
            .await
            .context("check recipe name")?;
        Ok(count > 0)
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Page<Recipe>, RecipesServiceError> {
        let page = page.clamped();
        let mut query = recipes::Entity::find();

        if let Some(author_id) = filter.author {
            query = query.filter(recipes::Column::AuthorId.eq(author_id));
        }
        if !filter.tags.is_empty() {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column((recipe_tags::Entity, recipe_tags::Column::RecipeId))
                        .from(recipe_tags::Entity)
                        .inner_join(
                            tags::Entity,
                            Expr::col((tags::Entity, tags::Column::Id))
                                .equals((recipe_tags::Entity, recipe_tags::Column::TagId)),
                        )
                        .and_where(
                            Expr::col((tags::Entity, tags::Column::Slug))
                                .is_in(filter.tags.clone()),
                        )
                        .to_owned(),
                ),
            );
        }
        if let Some(user_id) = filter.favorited_by {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column(favorites::Column::RecipeId)
                        .from(favorites::Entity)
                        .and_where(favorites::Column::UserId.eq(user_id))
                        .to_owned(),
                ),
            );
        }
        if let Some(user_id) = filter.in_cart_of {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column(shopping_carts::Column::RecipeId)
                        .from(shopping_carts::Entity)
                        .and_where(shopping_carts::Column::UserId.eq(user_id))
                        .to_owned(),
                ),
            );
        }

        let count = query
            .clone()
            .count(&self.db)
            .await
            .context("count recipes")?;
        let models = query
            .order_by_desc(recipes::Column::PubDate)
            .order_by_desc(recipes::Column::Id)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list recipes")?;
        Ok(Page::new(
            count,
            models.into_iter().map(recipe_from_model).collect(),
        ))
    }

    async fn details(
        &self,
        recipes: Vec<Recipe>,
        viewer: Option<Uuid>,
    ) -> Result<Vec<RecipeDetail>, RecipesServiceError> {
        if recipes.is_empty() {
            return Ok(Vec::new());
        }
        let recipe_ids: Vec<i32> = recipes.iter().map(|r| r.id).collect();
        let author_ids: Vec<Uuid> = recipes
            .iter()
            .map(|r| r.author_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let authors: HashMap<Uuid, User> = users::Entity::find()
            .filter(users::Column::Id.is_in(author_ids.clone()))
            .all(&self.db)
            .await
            .context("load recipe authors")?
            .into_iter()
            .map(|m| -> anyhow::Result<(Uuid, User)> { Ok((m.id, user_from_model(m)?)) })
            .collect::<anyhow::Result<_>>()?;

        let mut ingredients_by_recipe: HashMap<i32, Vec<RecipeIngredient>> = HashMap::new();
        let ingredient_rows = recipe_ingredients::Entity::find()
            .filter(recipe_ingredients::Column::RecipeId.is_in(recipe_ids.clone()))
            .find_also_related(ingredients::Entity)
            .order_by_asc(ingredients::Column::Name)
            .all(&self.db)
            .await
            .context("load recipe ingredients")?;
        for (link, ingredient) in ingredient_rows {
            if let Some(ingredient) = ingredient {
                ingredients_by_recipe
                    .entry(link.recipe_id)
                    .or_default()
                    .push(RecipeIngredient {
                        ingredient: ingredient_from_model(ingredient),
                        amount: link.amount,
                    });
            }
        }

        let mut tags_by_recipe: HashMap<i32, Vec<Tag>> = HashMap::new();
        let tag_rows = recipe_tags::Entity::find()
            .filter(recipe_tags::Column::RecipeId.is_in(recipe_ids.clone()))
            .find_also_related(tags::Entity)
            .order_by_asc(tags::Column::Id)
            .all(&self.db)
            .await
            .context("load recipe tags")?;
        for (link, tag) in tag_rows {
            if let Some(tag) = tag {
                tags_by_recipe
                    .entry(link.recipe_id)
                    .or_default()
                    .push(tag_from_model(tag));
            }
        }

        let (followed, favorited, in_cart) = match viewer {
            Some(viewer) => {
                let followed: HashSet<Uuid> = follows::Entity::find()
                    .filter(follows::Column::UserId.eq(viewer))
                    .filter(follows::Column::FollowingId.is_in(author_ids))
                    .all(&self.db)
                    .await
                    .context("load viewer follows")?
                    .into_iter()
                    .map(|m| m.following_id)
                    .collect();
                let favorited: HashSet<i32> = favorites::Entity::find()
                    .filter(favorites::Column::UserId.eq(viewer))
                    .filter(favorites::Column::RecipeId.is_in(recipe_ids.clone()))
                    .all(&self.db)
                    .await
                    .context("load viewer favorites")?
                    .into_iter()
                    .map(|m| m.recipe_id)
                    .collect();
                let in_cart: HashSet<i32> = shopping_carts::Entity::find()
                    .filter(shopping_carts::Column::UserId.eq(viewer))
                    .filter(shopping_carts::Column::RecipeId.is_in(recipe_ids))
                    .all(&self.db)
                    .await
                    .context("load viewer shopping cart")?
                    .into_iter()
                    .map(|m| m.recipe_id)
                    .collect();
                (followed, favorited, in_cart)
            }
            None => (HashSet::new(), HashSet::new(), HashSet::new()),
        };

        recipes
            .into_iter()
            .map(|recipe| -> Result<RecipeDetail, RecipesServiceError> {
                let user = authors
                    .get(&recipe.author_id)
                    .cloned()
                    .with_context(|| format!("author of recipe {} is missing", recipe.id))?;
                Ok(RecipeDetail {
                    author: UserProfile {
                        is_subscribed: followed.contains(&user.id),
                        user,
                    },
                    ingredients: ingredients_by_recipe.remove(&recipe.id).unwrap_or_default(),
                    tags: tags_by_recipe.remove(&recipe.id).unwrap_or_default(),
                    is_favorited: favorited.contains(&recipe.id),
                    is_in_shopping_cart: in_cart.contains(&recipe.id),
                    recipe,
                })
            })
            .collect()
    }

    async fn create(&self, recipe: &NewRecipe) -> Result<Recipe, RecipesServiceError> {
        let model = self
            .db
            .transaction::<_, recipes::Model, DbErr>(|txn| {
                let recipe = recipe.clone();
                Box::pin(async move {
                    let model = recipes::ActiveModel {
                        author_id: Set(recipe.author_id),
                        name: Set(recipe.name),
                        text: Set(recipe.text),
                        cooking_time: Set(recipe.cooking_time),
                        image: Set(recipe.image),
                        pub_date: Set(Utc::now()),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;
                    insert_associations(txn, model.id, &recipe.ingredients, &recipe.tag_ids)
                        .await?;
                    Ok(model)
                })
            })
            .await
            .map_err(|e| recipe_write_error(e, "create recipe"))?;
        Ok(recipe_from_model(model))
    }

    async fn replace(
        &self,
        id: i32,
        changes: &RecipeChanges,
    ) -> Result<Recipe, RecipesServiceError> {
        let model = self
            .db
            .transaction::<_, recipes::Model, DbErr>(|txn| {
                let changes = changes.clone();
                Box::pin(async move {
                    let mut recipe = recipes::ActiveModel {
                        id: Set(id),
                        name: Set(changes.name),
                        text: Set(changes.text),
                        cooking_time: Set(changes.cooking_time),
                        ..Default::default()
                    };
                    if let Some(image) = changes.image {
                        recipe.image = Set(image);
                    }
                    let model = recipe.update(txn).await?;

                    recipe_tags::Entity::delete_many()
                        .filter(recipe_tags::Column::RecipeId.eq(id))
                        .exec(txn)
                        .await?;
                    recipe_ingredients::Entity::delete_many()
                        .filter(recipe_ingredients::Column::RecipeId.eq(id))
                        .exec(txn)
                        .await?;
                    insert_associations(txn, id, &changes.ingredients, &changes.tag_ids).await?;
                    Ok(model)
                })
            })
            .await
            .map_err(|e| recipe_write_error(e, "replace recipe"))?;
        Ok(recipe_from_model(model))
    }

    async fn delete(&self, id: i32) -> Result<bool, RecipesServiceError> {
        let result = recipes::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete recipe")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<Recipe>, RecipesServiceError> {
        let models = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author_id))
            .order_by_desc(recipes::Column::PubDate)
            .order_by_desc(recipes::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list recipes by author")?;
        Ok(models.into_iter().map(recipe_from_model).collect())
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RecipesServiceError> {
        let count = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .context("count recipes by author")?;
        Ok(count)
    }
}

async fn insert_associations(
    txn: &DatabaseTransaction,
    recipe_id: i32,
    ingredients: &[IngredientAmount],
    tag_ids: &[i32],
) -> Result<(), DbErr> {
    recipe_ingredients::Entity::insert_many(ingredients.iter().map(|entry| {
        recipe_ingredients::ActiveModel {
            recipe_id: Set(recipe_id),
            ingredient_id: Set(entry.ingredient_id),
            amount: Set(entry.amount),
        }
    }))
    .exec_without_returning(txn)
    .await?;
    recipe_tags::Entity::insert_many(tag_ids.iter().map(|tag_id| recipe_tags::ActiveModel {
        recipe_id: Set(recipe_id),
        tag_id: Set(*tag_id),
    }))
    .exec_without_returning(txn)
    .await?;
    Ok(())
}

/// The unique index on (name, author_id) is the authoritative duplicate guard;
/// a violation raised inside the transaction surfaces as `RecipeAlreadyExists`.
/// Catalog rows deleted after validation surface as foreign key violations.
fn recipe_write_error(err: TransactionError<DbErr>, action: &'static str) -> RecipesServiceError {
    let db_err = match err {
        TransactionError::Connection(e) | TransactionError::Transaction(e) => e,
    };
    match db_err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message))
            if message.contains(RECIPE_NAME_CONSTRAINT) =>
        {
            return RecipesServiceError::RecipeAlreadyExists;
        }
        Some(SqlErr::ForeignKeyConstraintViolation(message)) => {
            return missing_reference(&message);
        }
        _ => {}
    }
    match db_err {
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RecipesServiceError::RecipeNotFound,
        other => anyhow::Error::new(other).context(action).into(),
    }
}

fn recipe_from_model(model: recipes::Model) -> Recipe {
    Recipe {
        id: model.id,
        author_id: model.author_id,
        name: model.name,
        text: model.text,
        cooking_time: model.cooking_time,
        image: model.image,
        pub_date: model.pub_date,
    }
}

// ── Favorite / shopping cart repository ──────────────────────────────────────

#[derive(Clone)]
pub struct DbRecipeRelationRepository {
    pub db: DatabaseConnection,
}

impl RecipeRelationRepository for DbRecipeRelationRepository {
    async fn add(
        &self,
        relation: RecipeRelation,
        user_id: Uuid,
        recipe_id: i32,
    ) -> Result<bool, RecipesServiceError> {
        let now = Utc::now();
        let result = match relation {
            RecipeRelation::Favorite => {
                favorites::Entity::insert(favorites::ActiveModel {
                    user_id: Set(user_id),
                    recipe_id: Set(recipe_id),
                    created_at: Set(now),
                })
                .on_conflict(
                    OnConflict::columns([favorites::Column::UserId, favorites::Column::RecipeId])
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await
            }
            RecipeRelation::ShoppingCart => {
                shopping_carts::Entity::insert(shopping_carts::ActiveModel {
                    user_id: Set(user_id),
                    recipe_id: Set(recipe_id),
                    created_at: Set(now),
                })
                .on_conflict(
                    OnConflict::columns([
                        shopping_carts::Column::UserId,
                        shopping_carts::Column::RecipeId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await
            }
        };
        let inserted = result.map_err(|e| relation_write_error(e, "add recipe relation"))?;
        Ok(inserted > 0)
    }

    async fn remove(
        &self,
        relation: RecipeRelation,
        user_id: Uuid,
        recipe_id: i32,
    ) -> Result<bool, RecipesServiceError> {
        let result = match relation {
            RecipeRelation::Favorite => {
                favorites::Entity::delete_by_id((user_id, recipe_id))
                    .exec(&self.db)
                    .await
            }
            RecipeRelation::ShoppingCart => {
                shopping_carts::Entity::delete_by_id((user_id, recipe_id))
                    .exec(&self.db)
                    .await
            }
        }
        .context("remove recipe relation")?;
        Ok(result.rows_affected > 0)
    }

    async fn cart_ingredients(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ShoppingListLine>, RecipesServiceError> {
        #[derive(Debug, FromQueryResult)]
        struct CartLineRow {
            name: String,
            measurement_unit: String,
            amount: i64,
        }

        let sql = r#"
            SELECT i.name, i.measurement_unit, SUM(ri.amount) AS amount
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            JOIN shopping_carts sc ON sc.recipe_id = ri.recipe_id
            WHERE sc.user_id = $1
            GROUP BY i.name, i.measurement_unit
            ORDER BY i.name, i.measurement_unit
        "#;

        let rows = CartLineRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            sql,
            [user_id.into()],
        ))
        .all(&self.db)
        .await
        .context("aggregate shopping cart ingredients")?;

        Ok(rows
            .into_iter()
            .map(|row| ShoppingListLine {
                name: row.name,
                measurement_unit: row.measurement_unit,
                amount: row.amount,
            })
            .collect())
    }
}

// ── Follow repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFollowRepository {
    pub db: DatabaseConnection,
}

impl FollowRepository for DbFollowRepository {
    async fn add(&self, user_id: Uuid, following_id: Uuid) -> Result<bool, RecipesServiceError> {
        let inserted = follows::Entity::insert(follows::ActiveModel {
            user_id: Set(user_id),
            following_id: Set(following_id),
            created_at: Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::columns([follows::Column::UserId, follows::Column::FollowingId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .map_err(|e| relation_write_error(e, "add follow"))?;
        Ok(inserted > 0)
    }

    async fn remove(&self, user_id: Uuid, following_id: Uuid) -> Result<bool, RecipesServiceError> {
        let result = follows::Entity::delete_by_id((user_id, following_id))
            .exec(&self.db)
            .await
            .context("remove follow")?;
        Ok(result.rows_affected > 0)
    }

    async fn following_among(
        &self,
        user_id: Uuid,
        candidates: &[Uuid],
    ) -> Result<HashSet<Uuid>, RecipesServiceError> {
        if candidates.is_empty() {
            return Ok(HashSet::new());
        }
        let models = follows::Entity::find()
            .filter(follows::Column::UserId.eq(user_id))
            .filter(follows::Column::FollowingId.is_in(candidates.to_vec()))
            .all(&self.db)
            .await
            .context("load follows among candidates")?;
        Ok(models.into_iter().map(|m| m.following_id).collect())
    }

    async fn list_following(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<User>, RecipesServiceError> {
        let page = page.clamped();
        let query = users::Entity::find()
            .join(JoinType::InnerJoin, follows::Relation::Following.def().rev())
            .filter(follows::Column::UserId.eq(user_id));
        let count = query
            .clone()
            .count(&self.db)
            .await
            .context("count followed users")?;
        let models = query
            .order_by_desc(follows::Column::CreatedAt)
            .order_by_asc(users::Column::Id)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list followed users")?;
        let users = models
            .into_iter()
            .map(user_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Page::new(count, users))
    }
}

/// A foreign key failure while linking means one side vanished or the caller
/// has no profile yet.
fn relation_write_error(err: DbErr, action: &'static str) -> RecipesServiceError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(message)) => missing_reference(&message),
        _ => anyhow::Error::new(err).context(action).into(),
    }
}

/// Name the missing row from a foreign key violation. Postgres reports the
/// constraint as `<table>_<column>_fkey`; user references are the fallback.
fn missing_reference(message: &str) -> RecipesServiceError {
    if message.contains("ingredient_id") {
        RecipesServiceError::IngredientNotFound
    } else if message.contains("tag_id") {
        RecipesServiceError::TagNotFound
    } else if message.contains("recipe_id") {
        RecipesServiceError::RecipeNotFound
    } else {
        RecipesServiceError::UserNotFound
    }
}
