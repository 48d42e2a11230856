//! Repository tests against a migrated Postgres. Set `TEST_DATABASE_URL` to run
//! them; without it every test returns early. Each test works on rows with a
//! fresh suffix, so runs can share one database.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tokio::sync::OnceCell;
use uuid::Uuid;

use foodgram_recipes::domain::repository::{
    FollowRepository, RecipeRelationRepository, RecipeRepository, UserRepository,
};
use foodgram_recipes::domain::types::{
    Ingredient, IngredientAmount, NewRecipe, Recipe, RecipeChanges, RecipeRelation, Tag, User,
};
use foodgram_recipes::error::RecipesServiceError;
use foodgram_recipes::infra::db::{
    DbFollowRepository, DbRecipeRelationRepository, DbRecipeRepository, DbUserRepository,
};
use foodgram_recipes::usecase::relation::AddRecipeRelationUseCase;
use foodgram_recipes::usecase::shopping_list::DownloadShoppingListUseCase;
use foodgram_recipes_migration::Migrator;
use foodgram_recipes_schema::{ingredients, tags};

static MIGRATED: OnceCell<()> = OnceCell::const_new();

async fn connect() -> Option<DatabaseConnection> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return None;
    };
    let db = Database::connect(&url).await.unwrap();
    MIGRATED
        .get_or_init(|| async {
            Migrator::up(&db, None).await.unwrap();
        })
        .await;
    Some(db)
}

struct Fixture {
    db: DatabaseConnection,
    run: String,
    author: User,
    salt: Ingredient,
    pepper: Ingredient,
    tag: Tag,
}

impl Fixture {
    async fn new(db: DatabaseConnection) -> Self {
        let run = Uuid::new_v4().simple().to_string()[..12].to_owned();
        let author = add_user(&db, &format!("chef_{run}")).await;
        let salt = add_ingredient(&db, &format!("Salt {run}")).await;
        let pepper = add_ingredient(&db, &format!("Pepper {run}")).await;
        let tag = tags::ActiveModel {
            name: Set(format!("Dinner {run}")),
            color: Set("#E26C2D".into()),
            slug: Set(format!("dinner-{run}")),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
        Self {
            db,
            run,
            author,
            salt,
            pepper,
            tag: Tag {
                id: tag.id,
                name: tag.name,
                color: tag.color,
                slug: tag.slug,
            },
        }
    }

    fn recipes(&self) -> DbRecipeRepository {
        DbRecipeRepository {
            db: self.db.clone(),
        }
    }

    fn relations(&self) -> DbRecipeRelationRepository {
        DbRecipeRelationRepository {
            db: self.db.clone(),
        }
    }

    async fn publish(&self, name: &str, ingredients: &[(i32, i32)]) -> Recipe {
        self.recipes()
            .create(&new_recipe(self.author.id, name, ingredients, &[self.tag.id]))
            .await
            .unwrap()
    }

    /// Stored `(ingredient_id, amount)` pairs of a recipe, sorted by id.
    async fn amounts(&self, recipe: &Recipe) -> Vec<(i32, i32)> {
        let details = self
            .recipes()
            .details(vec![recipe.clone()], None)
            .await
            .unwrap();
        let mut amounts: Vec<(i32, i32)> = details[0]
            .ingredients
            .iter()
            .map(|entry| (entry.ingredient.id, entry.amount))
            .collect();
        amounts.sort();
        amounts
    }
}

async fn add_user(db: &DatabaseConnection, username: &str) -> User {
    let user = User {
        id: Uuid::now_v7(),
        email: format!("{username}@example.com"),
        username: username.to_owned(),
        first_name: "Test".into(),
        last_name: "Cook".into(),
        role: 0,
        created_at: Utc::now(),
    };
    DbUserRepository { db: db.clone() }
        .create(&user)
        .await
        .unwrap();
    user
}

async fn add_ingredient(db: &DatabaseConnection, name: &str) -> Ingredient {
    let model = ingredients::ActiveModel {
        name: Set(name.to_owned()),
        measurement_unit: Set("g".into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
    Ingredient {
        id: model.id,
        name: model.name,
        measurement_unit: model.measurement_unit,
    }
}

fn amounts(pairs: &[(i32, i32)]) -> Vec<IngredientAmount> {
    pairs
        .iter()
        .map(|&(ingredient_id, amount)| IngredientAmount {
            ingredient_id,
            amount,
        })
        .collect()
}

fn new_recipe(author_id: Uuid, name: &str, ingredients: &[(i32, i32)], tag_ids: &[i32]) -> NewRecipe {
    NewRecipe {
        author_id,
        name: name.to_owned(),
        text: "Mix everything and cook.".into(),
        cooking_time: 15,
        image: "recipes/images/test.png".into(),
        ingredients: amounts(ingredients),
        tag_ids: tag_ids.to_vec(),
    }
}

fn changes(name: &str, ingredients: &[(i32, i32)], tag_ids: &[i32]) -> RecipeChanges {
    RecipeChanges {
        name: name.to_owned(),
        text: "Cook it differently.".into(),
        cooking_time: 20,
        image: None,
        ingredients: amounts(ingredients),
        tag_ids: tag_ids.to_vec(),
    }
}

#[tokio::test]
async fn should_sum_shared_ingredient_across_cart_recipes() {
    let Some(db) = connect().await else { return };
    let fx = Fixture::new(db).await;
    let buyer = add_user(&fx.db, &format!("buyer_{}", fx.run)).await;

    let soup = fx
        .publish("Soup", &[(fx.salt.id, 5), (fx.pepper.id, 1)])
        .await;
    let stew = fx.publish("Stew", &[(fx.salt.id, 3)]).await;
    // Published but never added to the cart.
    fx.publish("Brine", &[(fx.salt.id, 100)]).await;
    for recipe in [&soup, &stew] {
        assert!(
            fx.relations()
                .add(RecipeRelation::ShoppingCart, buyer.id, recipe.id)
                .await
                .unwrap()
        );
    }

    let file = DownloadShoppingListUseCase {
        users: DbUserRepository { db: fx.db.clone() },
        relations: fx.relations(),
    }
    .execute(buyer.id)
    .await
    .unwrap();
    assert_eq!(
        file.body,
        format!("Pepper {run} 1 g\nSalt {run} 8 g\n", run = fx.run)
    );
}

#[tokio::test]
async fn should_replace_associations_and_keep_them_when_replace_fails() {
    let Some(db) = connect().await else { return };
    let fx = Fixture::new(db).await;
    let recipe = fx
        .publish("Soup", &[(fx.salt.id, 5), (fx.pepper.id, 1)])
        .await;

    fx.recipes()
        .replace(recipe.id, &changes("Soup", &[(fx.pepper.id, 9)], &[fx.tag.id]))
        .await
        .unwrap();
    assert_eq!(fx.amounts(&recipe).await, vec![(fx.pepper.id, 9)]);

    // Tag 0 never exists, so the re-insert fails after the deletes ran.
    let failed = fx
        .recipes()
        .replace(recipe.id, &changes("Renamed", &[(fx.salt.id, 1)], &[0]))
        .await;
    assert!(matches!(failed, Err(RecipesServiceError::TagNotFound)));
    assert_eq!(fx.amounts(&recipe).await, vec![(fx.pepper.id, 9)]);
    let stored = fx.recipes().find_by_id(recipe.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Soup");
}

#[tokio::test]
async fn should_map_vanished_ingredient_to_not_found() {
    let Some(db) = connect().await else { return };
    let fx = Fixture::new(db).await;

    let result = fx
        .recipes()
        .create(&new_recipe(fx.author.id, "Ghost", &[(0, 1)], &[fx.tag.id]))
        .await;
    assert!(matches!(result, Err(RecipesServiceError::IngredientNotFound)));
    assert!(
        !fx.recipes()
            .name_taken(fx.author.id, "Ghost", None)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn should_map_unique_name_violation_to_conflict() {
    let Some(db) = connect().await else { return };
    let fx = Fixture::new(db).await;
    fx.publish("Soup", &[(fx.salt.id, 1)]).await;

    let duplicate = fx
        .recipes()
        .create(&new_recipe(fx.author.id, "Soup", &[(fx.salt.id, 2)], &[fx.tag.id]))
        .await;
    assert!(matches!(duplicate, Err(RecipesServiceError::RecipeAlreadyExists)));

    let stew = fx.publish("Stew", &[(fx.salt.id, 1)]).await;
    let renamed = fx
        .recipes()
        .replace(stew.id, &changes("Soup", &[(fx.salt.id, 1)], &[fx.tag.id]))
        .await;
    assert!(matches!(renamed, Err(RecipesServiceError::RecipeAlreadyExists)));
}

#[tokio::test]
async fn should_report_existing_and_dangling_relations() {
    let Some(db) = connect().await else { return };
    let fx = Fixture::new(db).await;
    let fan = add_user(&fx.db, &format!("fan_{}", fx.run)).await;
    let soup = fx.publish("Soup", &[(fx.salt.id, 1)]).await;

    let add = AddRecipeRelationUseCase {
        recipes: fx.recipes(),
        relations: fx.relations(),
    };
    add.execute(fan.id, RecipeRelation::ShoppingCart, soup.id)
        .await
        .unwrap();
    let again = add
        .execute(fan.id, RecipeRelation::ShoppingCart, soup.id)
        .await;
    assert!(matches!(again, Err(RecipesServiceError::AlreadyInShoppingCart)));

    assert!(
        !fx.relations()
            .remove(RecipeRelation::Favorite, fan.id, soup.id)
            .await
            .unwrap()
    );
    let dangling = fx
        .relations()
        .add(RecipeRelation::Favorite, fan.id, 0)
        .await;
    assert!(matches!(dangling, Err(RecipesServiceError::RecipeNotFound)));

    let follows = DbFollowRepository { db: fx.db.clone() };
    assert!(follows.add(fan.id, fx.author.id).await.unwrap());
    assert!(!follows.add(fan.id, fx.author.id).await.unwrap());
    let no_profile = follows.add(Uuid::now_v7(), fx.author.id).await;
    assert!(matches!(no_profile, Err(RecipesServiceError::UserNotFound)));
}
