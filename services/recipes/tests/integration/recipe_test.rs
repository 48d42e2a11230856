use foodgram_domain::pagination::PageRequest;
use foodgram_recipes::domain::types::Actor;
use foodgram_recipes::error::RecipesServiceError;
use foodgram_recipes::usecase::recipe::{
    CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeUseCase, ListRecipesInput,
    ListRecipesUseCase, UpdateRecipeUseCase,
};
use uuid::Uuid;

use crate::helpers::{MemoryStore, recipe_input};

fn create_uc(
    store: &MemoryStore,
) -> CreateRecipeUseCase<MemoryStore, MemoryStore, MemoryStore, MemoryStore, MemoryStore> {
    CreateRecipeUseCase {
        recipes: store.clone(),
        ingredients: store.clone(),
        tags: store.clone(),
        users: store.clone(),
        images: store.clone(),
    }
}

fn update_uc(store: &MemoryStore) -> UpdateRecipeUseCase<MemoryStore, MemoryStore, MemoryStore, MemoryStore> {
    UpdateRecipeUseCase {
        recipes: store.clone(),
        ingredients: store.clone(),
        tags: store.clone(),
        images: store.clone(),
    }
}

fn as_user(user_id: Uuid) -> Actor {
    Actor {
        user_id,
        is_admin: false,
    }
}

#[tokio::test]
async fn should_create_recipe_with_all_associations() {
    let store = MemoryStore::new();
    let author = store.add_user("chef");
    let flour = store.add_ingredient("Flour", "g");
    let milk = store.add_ingredient("Milk", "ml");
    let breakfast = store.add_tag("breakfast");

    let detail = create_uc(&store)
        .execute(
            author.id,
            recipe_input("Pancakes", &[(flour.id, 200), (milk.id, 300)], &[breakfast.id]),
        )
        .await
        .unwrap();

    assert_eq!(detail.recipe.name, "Pancakes");
    assert_eq!(detail.ingredients.len(), 2);
    assert_eq!(detail.tags.len(), 1);
    assert_eq!(detail.author.user.id, author.id);
    assert!(!detail.is_favorited);
    assert!(detail.recipe.image.ends_with(".png"));
    assert_eq!(store.data().images, vec![detail.recipe.image.clone()]);
}

#[tokio::test]
async fn should_reject_empty_ingredients_and_tags() {
    let store = MemoryStore::new();
    let author = store.add_user("chef");
    let flour = store.add_ingredient("Flour", "g");
    let tag = store.add_tag("lunch");

    let no_ingredients = create_uc(&store)
        .execute(author.id, recipe_input("Air", &[], &[tag.id]))
        .await;
    assert!(matches!(no_ingredients, Err(RecipesServiceError::EmptyIngredients)));

    let no_tags = create_uc(&store)
        .execute(author.id, recipe_input("Bread", &[(flour.id, 1)], &[]))
        .await;
    assert!(matches!(no_tags, Err(RecipesServiceError::EmptyTags)));
    assert!(store.data().recipes.is_empty());
}

#[tokio::test]
async fn should_reject_zero_amount_without_writing() {
    let store = MemoryStore::new();
    let author = store.add_user("chef");
    let salt = store.add_ingredient("Salt", "g");
    let tag = store.add_tag("lunch");

    let result = create_uc(&store)
        .execute(author.id, recipe_input("Salty", &[(salt.id, 0)], &[tag.id]))
        .await;

    assert!(matches!(result, Err(RecipesServiceError::InvalidAmount)));
    assert!(store.data().recipes.is_empty());
    assert!(store.data().images.is_empty(), "no image should be stored");
}

#[tokio::test]
async fn should_reject_duplicate_ingredient() {
    let store = MemoryStore::new();
    let author = store.add_user("chef");
    let salt = store.add_ingredient("Salt", "g");
    let tag = store.add_tag("lunch");

    let result = create_uc(&store)
        .execute(
            author.id,
            recipe_input("Salty", &[(salt.id, 1), (salt.id, 2)], &[tag.id]),
        )
        .await;
    assert!(matches!(result, Err(RecipesServiceError::DuplicateIngredient)));
}

#[tokio::test]
async fn should_return_not_found_for_unknown_ingredient_or_tag() {
    let store = MemoryStore::new();
    let author = store.add_user("chef");
    let salt = store.add_ingredient("Salt", "g");
    let tag = store.add_tag("lunch");

    let unknown_ingredient = create_uc(&store)
        .execute(author.id, recipe_input("A", &[(999, 1)], &[tag.id]))
        .await;
    assert!(matches!(
        unknown_ingredient,
        Err(RecipesServiceError::IngredientNotFound)
    ));

    let unknown_tag = create_uc(&store)
        .execute(author.id, recipe_input("B", &[(salt.id, 1)], &[999]))
        .await;
    assert!(matches!(unknown_tag, Err(RecipesServiceError::TagNotFound)));
}

#[tokio::test]
async fn should_require_image_on_create() {
    let store = MemoryStore::new();
    let author = store.add_user("chef");
    let salt = store.add_ingredient("Salt", "g");
    let tag = store.add_tag("lunch");

    let mut input = recipe_input("Plain", &[(salt.id, 1)], &[tag.id]);
    input.image = None;
    let result = create_uc(&store).execute(author.id, input).await;
    assert!(matches!(result, Err(RecipesServiceError::MissingImage)));
}

#[tokio::test]
async fn should_reject_second_recipe_with_same_name_for_author() {
    let store = MemoryStore::new();
    let author = store.add_user("chef");
    let other = store.add_user("rival");
    let salt = store.add_ingredient("Salt", "g");
    let tag = store.add_tag("lunch");
    let uc = create_uc(&store);

    uc.execute(author.id, recipe_input("Soup", &[(salt.id, 1)], &[tag.id]))
        .await
        .unwrap();
    let again = uc
        .execute(author.id, recipe_input("Soup", &[(salt.id, 2)], &[tag.id]))
        .await;
    assert!(matches!(again, Err(RecipesServiceError::RecipeAlreadyExists)));

    // The same name under another author is fine.
    assert!(
        uc.execute(other.id, recipe_input("Soup", &[(salt.id, 1)], &[tag.id]))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn should_require_profile_to_create_recipe() {
    let store = MemoryStore::new();
    let salt = store.add_ingredient("Salt", "g");
    let tag = store.add_tag("lunch");

    let result = create_uc(&store)
        .execute(Uuid::now_v7(), recipe_input("Soup", &[(salt.id, 1)], &[tag.id]))
        .await;
    assert!(matches!(result, Err(RecipesServiceError::UserNotFound)));
}

#[tokio::test]
async fn should_fully_replace_ingredients_on_update() {
    let store = MemoryStore::new();
    let author = store.add_user("chef");
    let flour = store.add_ingredient("Flour", "g");
    let milk = store.add_ingredient("Milk", "ml");
    let eggs = store.add_ingredient("Eggs", "pcs");
    let breakfast = store.add_tag("breakfast");
    let dinner = store.add_tag("dinner");

    let created = create_uc(&store)
        .execute(
            author.id,
            recipe_input("Pancakes", &[(flour.id, 200), (milk.id, 300)], &[breakfast.id]),
        )
        .await
        .unwrap();
    let original_image = created.recipe.image.clone();

    let mut input = recipe_input("Pancakes", &[(eggs.id, 2)], &[dinner.id]);
    input.image = None;
    let updated = update_uc(&store)
        .execute(as_user(author.id), created.recipe.id, input)
        .await
        .unwrap();

    assert_eq!(store.ingredient_ids_of(created.recipe.id), vec![(eggs.id, 2)]);
    assert_eq!(store.tag_ids_of(created.recipe.id), vec![dinner.id]);
    assert_eq!(updated.ingredients.len(), 1);
    assert_eq!(updated.recipe.image, original_image, "image kept when absent");
}

#[tokio::test]
async fn should_swap_image_and_discard_old_one() {
    let store = MemoryStore::new();
    let author = store.add_user("chef");
    let salt = store.add_ingredient("Salt", "g");
    let tag = store.add_tag("lunch");

    let created = create_uc(&store)
        .execute(author.id, recipe_input("Soup", &[(salt.id, 1)], &[tag.id]))
        .await
        .unwrap();
    let updated = update_uc(&store)
        .execute(
            as_user(author.id),
            created.recipe.id,
            recipe_input("Soup", &[(salt.id, 2)], &[tag.id]),
        )
        .await
        .unwrap();

    assert_ne!(updated.recipe.image, created.recipe.image);
    assert_eq!(store.data().images, vec![updated.recipe.image.clone()]);
}

#[tokio::test]
async fn should_forbid_update_by_other_user_but_allow_admin() {
    let store = MemoryStore::new();
    let author = store.add_user("chef");
    let salt = store.add_ingredient("Salt", "g");
    let tag = store.add_tag("lunch");

    let created = create_uc(&store)
        .execute(author.id, recipe_input("Soup", &[(salt.id, 1)], &[tag.id]))
        .await
        .unwrap();

    let stranger = update_uc(&store)
        .execute(
            as_user(Uuid::now_v7()),
            created.recipe.id,
            recipe_input("Hijacked", &[(salt.id, 1)], &[tag.id]),
        )
        .await;
    assert!(matches!(stranger, Err(RecipesServiceError::Forbidden)));

    let admin = Actor {
        user_id: Uuid::now_v7(),
        is_admin: true,
    };
    let moderated = update_uc(&store)
        .execute(
            admin,
            created.recipe.id,
            recipe_input("Moderated soup", &[(salt.id, 1)], &[tag.id]),
        )
        .await
        .unwrap();
    assert_eq!(moderated.recipe.name, "Moderated soup");
    assert_eq!(moderated.recipe.author_id, author.id);
}

#[tokio::test]
async fn should_return_not_found_when_updating_missing_recipe() {
    let store = MemoryStore::new();
    let salt = store.add_ingredient("Salt", "g");
    let tag = store.add_tag("lunch");
    let result = update_uc(&store)
        .execute(
            as_user(Uuid::now_v7()),
            7,
            recipe_input("Soup", &[(salt.id, 1)], &[tag.id]),
        )
        .await;
    assert!(matches!(result, Err(RecipesServiceError::RecipeNotFound)));
}

#[tokio::test]
async fn should_delete_recipe_with_relations_and_image() {
    let store = MemoryStore::new();
    let author = store.add_user("chef");
    let salt = store.add_ingredient("Salt", "g");
    let tag = store.add_tag("lunch");

    let created = create_uc(&store)
        .execute(author.id, recipe_input("Soup", &[(salt.id, 1)], &[tag.id]))
        .await
        .unwrap();
    store.data().favorites.insert((author.id, created.recipe.id));

    let uc = DeleteRecipeUseCase {
        recipes: store.clone(),
        images: store.clone(),
    };
    let forbidden = uc.execute(as_user(Uuid::now_v7()), created.recipe.id).await;
    assert!(matches!(forbidden, Err(RecipesServiceError::Forbidden)));

    uc.execute(as_user(author.id), created.recipe.id).await.unwrap();
    let data = store.data();
    assert!(data.recipes.is_empty());
    assert!(data.recipe_ingredients.is_empty());
    assert!(data.favorites.is_empty());
    assert!(data.images.is_empty());
}

#[tokio::test]
async fn should_show_viewer_flags_on_get() {
    let store = MemoryStore::new();
    let author = store.add_user("chef");
    let viewer = store.add_user("fan");
    let salt = store.add_ingredient("Salt", "g");
    let tag = store.add_tag("lunch");

    let created = create_uc(&store)
        .execute(author.id, recipe_input("Soup", &[(salt.id, 1)], &[tag.id]))
        .await
        .unwrap();
    {
        let mut data = store.data();
        data.favorites.insert((viewer.id, created.recipe.id));
        data.follows.push((viewer.id, author.id));
    }

    let uc = GetRecipeUseCase {
        repo: store.clone(),
    };
    let seen = uc.execute(created.recipe.id, Some(viewer.id)).await.unwrap();
    assert!(seen.is_favorited);
    assert!(!seen.is_in_shopping_cart);
    assert!(seen.author.is_subscribed);

    let anonymous = uc.execute(created.recipe.id, None).await.unwrap();
    assert!(!anonymous.is_favorited);
    assert!(!anonymous.author.is_subscribed);
}

#[tokio::test]
async fn should_filter_list_by_tag_and_favorites() {
    let store = MemoryStore::new();
    let author = store.add_user("chef");
    let viewer = store.add_user("fan");
    let salt = store.add_ingredient("Salt", "g");
    let breakfast = store.add_tag("breakfast");
    let dinner = store.add_tag("dinner");
    let uc = create_uc(&store);

    let eggs = uc
        .execute(author.id, recipe_input("Eggs", &[(salt.id, 1)], &[breakfast.id]))
        .await
        .unwrap();
    let stew = uc
        .execute(author.id, recipe_input("Stew", &[(salt.id, 2)], &[dinner.id]))
        .await
        .unwrap();
    store.data().favorites.insert((viewer.id, stew.recipe.id));

    let list = ListRecipesUseCase {
        repo: store.clone(),
    };

    let all = list
        .execute(ListRecipesInput::default(), None)
        .await
        .unwrap();
    assert_eq!(all.count, 2);
    assert_eq!(all.results[0].recipe.id, stew.recipe.id, "newest first");

    let by_tag = list
        .execute(
            ListRecipesInput {
                tags: vec!["breakfast".into()],
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(by_tag.count, 1);
    assert_eq!(by_tag.results[0].recipe.id, eggs.recipe.id);

    let favorited = list
        .execute(
            ListRecipesInput {
                only_favorited: true,
                ..Default::default()
            },
            Some(viewer.id),
        )
        .await
        .unwrap();
    assert_eq!(favorited.count, 1);
    assert!(favorited.results[0].is_favorited);

    // Anonymous viewers cannot narrow by relation flags.
    let anonymous = list
        .execute(
            ListRecipesInput {
                only_favorited: true,
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(anonymous.count, 2);

    let paged = list
        .execute(
            ListRecipesInput {
                page: PageRequest { limit: 1, page: 2 },
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(paged.count, 2);
    assert_eq!(paged.results.len(), 1);
    assert_eq!(paged.results[0].recipe.id, eggs.recipe.id);
}
