use foodgram_domain::pagination::PageRequest;
use foodgram_recipes::domain::types::RecipeRelation;
use foodgram_recipes::error::RecipesServiceError;
use foodgram_recipes::usecase::recipe::{CreateRecipeUseCase, GetRecipeUseCase};
use foodgram_recipes::usecase::relation::{
    AddRecipeRelationUseCase, ListSubscriptionsUseCase, RemoveRecipeRelationUseCase,
    SubscribeUseCase, UnsubscribeUseCase,
};
use uuid::Uuid;

use crate::helpers::{MemoryStore, recipe_input};

async fn publish(store: &MemoryStore, author: Uuid, names: &[&str]) -> Vec<i32> {
    let salt = store.add_ingredient("Salt", "g");
    let tag = store.add_tag("dinner");
    let uc = CreateRecipeUseCase {
        recipes: store.clone(),
        ingredients: store.clone(),
        tags: store.clone(),
        users: store.clone(),
        images: store.clone(),
    };
    let mut ids = Vec::new();
    for name in names {
        let detail = uc
            .execute(author, recipe_input(name, &[(salt.id, 1)], &[tag.id]))
            .await
            .unwrap();
        ids.push(detail.recipe.id);
    }
    ids
}

#[tokio::test]
async fn should_favorite_once_and_reflect_in_detail() {
    let store = MemoryStore::new();
    let author = store.add_user("chef");
    let fan = store.add_user("fan");
    let ids = publish(&store, author.id, &["Soup"]).await;

    let add = AddRecipeRelationUseCase {
        recipes: store.clone(),
        relations: store.clone(),
    };
    let linked = add
        .execute(fan.id, RecipeRelation::Favorite, ids[0])
        .await
        .unwrap();
    assert_eq!(linked.name, "Soup");

    let again = add.execute(fan.id, RecipeRelation::Favorite, ids[0]).await;
    assert!(matches!(again, Err(RecipesServiceError::AlreadyFavorited)));

    let detail = GetRecipeUseCase {
        repo: store.clone(),
    }
    .execute(ids[0], Some(fan.id))
    .await
    .unwrap();
    assert!(detail.is_favorited);
    assert!(!detail.is_in_shopping_cart);
}

#[tokio::test]
async fn should_keep_favorites_and_cart_independent() {
    let store = MemoryStore::new();
    let author = store.add_user("chef");
    let fan = store.add_user("fan");
    let ids = publish(&store, author.id, &["Soup"]).await;

    let add = AddRecipeRelationUseCase {
        recipes: store.clone(),
        relations: store.clone(),
    };
    add.execute(fan.id, RecipeRelation::ShoppingCart, ids[0])
        .await
        .unwrap();

    let remove = RemoveRecipeRelationUseCase {
        recipes: store.clone(),
        relations: store.clone(),
    };
    let missing = remove
        .execute(fan.id, RecipeRelation::Favorite, ids[0])
        .await;
    assert!(matches!(missing, Err(RecipesServiceError::FavoriteNotFound)));

    remove
        .execute(fan.id, RecipeRelation::ShoppingCart, ids[0])
        .await
        .unwrap();
    let twice = remove
        .execute(fan.id, RecipeRelation::ShoppingCart, ids[0])
        .await;
    assert!(matches!(
        twice,
        Err(RecipesServiceError::ShoppingCartEntryNotFound)
    ));
}

#[tokio::test]
async fn should_return_not_found_for_relation_on_missing_recipe() {
    let store = MemoryStore::new();
    let fan = store.add_user("fan");
    let add = AddRecipeRelationUseCase {
        recipes: store.clone(),
        relations: store.clone(),
    };
    let result = add.execute(fan.id, RecipeRelation::Favorite, 42).await;
    assert!(matches!(result, Err(RecipesServiceError::RecipeNotFound)));
    assert!(store.data().favorites.is_empty());
}

#[tokio::test]
async fn should_list_subscriptions_with_limited_preview() {
    let store = MemoryStore::new();
    let author = store.add_user("chef");
    let fan = store.add_user("fan");
    publish(&store, author.id, &["Soup", "Stew", "Pie"]).await;

    let subscribe = SubscribeUseCase {
        users: store.clone(),
        follows: store.clone(),
        recipes: store.clone(),
    };
    let subscription = subscribe.execute(fan.id, author.id, Some(2)).await.unwrap();
    assert_eq!(subscription.author.id, author.id);
    assert_eq!(subscription.recipes_count, 3);
    assert_eq!(subscription.recipes.len(), 2);
    assert_eq!(subscription.recipes[0].name, "Pie", "newest first");

    let list = ListSubscriptionsUseCase {
        follows: store.clone(),
        recipes: store.clone(),
    };
    let page = list
        .execute(fan.id, PageRequest::default(), None)
        .await
        .unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.results[0].recipes.len(), 3);

    let none_for_author = list
        .execute(author.id, PageRequest::default(), Some(1))
        .await
        .unwrap();
    assert_eq!(none_for_author.count, 0);
}

#[tokio::test]
async fn should_reject_self_and_duplicate_subscriptions() {
    let store = MemoryStore::new();
    let author = store.add_user("chef");
    let fan = store.add_user("fan");
    let subscribe = SubscribeUseCase {
        users: store.clone(),
        follows: store.clone(),
        recipes: store.clone(),
    };

    let own = subscribe.execute(fan.id, fan.id, None).await;
    assert!(matches!(own, Err(RecipesServiceError::SelfFollow)));

    subscribe.execute(fan.id, author.id, None).await.unwrap();
    let again = subscribe.execute(fan.id, author.id, None).await;
    assert!(matches!(again, Err(RecipesServiceError::AlreadySubscribed)));

    let ghost = subscribe.execute(fan.id, Uuid::now_v7(), None).await;
    assert!(matches!(ghost, Err(RecipesServiceError::UserNotFound)));
}

#[tokio::test]
async fn should_unsubscribe_only_existing_follow() {
    let store = MemoryStore::new();
    let author = store.add_user("chef");
    let fan = store.add_user("fan");
    store.data().follows.push((fan.id, author.id));

    let unsubscribe = UnsubscribeUseCase {
        users: store.clone(),
        follows: store.clone(),
    };
    unsubscribe.execute(fan.id, author.id).await.unwrap();
    assert!(store.data().follows.is_empty());

    let again = unsubscribe.execute(fan.id, author.id).await;
    assert!(matches!(again, Err(RecipesServiceError::SubscriptionNotFound)));
}
