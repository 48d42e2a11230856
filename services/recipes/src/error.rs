use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Recipes service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum RecipesServiceError {
    // ── 404 ──
    #[error("recipe not found")]
    RecipeNotFound,
    #[error("ingredient not found")]
    IngredientNotFound,
    #[error("tag not found")]
    TagNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("recipe is not in favorites")]
    FavoriteNotFound,
    #[error("recipe is not in shopping cart")]
    ShoppingCartEntryNotFound,
    #[error("you are not subscribed to this user")]
    SubscriptionNotFound,

    // ── 409 ──
    #[error("recipe with this name already exists")]
    RecipeAlreadyExists,
    #[error("recipe is already in favorites")]
    AlreadyFavorited,
    #[error("recipe is already in shopping cart")]
    AlreadyInShoppingCart,
    #[error("you are already subscribed to this user")]
    AlreadySubscribed,
    #[error("user already exists")]
    UserAlreadyExists,

    // ── 400 ──
    #[error("you need at least one ingredient")]
    EmptyIngredients,
    #[error("you have to choose at least one tag")]
    EmptyTags,
    #[error("ingredients should be unique")]
    DuplicateIngredient,
    #[error("tags should be unique")]
    DuplicateTag,
    #[error("ingredient amount should be at least 1")]
    InvalidAmount,
    #[error("cooking time should be at least 1")]
    InvalidCookingTime,
    #[error("recipe name must be 1-200 characters")]
    InvalidRecipeName,
    #[error("recipe text must not be empty")]
    EmptyRecipeText,
    #[error("add a picture")]
    MissingImage,
    #[error("image must be base64-encoded")]
    InvalidImage,
    #[error("you can not follow yourself")]
    SelfFollow,
    #[error("shopping cart is empty")]
    EmptyShoppingCart,
    #[error("invalid profile")]
    InvalidProfile,
    #[error("missing data")]
    MissingData,

    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl RecipesServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RecipeNotFound => "RECIPE_NOT_FOUND",
            Self::IngredientNotFound => "INGREDIENT_NOT_FOUND",
            Self::TagNotFound => "TAG_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::FavoriteNotFound => "FAVORITE_NOT_FOUND",
            Self::ShoppingCartEntryNotFound => "SHOPPING_CART_ENTRY_NOT_FOUND",
            Self::SubscriptionNotFound => "SUBSCRIPTION_NOT_FOUND",
            Self::RecipeAlreadyExists => "RECIPE_ALREADY_EXISTS",
            Self::AlreadyFavorited => "ALREADY_FAVORITED",
            Self::AlreadyInShoppingCart => "ALREADY_IN_SHOPPING_CART",
            Self::AlreadySubscribed => "ALREADY_SUBSCRIBED",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::EmptyIngredients => "EMPTY_INGREDIENTS",
            Self::EmptyTags => "EMPTY_TAGS",
            Self::DuplicateIngredient => "DUPLICATE_INGREDIENT",
            Self::DuplicateTag => "DUPLICATE_TAG",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::InvalidCookingTime => "INVALID_COOKING_TIME",
            Self::InvalidRecipeName => "INVALID_RECIPE_NAME",
            Self::EmptyRecipeText => "EMPTY_RECIPE_TEXT",
            Self::MissingImage => "MISSING_IMAGE",
            Self::InvalidImage => "INVALID_IMAGE",
            Self::SelfFollow => "SELF_FOLLOW",
            Self::EmptyShoppingCart => "EMPTY_SHOPPING_CART",
            Self::InvalidProfile => "INVALID_PROFILE",
            Self::MissingData => "MISSING_DATA",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::RecipeNotFound
            | Self::IngredientNotFound
            | Self::TagNotFound
            | Self::UserNotFound
            | Self::FavoriteNotFound
            | Self::ShoppingCartEntryNotFound
            | Self::SubscriptionNotFound => StatusCode::NOT_FOUND,
            Self::RecipeAlreadyExists
            | Self::AlreadyFavorited
            | Self::AlreadyInShoppingCart
            | Self::AlreadySubscribed
            | Self::UserAlreadyExists => StatusCode::CONFLICT,
            Self::EmptyIngredients
            | Self::EmptyTags
            | Self::DuplicateIngredient
            | Self::DuplicateTag
            | Self::InvalidAmount
            | Self::InvalidCookingTime
            | Self::InvalidRecipeName
            | Self::EmptyRecipeText
            | Self::MissingImage
            | Self::InvalidImage
            | Self::SelfFollow
            | Self::EmptyShoppingCart
            | Self::InvalidProfile
            | Self::MissingData => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RecipesServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 4xx are expected client errors and already recorded by TraceLayer.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
