use uuid::Uuid;

use crate::domain::repository::{RecipeRelationRepository, UserRepository};
use crate::domain::shopping_list::ShoppingList;
use crate::error::RecipesServiceError;

/// Rendered shopping list ready to be sent as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListFile {
    pub filename: String,
    pub body: String,
}

// ── DownloadShoppingList ─────────────────────────────────────────────────────

pub struct DownloadShoppingListUseCase<U: UserRepository, L: RecipeRelationRepository> {
    pub users: U,
    pub relations: L,
}

impl<U: UserRepository, L: RecipeRelationRepository> DownloadShoppingListUseCase<U, L> {
    pub async fn execute(&self, user_id: Uuid) -> Result<ShoppingListFile, RecipesServiceError> {
        let lines = self.relations.cart_ingredients(user_id).await?;
        let list = ShoppingList::from_lines(lines);
        if list.is_empty() {
            return Err(RecipesServiceError::EmptyShoppingCart);
        }
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(RecipesServiceError::UserNotFound)?;
        Ok(ShoppingListFile {
            filename: format!("{}_shopping_list.pdf", user.username),
            body: list.render(),
        })
    }
}
