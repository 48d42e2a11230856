//! Validation rules of the recipe create/replace transaction.
//!
//! Checks run in a fixed order so the first failing rule decides the error:
//! non-empty associations, scalar fields, ingredients entry by entry
//! (exists, not repeated, amount ≥ 1), then tags (distinct, exist).

use std::collections::HashSet;

use crate::domain::types::IngredientAmount;
use crate::error::RecipesServiceError;

pub const MAX_NAME_LEN: usize = 200;

/// Both association lists must be non-empty.
pub fn check_associations_present(
    ingredients: &[IngredientAmount],
    tag_ids: &[i32],
) -> Result<(), RecipesServiceError> {
    if ingredients.is_empty() {
        return Err(RecipesServiceError::EmptyIngredients);
    }
    if tag_ids.is_empty() {
        return Err(RecipesServiceError::EmptyTags);
    }
    Ok(())
}

pub fn check_fields(name: &str, text: &str, cooking_time: i32) -> Result<(), RecipesServiceError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(RecipesServiceError::InvalidRecipeName);
    }
    if text.trim().is_empty() {
        return Err(RecipesServiceError::EmptyRecipeText);
    }
    if cooking_time < 1 {
        return Err(RecipesServiceError::InvalidCookingTime);
    }
    Ok(())
}

/// Check each requested ingredient against the ids that exist in the catalog.
pub fn check_ingredients(
    ingredients: &[IngredientAmount],
    known_ids: &HashSet<i32>,
) -> Result<(), RecipesServiceError> {
    let mut seen = HashSet::with_capacity(ingredients.len());
    for entry in ingredients {
        if !known_ids.contains(&entry.ingredient_id) {
            return Err(RecipesServiceError::IngredientNotFound);
        }
        if !seen.insert(entry.ingredient_id) {
            return Err(RecipesServiceError::DuplicateIngredient);
        }
        if entry.amount < 1 {
            return Err(RecipesServiceError::InvalidAmount);
        }
    }
    Ok(())
}

/// Tag ids must be pairwise distinct and all exist.
pub fn check_tags(tag_ids: &[i32], known_ids: &HashSet<i32>) -> Result<(), RecipesServiceError> {
    let distinct: HashSet<i32> = tag_ids.iter().copied().collect();
    if distinct.len() != tag_ids.len() {
        return Err(RecipesServiceError::DuplicateTag);
    }
    if !distinct.is_subset(known_ids) {
        return Err(RecipesServiceError::TagNotFound);
    }
    Ok(())
}
