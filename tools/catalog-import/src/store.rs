use anyhow::{Context, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};

use foodgram_recipes_schema::{ingredients, tags};

use crate::rows::{IngredientRow, TagRow};

/// Rows per INSERT statement.
const CHUNK_SIZE: usize = 500;

/// Insert rows whose (name, measurement_unit) is new. Returns the number inserted.
pub async fn insert_ingredients(db: &DatabaseConnection, rows: Vec<IngredientRow>) -> Result<u64> {
    let mut inserted = 0;
    for chunk in rows.chunks(CHUNK_SIZE) {
        let models = chunk.iter().map(|row| ingredients::ActiveModel {
            name: Set(row.name.clone()),
            measurement_unit: Set(row.measurement_unit.clone()),
            ..Default::default()
        });
        inserted += ingredients::Entity::insert_many(models)
            .on_conflict(
                OnConflict::columns([
                    ingredients::Column::Name,
                    ingredients::Column::MeasurementUnit,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(db)
            .await
            .context("failed to insert ingredients")?;
    }
    Ok(inserted)
}

/// Insert tags; rows clashing with an existing name or slug are skipped.
pub async fn insert_tags(db: &DatabaseConnection, rows: Vec<TagRow>) -> Result<u64> {
    let mut inserted = 0;
    for chunk in rows.chunks(CHUNK_SIZE) {
        let models = chunk.iter().map(|row| tags::ActiveModel {
            name: Set(row.name.clone()),
            color: Set(row.color.clone()),
            slug: Set(row.slug.clone()),
            ..Default::default()
        });
        inserted += tags::Entity::insert_many(models)
            .on_conflict(OnConflict::new().do_nothing().to_owned())
            .exec_without_returning(db)
            .await
            .context("failed to insert tags")?;
    }
    Ok(inserted)
}
