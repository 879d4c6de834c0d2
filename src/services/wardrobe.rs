use sqlx::PgPool;

use crate::{
    error::{AppError, AppResult},
    models::ClothingItem,
};

/// Read access to a user's clothing items
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WardrobeStore: Send + Sync {
    /// Every item the user owns, in storage order
    async fn items_for_user(&self, user_id: i64) -> AppResult<Vec<ClothingItem>>;
}

/// Postgres-backed wardrobe
#[derive(Clone)]
pub struct PgWardrobeStore {
    db_pool: PgPool,
}

/// Raw `clothing_items` row; enums come back as text
#[derive(Debug, sqlx::FromRow)]
struct ClothingItemRow {
    id: i32,
    name: String,
    filename: String,
    category: String,
    season: String,
    red: Option<i32>,
    green: Option<i32>,
    blue: Option<i32>,
    is_favorite: bool,
}

/// Out-of-range channels are treated as unknown
fn channel(value: Option<i32>) -> Option<u8> {
    value.and_then(|v| u8::try_from(v).ok())
}

impl TryFrom<ClothingItemRow> for ClothingItem {
    type Error = String;

    fn try_from(row: ClothingItemRow) -> Result<Self, Self::Error> {
        Ok(ClothingItem {
            id: i64::from(row.id),
            name: row.name,
            filename: row.filename,
            category: row.category.parse()?,
            season: row.season.parse()?,
            red: channel(row.red),
            green: channel(row.green),
            blue: channel(row.blue),
            is_favorite: row.is_favorite,
        })
    }
}

impl PgWardrobeStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait::async_trait]
impl WardrobeStore for PgWardrobeStore {
    async fn items_for_user(&self, user_id: i64) -> AppResult<Vec<ClothingItem>> {
        let owner_id = i32::try_from(user_id)
            .map_err(|_| AppError::InvalidInput(format!("Invalid user id: {}", user_id)))?;

        let rows: Vec<ClothingItemRow> = sqlx::query_as(
            r#"
            SELECT id, name, filename, category::text AS category, season::text AS season,
                   red, green, blue, is_favorite
            FROM clothing_items
            WHERE owner_id = $1
            ORDER BY id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db_pool)
        .await?;

        let total = rows.len();
        let items: Vec<ClothingItem> = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id;
                match ClothingItem::try_from(row) {
                    Ok(item) => Some(item),
                    Err(e) => {
                        tracing::warn!(item_id = id, error = %e, "Skipping clothing item");
                        None
                    }
                }
            })
            .collect();

        tracing::debug!(user_id, total, usable = items.len(), "Loaded wardrobe");

        Ok(items)
    }
}
