//! Menu catalog business logic - categories and menu items.
//!
//! Provides CRUD for categories and menu items plus the typed catalog view served
//! to customers. Deletions that touch other tables run inside one database
//! transaction:
//! - deleting a category detaches its items (`category_id` becomes NULL);
//! - deleting a menu item detaches the order items that reference it. Orders and
//!   payments are never removed; each order item keeps its name and price snapshot.

use crate::{
    core::money::{normalize, parse_price},
    entities::{Category, MenuItem, OrderItem, category, menu_item, order_item},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{info, instrument};

/// A menu item together with its category, if it has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemWithCategory {
    /// The menu item
    pub item: menu_item::Model,
    /// The category it is listed under
    pub category: Option<category::Model>,
}

/// What customers see: all categories and every available item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MenuCatalog {
    /// All categories, alphabetical
    pub categories: Vec<category::Model>,
    /// Available items, alphabetical, with their category
    pub items: Vec<MenuItemWithCategory>,
}

impl MenuCatalog {
    /// Finds an item by case-insensitive name.
    #[must_use]
    pub fn find_item(&self, name: &str) -> Option<&MenuItemWithCategory> {
        self.items
            .iter()
            .find(|entry| entry.item.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Items listed under no category.
    pub fn uncategorized(&self) -> impl Iterator<Item = &MenuItemWithCategory> {
        self.items.iter().filter(|entry| entry.category.is_none())
    }
}

/// Input for [`create_menu_item`]. The price is the raw text typed by staff.
#[derive(Debug, Clone, Default)]
pub struct NewMenuItem {
    /// Item name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Price text, parsed with [`parse_price`]
    pub price: String,
    /// Category to list the item under
    pub category_id: Option<i64>,
    /// Opaque image URL
    pub image_url: Option<String>,
    /// Preparation time in minutes
    pub preparation_time: Option<i32>,
    /// Whether the item can be ordered right away
    pub is_available: bool,
}

/// Partial update for [`update_menu_item`]; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct MenuItemUpdate {
    /// New name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New price text
    pub price: Option<String>,
    /// New category (`Some(None)` removes the category)
    pub category_id: Option<Option<i64>>,
    /// New image URL
    pub image_url: Option<String>,
    /// New preparation time
    pub preparation_time: Option<i32>,
    /// New availability
    pub is_available: Option<bool>,
}

fn required_name(name: &str, what: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{what} name cannot be empty")));
    }
    Ok(trimmed.to_string())
}

fn validate_preparation_time(minutes: Option<i32>) -> Result<()> {
    match minutes {
        Some(m) if m < 0 => Err(Error::validation(
            "Preparation time cannot be negative",
        )),
        _ => Ok(()),
    }
}

// --- Categories ---

/// Creates a category. The name is trimmed and must not be empty.
pub async fn create_category(
    db: &DatabaseConnection,
    name: String,
    description: Option<String>,
) -> Result<category::Model> {
    let name = required_name(&name, "Category")?;

    let category = category::ActiveModel {
        name: Set(name),
        description: Set(description),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    category.insert(db).await.map_err(Into::into)
}

/// Lists all categories alphabetically.
pub async fn list_categories<C>(db: &C) -> Result<Vec<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find()
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by exact name.
pub async fn get_category_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<category::Model>> {
    Category::find()
        .filter(category::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Deletes a category after detaching its menu items.
///
/// Returns the number of menu items that lost their category.
#[instrument(skip(db))]
pub async fn delete_category(db: &DatabaseConnection, category_id: i64) -> Result<u64> {
    let txn = db.begin().await?;

    Category::find_by_id(category_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            id: category_id.to_string(),
        })?;

    let detached = MenuItem::update_many()
        .col_expr(
            menu_item::Column::CategoryId,
            Expr::value(Option::<i64>::None),
        )
        .filter(menu_item::Column::CategoryId.eq(category_id))
        .exec(&txn)
        .await?
        .rows_affected;

    Category::delete_by_id(category_id).exec(&txn).await?;
    txn.commit().await?;

    info!(category_id, detached, "Category deleted");
    Ok(detached)
}

// --- Menu items ---

/// Creates a menu item after validating the name, price and category.
pub async fn create_menu_item(
    db: &DatabaseConnection,
    new_item: NewMenuItem,
) -> Result<menu_item::Model> {
    let name = required_name(&new_item.name, "Menu item")?;
    let price = parse_price(&new_item.price)?;
    validate_preparation_time(new_item.preparation_time)?;

    if let Some(category_id) = new_item.category_id {
        Category::find_by_id(category_id)
            .one(db)
            .await?
            .ok_or_else(|| Error::CategoryNotFound {
                id: category_id.to_string(),
            })?;
    }

    let item = menu_item::ActiveModel {
        name: Set(name),
        description: Set(new_item.description),
        price: Set(price),
        image_url: Set(new_item.image_url),
        category_id: Set(new_item.category_id),
        is_available: Set(new_item.is_available),
        preparation_time: Set(new_item.preparation_time),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    item.insert(db).await.map_err(Into::into)
}

/// Applies a partial update to a menu item. A new price is re-validated and
/// normalized like on creation.
pub async fn update_menu_item(
    db: &DatabaseConnection,
    menu_item_id: i64,
    update: MenuItemUpdate,
) -> Result<menu_item::Model> {
    // Validate everything before touching the row
    let name = update
        .name
        .as_deref()
        .map(|n| required_name(n, "Menu item"))
        .transpose()?;
    let price = update.price.as_deref().map(parse_price).transpose()?;
    validate_preparation_time(update.preparation_time)?;

    let existing = MenuItem::find_by_id(menu_item_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::MenuItemNotFound {
            id: menu_item_id.to_string(),
        })?;

    if let Some(Some(category_id)) = update.category_id {
        Category::find_by_id(category_id)
            .one(db)
            .await?
            .ok_or_else(|| Error::CategoryNotFound {
                id: category_id.to_string(),
            })?;
    }

    let mut active: menu_item::ActiveModel = existing.into();
    if let Some(name) = name {
        active.name = Set(name);
    }
    if let Some(description) = update.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = price {
        active.price = Set(normalize(price));
    }
    if let Some(category_id) = update.category_id {
        active.category_id = Set(category_id);
    }
    if let Some(image_url) = update.image_url {
        active.image_url = Set(Some(image_url));
    }
    if let Some(minutes) = update.preparation_time {
        active.preparation_time = Set(Some(minutes));
    }
    if let Some(is_available) = update.is_available {
        active.is_available = Set(is_available);
    }

    active.update(db).await.map_err(Into::into)
}

/// Marks a menu item as available or unavailable.
pub async fn set_availability(
    db: &DatabaseConnection,
    menu_item_id: i64,
    is_available: bool,
) -> Result<menu_item::Model> {
    update_menu_item(
        db,
        menu_item_id,
        MenuItemUpdate {
            is_available: Some(is_available),
            ..Default::default()
        },
    )
    .await
}

/// Finds a menu item by its ID.
pub async fn get_menu_item(
    db: &DatabaseConnection,
    menu_item_id: i64,
) -> Result<Option<menu_item::Model>> {
    MenuItem::find_by_id(menu_item_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a menu item by exact name.
pub async fn get_menu_item_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<menu_item::Model>> {
    MenuItem::find()
        .filter(menu_item::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

fn to_with_category(
    rows: Vec<(menu_item::Model, Option<category::Model>)>,
) -> Vec<MenuItemWithCategory> {
    rows.into_iter()
        .map(|(item, category)| MenuItemWithCategory { item, category })
        .collect()
}

/// Lists every menu item (available or not), newest first, for staff screens.
pub async fn list_menu_items(db: &DatabaseConnection) -> Result<Vec<MenuItemWithCategory>> {
    let rows = MenuItem::find()
        .find_also_related(Category)
        .order_by_desc(menu_item::Column::CreatedAt)
        .order_by_desc(menu_item::Column::Id)
        .all(db)
        .await?;
    Ok(to_with_category(rows))
}

/// Loads the customer-facing catalog straight from the database.
///
/// Most callers should go through [`crate::cache::CatalogCache`] instead.
pub async fn load_catalog<C>(db: &C) -> Result<MenuCatalog>
where
    C: ConnectionTrait,
{
    let categories = list_categories(db).await?;
    let rows = MenuItem::find()
        .filter(menu_item::Column::IsAvailable.eq(true))
        .find_also_related(Category)
        .order_by_asc(menu_item::Column::Name)
        .all(db)
        .await?;

    Ok(MenuCatalog {
        categories,
        items: to_with_category(rows),
    })
}

/// Deletes a menu item without touching order history.
///
/// Order items that referenced it keep their name and price snapshot but lose the
/// reference. Returns the number of order items detached.
#[instrument(skip(db))]
pub async fn delete_menu_item(db: &DatabaseConnection, menu_item_id: i64) -> Result<u64> {
    let txn = db.begin().await?;

    MenuItem::find_by_id(menu_item_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::MenuItemNotFound {
            id: menu_item_id.to_string(),
        })?;

    let detached = OrderItem::update_many()
        .col_expr(
            order_item::Column::MenuItemId,
            Expr::value(Option::<i64>::None),
        )
        .filter(order_item::Column::MenuItemId.eq(menu_item_id))
        .exec(&txn)
        .await?
        .rows_affected;

    MenuItem::delete_by_id(menu_item_id).exec(&txn).await?;
    txn.commit().await?;

    info!(menu_item_id, detached, "Menu item deleted");
    Ok(detached)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::order;
    use crate::test_utils::*;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_menu_item_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        // Empty name
        let result = create_menu_item(
            &db,
            NewMenuItem {
                name: "  ".to_string(),
                price: "1000".to_string(),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        // Bad price
        let result = create_menu_item(
            &db,
            NewMenuItem {
                name: "Kopi".to_string(),
                price: "-1000".to_string(),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidPrice { .. }));

        // Negative preparation time
        let result = create_menu_item(
            &db,
            NewMenuItem {
                name: "Kopi".to_string(),
                price: "1000".to_string(),
                preparation_time: Some(-5),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_menu_item_normalizes_price() -> Result<()> {
        let db = setup_test_db().await?;

        let item = create_menu_item(
            &db,
            NewMenuItem {
                name: " Kopi Hitam ".to_string(),
                price: "Rp 10,000".to_string(),
                is_available: true,
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(item.name, "Kopi Hitam");
        assert_eq!(item.price, Decimal::from(10_000));
        assert!(item.category_id.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_menu_item_unknown_category() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_menu_item(
            &db,
            NewMenuItem {
                name: "Kopi".to_string(),
                price: "1000".to_string(),
                category_id: Some(999),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::CategoryNotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_menu_item_partial() -> Result<()> {
        let db = setup_test_db().await?;
        let drinks = create_test_category(&db, "Drinks").await?;
        let item = create_test_menu_item(&db, "Es Teh", 5_000).await?;

        let updated = update_menu_item(
            &db,
            item.id,
            MenuItemUpdate {
                price: Some("6000".to_string()),
                category_id: Some(Some(drinks.id)),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(updated.name, "Es Teh");
        assert_eq!(updated.price, Decimal::from(6_000));
        assert_eq!(updated.category_id, Some(drinks.id));

        // Removing the category again
        let updated = update_menu_item(
            &db,
            item.id,
            MenuItemUpdate {
                category_id: Some(None),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.category_id, None);

        let missing = update_menu_item(&db, 999, MenuItemUpdate::default()).await;
        assert!(matches!(missing.unwrap_err(), Error::MenuItemNotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_catalog_only_lists_available_items() -> Result<()> {
        let db = setup_test_db().await?;
        let food = create_test_category(&db, "Food").await?;
        let nasi = create_categorized_menu_item(&db, "Nasi Goreng", 25_000, food.id).await?;
        let ayam = create_test_menu_item(&db, "Ayam Bakar", 30_000).await?;
        set_availability(&db, ayam.id, false).await?;

        let catalog = load_catalog(&db).await?;
        assert_eq!(catalog.categories.len(), 1);
        assert_eq!(catalog.items.len(), 1);
        assert_eq!(catalog.items[0].item.id, nasi.id);
        assert_eq!(catalog.items[0].category.as_ref().unwrap().name, "Food");
        assert!(catalog.find_item("nasi goreng").is_some());
        assert!(catalog.find_item("Ayam Bakar").is_none());

        // Staff listing still shows both
        assert_eq!(list_menu_items(&db).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_category_detaches_items() -> Result<()> {
        let db = setup_test_db().await?;
        let food = create_test_category(&db, "Food").await?;
        let nasi = create_categorized_menu_item(&db, "Nasi Goreng", 25_000, food.id).await?;

        let detached = delete_category(&db, food.id).await?;
        assert_eq!(detached, 1);

        let nasi = get_menu_item(&db, nasi.id).await?.unwrap();
        assert_eq!(nasi.category_id, None);
        assert!(list_categories(&db).await?.is_empty());

        let missing = delete_category(&db, food.id).await;
        assert!(matches!(missing.unwrap_err(), Error::CategoryNotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_menu_item_keeps_order_history() -> Result<()> {
        let db = setup_test_db().await?;
        let nasi = create_test_menu_item(&db, "Nasi Goreng", 25_000).await?;
        let teh = create_test_menu_item(&db, "Es Teh", 5_000).await?;
        let placed = place_test_order(&db, &[(nasi.id, 1, 25_000), (teh.id, 2, 5_000)]).await?;

        let detached = delete_menu_item(&db, nasi.id).await?;
        assert_eq!(detached, 1);

        // No order item references the deleted menu item
        let referencing = OrderItem::find()
            .filter(order_item::Column::MenuItemId.eq(nasi.id))
            .count(&db)
            .await?;
        assert_eq!(referencing, 0);

        // The order and both lines survive with their snapshots
        let order = order::get_order(&db, placed.id).await?.unwrap();
        assert_eq!(order.items.len(), 2);
        let line = order.items.iter().find(|i| i.item_name == "Nasi Goreng").unwrap();
        assert_eq!(line.menu_item_id, None);
        assert_eq!(line.price, Decimal::from(25_000));
        assert_eq!(order.order.total_amount, Decimal::from(35_000));

        assert!(get_menu_item(&db, nasi.id).await?.is_none());
        Ok(())
    }
}
