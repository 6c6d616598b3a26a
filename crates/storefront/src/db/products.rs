//! Product repository for database operations.

use sqlx::{SqliteConnection, SqlitePool};

use smart_gadgets_core::{Price, ProductId};

use super::RepositoryError;
use crate::models::product::{NO_IMAGE, NewProduct, Product};

const PRODUCT_COLUMNS: &str = "id, name, price_cents, description, category, stock, image";

/// Database row for the `product` table.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    price_cents: i64,
    description: String,
    category: String,
    stock: i64,
    image: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::from_cents(row.price_cents).map_err(|e| {
            RepositoryError::DataCorruption(format!("product {}: {e}", row.id))
        })?;
        let stock = u32::try_from(row.stock).map_err(|_| {
            RepositoryError::DataCorruption(format!("product {}: invalid stock {}", row.id, row.stock))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            price,
            description: row.description,
            category: row.category,
            stock,
            image: row.image,
        })
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List every product, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        find_in(&mut conn, id).await
    }

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        insert_in(&mut conn, product).await
    }

    /// Replace a product's fields. The image is kept unless a new one is given.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        product: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            UPDATE product
            SET name = ?, price_cents = ?, description = ?, category = ?, stock = ?,
                image = COALESCE(?, image)
            WHERE id = ?
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&product.name)
        .bind(product.price.cents())
        .bind(&product.description)
        .bind(&product.category)
        .bind(i64::from(product.stock))
        .bind(product.image.as_deref())
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Product::try_from(row)
    }

    /// Delete a product. Order items that reference it keep their captured data.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// Look up a product on a specific connection (e.g. inside a transaction).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_in(
    conn: &mut SqliteConnection,
    id: ProductId,
) -> Result<Option<Product>, RepositoryError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;

    row.map(Product::try_from).transpose()
}

/// Insert a product on an existing connection or transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert_in(
    conn: &mut SqliteConnection,
    product: &NewProduct,
) -> Result<Product, RepositoryError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        r"
        INSERT INTO product (name, price_cents, description, category, stock, image)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING {PRODUCT_COLUMNS}
        "
    ))
    .bind(&product.name)
    .bind(product.price.cents())
    .bind(&product.description)
    .bind(&product.category)
    .bind(i64::from(product.stock))
    .bind(product.image.as_deref().unwrap_or(NO_IMAGE))
    .fetch_one(conn)
    .await?;

    Product::try_from(row)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn draft(name: &str, price: &str) -> NewProduct {
        NewProduct {
            name: name.to_owned(),
            price: Price::parse(price).unwrap(),
            description: "desc".to_owned(),
            category: "phones".to_owned(),
            stock: 3,
            image: None,
        }
    }

    #[tokio::test]
    async fn test_create_defaults_image() {
        let pool = test_pool().await;
        let products = ProductRepository::new(&pool);

        let created = products.create(&draft("Phone", "199.99")).await.unwrap();
        assert_eq!(created.image, NO_IMAGE);
        assert_eq!(created.price.cents(), 19999);
        assert_eq!(created.stock, 3);

        let fetched = products.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_list_all_in_insertion_order() {
        let pool = test_pool().await;
        let products = ProductRepository::new(&pool);

        products.create(&draft("A", "1")).await.unwrap();
        products.create(&draft("B", "2")).await.unwrap();

        let names: Vec<_> = products
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_update_keeps_image_without_upload() {
        let pool = test_pool().await;
        let products = ProductRepository::new(&pool);

        let mut with_image = draft("Tablet", "300");
        with_image.image = Some("tablet.png".to_owned());
        let created = products.create(&with_image).await.unwrap();

        let updated = products
            .update(created.id, &draft("Tablet Pro", "350"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Tablet Pro");
        assert_eq!(updated.price.cents(), 35000);
        assert_eq!(updated.image, "tablet.png");

        let mut new_image = draft("Tablet Pro", "350");
        new_image.image = Some("tablet-pro.png".to_owned());
        let updated = products.update(created.id, &new_image).await.unwrap();
        assert_eq!(updated.image, "tablet-pro.png");
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown() {
        let pool = test_pool().await;
        let products = ProductRepository::new(&pool);

        let err = products
            .update(ProductId::new(404), &draft("X", "1"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));

        let err = products.delete(ProductId::new(404)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = test_pool().await;
        let products = ProductRepository::new(&pool);

        let created = products.create(&draft("Watch", "50")).await.unwrap();
        products.delete(created.id).await.unwrap();
        assert!(products.get_by_id(created.id).await.unwrap().is_none());
    }
}
