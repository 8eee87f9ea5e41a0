use futures::future::BoxFuture;
use uuid::Uuid;

use crate::errors::BackendError;
use crate::recipe::{Recipe, RecipeDraft};

pub trait Db {
    /// Returns every recipe, newest first.
    fn list(&self) -> BoxFuture<Result<Vec<Recipe>, BackendError>>;

    fn retrieve(&self, id: &Uuid) -> BoxFuture<Result<Option<Recipe>, BackendError>>;

    /// Stores a validated draft, assigning its ID and creation time.
    fn insert(&self, draft: RecipeDraft) -> BoxFuture<Result<Recipe, BackendError>>;

    /// Replaces every caller-supplied field of an existing recipe.
    fn update(
        &self,
        id: &Uuid,
        draft: RecipeDraft,
    ) -> BoxFuture<Result<Option<Recipe>, BackendError>>;

    /// Removes a recipe, returning it.
    fn delete(&self, id: &Uuid) -> BoxFuture<Result<Option<Recipe>, BackendError>>;
}

pub use self::memory::*;
pub use self::postgres::*;

mod memory {
    use std::sync::{PoisonError, RwLock};

    use futures::future::{self, BoxFuture, FutureExt};
    use time::OffsetDateTime;
    use uuid::Uuid;

    use crate::errors::BackendError;
    use crate::recipe::{Recipe, RecipeDraft};

    /// A database backed by an in-process collection behind a single lock.
    #[derive(Default)]
    pub struct MemoryDb {
        recipes: RwLock<Vec<Recipe>>,
    }

    impl MemoryDb {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl super::Db for MemoryDb {
        fn list(&self) -> BoxFuture<Result<Vec<Recipe>, BackendError>> {
            let mut recipes = self
                .recipes
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();
            recipes.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

            future::ready(Ok(recipes)).boxed()
        }

        fn retrieve(&self, id: &Uuid) -> BoxFuture<Result<Option<Recipe>, BackendError>> {
            let found = self
                .recipes
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .find(|recipe| recipe.id() == id)
                .cloned();

            future::ready(Ok(found)).boxed()
        }

        fn insert(&self, draft: RecipeDraft) -> BoxFuture<Result<Recipe, BackendError>> {
            let recipe = Recipe::new(Uuid::new_v4(), OffsetDateTime::now_utc(), draft);
            self.recipes
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .push(recipe.clone());

            future::ready(Ok(recipe)).boxed()
        }

        fn update(
            &self,
            id: &Uuid,
            draft: RecipeDraft,
        ) -> BoxFuture<Result<Option<Recipe>, BackendError>> {
            let mut recipes = self
                .recipes
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let updated = recipes
                .iter_mut()
                .find(|recipe| recipe.id() == id)
                .map(|recipe| {
                    recipe.replace(draft);
                    recipe.clone()
                });

            future::ready(Ok(updated)).boxed()
        }

        fn delete(&self, id: &Uuid) -> BoxFuture<Result<Option<Recipe>, BackendError>> {
            let mut recipes = self
                .recipes
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let removed = recipes
                .iter()
                .position(|recipe| recipe.id() == id)
                .map(|index| recipes.remove(index));

            future::ready(Ok(removed)).boxed()
        }
    }
}

mod postgres {
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use sqlx::postgres::PgPool;
    use uuid::Uuid;

    use crate::errors::BackendError;
    use crate::recipe::{Recipe, RecipeDraft};

    /// A database backed by Postgres.
    pub struct PgDb {
        pool: PgPool,
    }

    impl PgDb {
        pub fn new(pool: PgPool) -> Self {
            PgDb { pool }
        }
    }

    // these can be simplified once async functions in traits are stabilized
    impl super::Db for PgDb {
        fn list(&self) -> BoxFuture<Result<Vec<Recipe>, BackendError>> {
            async move {
                let query = sqlx::query_as::<_, Recipe>(include_str!("queries/list.sql"));

                let results = query
                    .fetch_all(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(results)
            }
            .boxed()
        }

        fn retrieve(&self, id: &Uuid) -> BoxFuture<Result<Option<Recipe>, BackendError>> {
            let id = *id;

            async move {
                let query = sqlx::query_as::<_, Recipe>(include_str!("queries/retrieve.sql"));

                let result = query
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(result)
            }
            .boxed()
        }

        fn insert(&self, draft: RecipeDraft) -> BoxFuture<Result<Recipe, BackendError>> {
            async move {
                let query = sqlx::query_as::<_, Recipe>(include_str!("queries/create.sql"));

                let result = query
                    .bind(draft.image)
                    .bind(draft.name)
                    .bind(draft.description)
                    .bind(draft.ingredients)
                    .bind(draft.instructions)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(result)
            }
            .boxed()
        }

        fn update(
            &self,
            id: &Uuid,
            draft: RecipeDraft,
        ) -> BoxFuture<Result<Option<Recipe>, BackendError>> {
            let id = *id;

            async move {
                let query = sqlx::query_as::<_, Recipe>(include_str!("queries/update.sql"));

                let result = query
                    .bind(id)
                    .bind(draft.image)
                    .bind(draft.name)
                    .bind(draft.description)
                    .bind(draft.ingredients)
                    .bind(draft.instructions)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(result)
            }
            .boxed()
        }

        fn delete(&self, id: &Uuid) -> BoxFuture<Result<Option<Recipe>, BackendError>> {
            let id = *id;

            async move {
                let query = sqlx::query_as::<_, Recipe>(include_str!("queries/delete.sql"));

                let result = query
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(result)
            }
            .boxed()
        }
    }

    fn map_sqlx_error(source: sqlx::Error) -> BackendError {
        BackendError::Sqlx { source }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Db, MemoryDb};
    use crate::recipe::RecipeDraft;

    fn draft(name: &str) -> RecipeDraft {
        RecipeDraft {
            image: "uploads/171234-pie.jpg".to_owned(),
            name: name.to_owned(),
            description: "A very good pie.".to_owned(),
            ingredients: vec!["butter".to_owned()],
            instructions: vec!["bake".to_owned()],
        }
    }

    #[tokio::test]
    async fn inserting_assigns_distinct_ids() {
        let db = MemoryDb::new();

        let first = db.insert(draft("First pie")).await.expect("insert");
        let second = db.insert(draft("Second pie")).await.expect("insert");

        assert_ne!(first.id(), second.id());
    }

    #[tokio::test]
    async fn listing_returns_newest_first() {
        let db = MemoryDb::new();

        let first = db.insert(draft("First pie")).await.expect("insert");
        futures_timer::Delay::new(Duration::from_millis(5)).await;
        let second = db.insert(draft("Second pie")).await.expect("insert");

        let listed = db.list().await.expect("list");

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id(), second.id());
        assert_eq!(listed[1].id(), first.id());
    }

    #[tokio::test]
    async fn updating_replaces_fields_but_not_identity() {
        let db = MemoryDb::new();

        let original = db.insert(draft("First pie")).await.expect("insert");
        let updated = db
            .update(original.id(), draft("Renamed pie"))
            .await
            .expect("update")
            .expect("recipe must exist");

        assert_eq!(updated.id(), original.id());
        assert_eq!(updated.created_at(), original.created_at());

        let retrieved = db
            .retrieve(original.id())
            .await
            .expect("retrieve")
            .expect("recipe must exist");
        assert_eq!(retrieved, updated);
    }

    #[tokio::test]
    async fn updating_a_missing_recipe_returns_none() {
        let db = MemoryDb::new();

        let result = db
            .update(&uuid::Uuid::new_v4(), draft("Ghost pie"))
            .await
            .expect("update");

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn deleting_removes_and_returns_the_recipe() {
        let db = MemoryDb::new();

        let recipe = db.insert(draft("First pie")).await.expect("insert");

        let removed = db.delete(recipe.id()).await.expect("delete");
        assert_eq!(removed.as_ref(), Some(&recipe));

        let again = db.delete(recipe.id()).await.expect("delete");
        assert!(again.is_none());

        assert!(db.list().await.expect("list").is_empty());
    }
}
