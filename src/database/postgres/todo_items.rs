use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{LISTS_ITEMS_TABLE, TODO_ITEMS_TABLE, USERS_LISTS_TABLE};
use crate::auth::AuthUser;
use crate::database::manager::DatabaseError;
use crate::database::models::{NewTodoItem, TodoItem, TodoItemPatch};
use crate::database::repository::TodoItemRepository;
use crate::database::update_set::UpdateSet;

pub struct PgTodoItemRepository {
    pool: PgPool,
}

impl PgTodoItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Ownership join shared by every item statement: the item must sit in
/// `li.list_id`, and that list must belong to `ul.user_id`.
fn owned_item_filter(user_ph: &str, list_ph: &str, item_ph: &str) -> String {
    format!(
        "ti.id = li.item_id AND li.list_id = ul.list_id AND ul.user_id = {} AND li.list_id = {} AND ti.id = {}",
        user_ph, list_ph, item_ph
    )
}

pub(crate) fn update_item_statement(
    user: AuthUser,
    list_id: i64,
    item_id: i64,
    patch: TodoItemPatch,
) -> Result<(String, UpdateSet), DatabaseError> {
    let mut set = UpdateSet::new();
    set.assign("title", patch.title)
        .assign("description", patch.description)
        .assign("done", patch.done);
    let clause = set.clause()?;
    let user_ph = set.bind(user.user_id);
    let list_ph = set.bind(list_id);
    let item_ph = set.bind(item_id);

    let query = format!(
        "UPDATE {} ti SET {} FROM {} li, {} ul WHERE {}",
        TODO_ITEMS_TABLE,
        clause,
        LISTS_ITEMS_TABLE,
        USERS_LISTS_TABLE,
        owned_item_filter(&user_ph, &list_ph, &item_ph)
    );
    Ok((query, set))
}

#[async_trait]
impl TodoItemRepository for PgTodoItemRepository {
    async fn create(&self, user: AuthUser, list_id: i64, item: NewTodoItem) -> Result<i64, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let create_item = format!(
            "INSERT INTO {} (title, description) VALUES ($1, $2) RETURNING id",
            TODO_ITEMS_TABLE
        );
        let id: i64 = sqlx::query_scalar(&create_item)
            .bind(&item.title)
            .bind(&item.description)
            .fetch_one(&mut *tx)
            .await?;

        // The link only lands if the list is still owned by the user;
        // dropping the transaction rolls the item back otherwise.
        let link_list = format!(
            "INSERT INTO {} (list_id, item_id) SELECT ul.list_id, $1 FROM {} ul \
             WHERE ul.list_id = $2 AND ul.user_id = $3",
            LISTS_ITEMS_TABLE, USERS_LISTS_TABLE
        );
        let linked = sqlx::query(&link_list)
            .bind(id)
            .bind(list_id)
            .bind(user.user_id)
            .execute(&mut *tx)
            .await?;
        if linked.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }

        tx.commit().await?;
        Ok(id)
    }

    async fn get_all(&self, user: AuthUser, list_id: i64) -> Result<Vec<TodoItem>, DatabaseError> {
        let query = format!(
            "SELECT ti.id, ti.title, ti.description, ti.done FROM {} ti \
             INNER JOIN {} li ON li.item_id = ti.id \
             INNER JOIN {} ul ON ul.list_id = li.list_id \
             WHERE li.list_id = $1 AND ul.user_id = $2 ORDER BY ti.id",
            TODO_ITEMS_TABLE, LISTS_ITEMS_TABLE, USERS_LISTS_TABLE
        );

        let items = sqlx::query_as::<_, TodoItem>(&query)
            .bind(list_id)
            .bind(user.user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn get_by_id(&self, user: AuthUser, list_id: i64, item_id: i64) -> Result<TodoItem, DatabaseError> {
        let query = format!(
            "SELECT ti.id, ti.title, ti.description, ti.done FROM {} ti, {} li, {} ul WHERE {}",
            TODO_ITEMS_TABLE,
            LISTS_ITEMS_TABLE,
            USERS_LISTS_TABLE,
            owned_item_filter("$1", "$2", "$3")
        );

        let item = sqlx::query_as::<_, TodoItem>(&query)
            .bind(user.user_id)
            .bind(list_id)
            .bind(item_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(item)
    }

    async fn update(
        &self,
        user: AuthUser,
        list_id: i64,
        item_id: i64,
        patch: TodoItemPatch,
    ) -> Result<(), DatabaseError> {
        let (query, set) = update_item_statement(user, list_id, item_id, patch)?;
        debug!(query = %query, params = ?set.params(), "updating todo item");

        let result = set.bind_all(sqlx::query(&query)).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }

    async fn toggle_done(&self, user: AuthUser, list_id: i64, item_id: i64) -> Result<TodoItem, DatabaseError> {
        let query = format!(
            "UPDATE {} ti SET done = NOT ti.done FROM {} li, {} ul WHERE {} \
             RETURNING ti.id, ti.title, ti.description, ti.done",
            TODO_ITEMS_TABLE,
            LISTS_ITEMS_TABLE,
            USERS_LISTS_TABLE,
            owned_item_filter("$1", "$2", "$3")
        );

        let item = sqlx::query_as::<_, TodoItem>(&query)
            .bind(user.user_id)
            .bind(list_id)
            .bind(item_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(item)
    }

    async fn delete(&self, user: AuthUser, list_id: i64, item_id: i64) -> Result<(), DatabaseError> {
        let query = format!(
            "DELETE FROM {} ti USING {} li, {} ul WHERE {}",
            TODO_ITEMS_TABLE,
            LISTS_ITEMS_TABLE,
            USERS_LISTS_TABLE,
            owned_item_filter("$1", "$2", "$3")
        );

        let result = sqlx::query(&query)
            .bind(user.user_id)
            .bind(list_id)
            .bind(item_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }
}
