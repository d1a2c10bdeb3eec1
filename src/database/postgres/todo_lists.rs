use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{LISTS_ITEMS_TABLE, TODO_ITEMS_TABLE, TODO_LISTS_TABLE, USERS_LISTS_TABLE};
use crate::auth::AuthUser;
use crate::database::manager::DatabaseError;
use crate::database::models::{NewTodoList, TodoList, TodoListPatch};
use crate::database::repository::TodoListRepository;
use crate::database::update_set::UpdateSet;

pub struct PgTodoListRepository {
    pool: PgPool,
}

impl PgTodoListRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Builds the ownership-scoped UPDATE for a list patch
pub(crate) fn update_list_statement(
    user: AuthUser,
    list_id: i64,
    patch: TodoListPatch,
) -> Result<(String, UpdateSet), DatabaseError> {
    let mut set = UpdateSet::new();
    set.assign("title", patch.title)
        .assign("description", patch.description);
    let clause = set.clause()?;
    let list_ph = set.bind(list_id);
    let user_ph = set.bind(user.user_id);

    let query = format!(
        "UPDATE {} tl SET {} FROM {} ul WHERE tl.id = ul.list_id AND ul.list_id = {} AND ul.user_id = {}",
        TODO_LISTS_TABLE, clause, USERS_LISTS_TABLE, list_ph, user_ph
    );
    Ok((query, set))
}

#[async_trait]
impl TodoListRepository for PgTodoListRepository {
    async fn create(&self, user: AuthUser, list: NewTodoList) -> Result<i64, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let create_list = format!(
            "INSERT INTO {} (title, description) VALUES ($1, $2) RETURNING id",
            TODO_LISTS_TABLE
        );
        let id: i64 = sqlx::query_scalar(&create_list)
            .bind(&list.title)
            .bind(&list.description)
            .fetch_one(&mut *tx)
            .await?;

        let link_user = format!("INSERT INTO {} (user_id, list_id) VALUES ($1, $2)", USERS_LISTS_TABLE);
        sqlx::query(&link_user)
            .bind(user.user_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(id)
    }

    async fn get_all(&self, user: AuthUser) -> Result<Vec<TodoList>, DatabaseError> {
        let query = format!(
            "SELECT tl.id, tl.title, tl.description FROM {} tl INNER JOIN {} ul ON tl.id = ul.list_id \
             WHERE ul.user_id = $1 ORDER BY tl.id",
            TODO_LISTS_TABLE, USERS_LISTS_TABLE
        );

        let lists = sqlx::query_as::<_, TodoList>(&query)
            .bind(user.user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(lists)
    }

    async fn get_by_id(&self, user: AuthUser, list_id: i64) -> Result<TodoList, DatabaseError> {
        let query = format!(
            "SELECT tl.id, tl.title, tl.description FROM {} tl INNER JOIN {} ul ON tl.id = ul.list_id \
             WHERE ul.user_id = $1 AND ul.list_id = $2",
            TODO_LISTS_TABLE, USERS_LISTS_TABLE
        );

        let list = sqlx::query_as::<_, TodoList>(&query)
            .bind(user.user_id)
            .bind(list_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(list)
    }

    async fn update(&self, user: AuthUser, list_id: i64, patch: TodoListPatch) -> Result<(), DatabaseError> {
        let (query, set) = update_list_statement(user, list_id, patch)?;
        debug!(query = %query, params = ?set.params(), "updating todo list");

        let result = set.bind_all(sqlx::query(&query)).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, user: AuthUser, list_id: i64) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let delete_items = format!(
            "DELETE FROM {} ti USING {} li, {} ul WHERE ti.id = li.item_id AND li.list_id = ul.list_id \
             AND ul.user_id = $1 AND ul.list_id = $2",
            TODO_ITEMS_TABLE, LISTS_ITEMS_TABLE, USERS_LISTS_TABLE
        );
        let items = sqlx::query(&delete_items)
            .bind(user.user_id)
            .bind(list_id)
            .execute(&mut *tx)
            .await?;

        let delete_list = format!(
            "DELETE FROM {} tl USING {} ul WHERE tl.id = ul.list_id AND ul.user_id = $1 AND ul.list_id = $2",
            TODO_LISTS_TABLE, USERS_LISTS_TABLE
        );
        let result = sqlx::query(&delete_list)
            .bind(user.user_id)
            .bind(list_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // dropping the transaction rolls it back
            return Err(DatabaseError::NotFound);
        }

        tx.commit().await?;
        debug!(list_id, items_removed = items.rows_affected(), "deleted todo list");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_statement_scopes_by_owner() {
        let patch = TodoListPatch {
            title: Some("X".to_string()),
            description: None,
        };
        let (query, set) = update_list_statement(AuthUser::new(9), 3, patch).unwrap();
        assert_eq!(
            query,
            "UPDATE todo_lists tl SET title=$1 FROM users_lists ul \
             WHERE tl.id = ul.list_id AND ul.list_id = $2 AND ul.user_id = $3"
        );
        assert_eq!(set.params().len(), 3);
    }

    #[test]
    fn update_statement_rejects_empty_patch() {
        let result = update_list_statement(AuthUser::new(1), 1, TodoListPatch::default());
        assert!(matches!(result, Err(DatabaseError::EmptyUpdate)));
    }
}
