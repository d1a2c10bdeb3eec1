use sqlx::postgres::PgArguments;
use sqlx::Postgres;

use crate::database::manager::DatabaseError;

/// A value bound to a positional parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Bool(bool),
    BigInt(i64),
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(v)
    }
}

impl From<bool> for SqlParam {
    fn from(v: bool) -> Self {
        SqlParam::Bool(v)
    }
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        SqlParam::BigInt(v)
    }
}

/// Builds the `SET` clause of a partial update.
///
/// Columns are emitted in the order they are offered, present or not, so
/// the generated SQL for a given set of present fields is always the same.
/// Parameters are numbered `$1..$n` in that order; anything bound with
/// [`UpdateSet::bind`] afterwards continues the numbering.
#[derive(Debug, Default)]
pub struct UpdateSet {
    assignments: Vec<String>,
    params: Vec<SqlParam>,
}

impl UpdateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `column` if `value` is present
    pub fn assign<V: Into<SqlParam>>(&mut self, column: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.params.push(value.into());
            self.assignments.push(format!("{}=${}", column, self.params.len()));
        }
        self
    }

    /// Bind a non-SET parameter (WHERE clause) and return its placeholder
    pub fn bind<V: Into<SqlParam>>(&mut self, value: V) -> String {
        self.params.push(value.into());
        format!("${}", self.params.len())
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// The comma-joined assignments; errors when nothing was assigned
    pub fn clause(&self) -> Result<String, DatabaseError> {
        if self.is_empty() {
            return Err(DatabaseError::EmptyUpdate);
        }
        Ok(self.assignments.join(", "))
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    /// Bind every collected parameter onto `q` in placeholder order
    pub fn bind_all<'q>(
        &'q self,
        mut q: sqlx::query::Query<'q, Postgres, PgArguments>,
    ) -> sqlx::query::Query<'q, Postgres, PgArguments> {
        for p in self.params.iter() {
            q = bind_param_query(q, p);
        }
        q
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, Postgres, PgArguments>,
    v: &'q SqlParam,
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    match v {
        SqlParam::Text(s) => q.bind(s.as_str()),
        SqlParam::Bool(b) => q.bind(*b),
        SqlParam::BigInt(i) => q.bind(*i),
    }
}
