use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::database::{Connection, ErrorExt, Result};
use crate::types::UserId;

#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl User {
    #[tracing::instrument(skip_all, name = "db.users.find")]
    pub async fn find(conn: &mut Connection, id: UserId) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(r#"SELECT * FROM "users" WHERE id = $1"#)
            .bind(id)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }

    /// Looks up by an already-normalized (lowercased) email.
    #[tracing::instrument(skip_all, name = "db.users.find_by_email")]
    pub async fn find_by_email(conn: &mut Connection, email: &str) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(r#"SELECT * FROM "users" WHERE email = $1"#)
            .bind(email)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.users.check_email_taken")]
    pub async fn check_email_taken(conn: &mut Connection, email: &str) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(r#"SELECT exists(SELECT 1 FROM "users" WHERE email = $1)"#)
            .bind(email)
            .fetch_one(conn)
            .await
            .into_db_error()
    }

    /// Like [`User::check_email_taken`] but ignores the given user's
    /// own row, so changing an email to its current value is not a
    /// conflict.
    #[tracing::instrument(skip_all, name = "db.users.check_email_taken_by_other")]
    pub async fn check_email_taken_by_other(
        conn: &mut Connection,
        email: &str,
        id: UserId,
    ) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"SELECT exists(SELECT 1 FROM "users" WHERE email = $1 AND id <> $2)"#,
        )
        .bind(email)
        .bind(id)
        .fetch_one(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.users.delete")]
    pub async fn delete(conn: &mut Connection, id: UserId) -> Result<bool> {
        let done = sqlx::query(r#"DELETE FROM "users" WHERE id = $1"#)
            .bind(id)
            .execute(conn)
            .await
            .into_db_error()?;

        Ok(done.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all, name = "db.users.list")]
    pub async fn list(conn: &mut Connection, params: &ListParams<'_>) -> Result<(Vec<Self>, i64)> {
        let mut query = sqlx::QueryBuilder::<sqlx::Postgres>::new(r#"SELECT * FROM "users""#);
        let mut count = sqlx::QueryBuilder::<sqlx::Postgres>::new(r#"SELECT count(*) FROM "users""#);

        if let Some(filter) = params.filter.filter(|v| !v.is_empty()) {
            let pattern = format!("%{}%", escape_like(filter));
            for builder in [&mut query, &mut count] {
                builder
                    .push(" WHERE name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR email ILIKE ")
                    .push_bind(pattern.clone());
            }
        }

        query
            .push(" ORDER BY ")
            .push(params.sort_by.column())
            .push(" ")
            .push(params.direction.sql())
            .push(" LIMIT ")
            .push_bind(params.limit)
            .push(" OFFSET ")
            .push_bind(params.offset);

        let items = query
            .build_query_as::<Self>()
            .fetch_all(&mut *conn)
            .await
            .into_db_error()?;

        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&mut *conn)
            .await
            .into_db_error()?;

        Ok((items, total))
    }
}

/// Row inserted by registration. The email must already be normalized
/// to lowercase and the password already hashed.
#[derive(Debug)]
pub struct InsertUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

impl InsertUser<'_> {
    #[tracing::instrument(skip_all, name = "db.users.insert")]
    pub async fn insert(&self, conn: &mut Connection) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"INSERT INTO "users" (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *"#,
        )
        .bind(self.name)
        .bind(self.email)
        .bind(self.password_hash)
        .fetch_one(conn)
        .await
        .into_db_error()
    }
}

/// Partial update; `None` fields keep their stored value. Always
/// bumps `updated_at`.
#[derive(Debug)]
pub struct UpdateUser<'a> {
    pub id: UserId,
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub password_hash: Option<&'a str>,
}

impl UpdateUser<'_> {
    #[tracing::instrument(skip_all, name = "db.users.update")]
    pub async fn update(&self, conn: &mut Connection) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"UPDATE "users"
            SET name = coalesce($2, name),
                email = coalesce($3, email),
                password_hash = coalesce($4, password_hash),
                updated_at = now()
            WHERE id = $1
            RETURNING *"#,
        )
        .bind(self.id)
        .bind(self.name)
        .bind(self.email)
        .bind(self.password_hash)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }
}

/// Filter, ordering, and pagination for the user listing. The filter
/// is matched as a case-insensitive substring against name or email.
#[derive(Debug)]
pub struct ListParams<'a> {
    pub filter: Option<&'a str>,
    pub sort_by: SortField,
    pub direction: SortDirection,
    pub limit: i64,
    pub offset: i64,
}

/// Fields the listing can be ordered by. Client input is parsed into
/// this set; unknown field names never reach the query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Name,
    Email,
}

impl SortField {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "created_at" | "createdAt" => Some(Self::CreatedAt),
            "updated_at" | "updatedAt" => Some(Self::UpdatedAt),
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            _ => None,
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Name => "name",
            Self::Email => "email",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Ascending),
            "desc" => Some(Self::Descending),
            _ => None,
        }
    }

    fn sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Escapes LIKE wildcards so filter text always matches literally.
fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{escape_like, SortDirection, SortField};

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like("ana"), "ana");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn whitelists_sort_fields() {
        assert_eq!(SortField::parse("created_at"), Some(SortField::CreatedAt));
        assert_eq!(SortField::parse("createdAt"), Some(SortField::CreatedAt));
        assert_eq!(SortField::parse("email"), Some(SortField::Email));
        assert_eq!(SortField::parse("password_hash"), None);
        assert_eq!(SortField::parse("id; DROP TABLE users"), None);
    }

    #[test]
    fn parses_sort_directions() {
        assert_eq!(SortDirection::parse("asc"), Some(SortDirection::Ascending));
        assert_eq!(SortDirection::parse("desc"), Some(SortDirection::Descending));
        assert_eq!(SortDirection::parse("sideways"), None);
    }
}
