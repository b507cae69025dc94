use serde::Serialize;

use crate::http::Error;
use crate::schema::{ListParams, SortDirection, SortField, User};
use crate::types::UserView;
use crate::App;

/// Paginated, searchable listing. Out-of-range paging input is
/// clamped rather than rejected, and sort input that does not match
/// the whitelist falls back to newest-first.
#[derive(Debug)]
pub struct ListUsers<'a> {
    pub query: Option<&'a str>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct ListUsersResult {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
    pub users: Vec<UserView>,
}

impl ListUsers<'_> {
    const DEFAULT_LIMIT: i64 = 10;
    const MAX_LIMIT: i64 = 100;

    #[tracing::instrument(skip_all, name = "services.users.list")]
    pub async fn perform(self, app: &App) -> Result<ListUsersResult, Error> {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT);
        let (sort_by, direction) = parse_sort(self.sort);

        let params = ListParams {
            filter: self.query.map(str::trim).filter(|v| !v.is_empty()),
            sort_by,
            direction,
            limit,
            offset: (page - 1) * limit,
        };

        let mut conn = app.db_read().await?;
        let (items, total) = User::list(&mut conn, &params).await?;

        Ok(ListUsersResult {
            page,
            limit,
            total,
            pages: total_pages(total, limit),
            users: items.into_iter().map(UserView::from).collect(),
        })
    }
}

/// Parses `field:dir`. Anything unrecognized falls back to the
/// default instead of erroring, and never reaches the query text.
fn parse_sort(value: Option<&str>) -> (SortField, SortDirection) {
    let Some(value) = value else {
        return Default::default();
    };

    let (field, dir) = match value.split_once(':') {
        Some((field, dir)) => (field, Some(dir)),
        None => (value, None),
    };

    let field = SortField::parse(field).unwrap_or_default();
    let direction = dir.and_then(SortDirection::parse).unwrap_or_default();
    (field, direction)
}

fn total_pages(total: i64, limit: i64) -> i64 {
    ((total + limit - 1) / limit).max(1)
}

#[cfg(test)]
mod tests {
    use super::{parse_sort, total_pages, ListUsers};
    use crate::schema::{SortDirection, SortField};

    #[test]
    fn clamps_paging_input() {
        assert_eq!(Option::<i64>::None.unwrap_or(1).max(1), 1);
        assert_eq!(Some(0_i64).unwrap_or(1).max(1), 1);
        assert_eq!(Some(-3_i64).unwrap_or(1).max(1), 1);

        let clamp = |v: Option<i64>| {
            v.unwrap_or(ListUsers::DEFAULT_LIMIT)
                .clamp(1, ListUsers::MAX_LIMIT)
        };
        assert_eq!(clamp(None), 10);
        assert_eq!(clamp(Some(1_000)), 100);
        assert_eq!(clamp(Some(0)), 1);
        assert_eq!(clamp(Some(25)), 25);
    }

    #[test]
    fn page_count_never_drops_below_one() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(101, 100), 2);
    }

    #[test]
    fn parses_sort_expressions() {
        assert_eq!(
            parse_sort(Some("name:asc")),
            (SortField::Name, SortDirection::Ascending),
        );
        assert_eq!(
            parse_sort(Some("email")),
            (SortField::Email, SortDirection::Descending),
        );
        assert_eq!(
            parse_sort(None),
            (SortField::CreatedAt, SortDirection::Descending),
        );
    }

    #[test]
    fn unknown_sort_input_falls_back_to_default() {
        assert_eq!(
            parse_sort(Some("password_hash:asc")),
            (SortField::CreatedAt, SortDirection::Ascending),
        );
        assert_eq!(
            parse_sort(Some("created_at:sideways")),
            (SortField::CreatedAt, SortDirection::Descending),
        );
        assert_eq!(
            parse_sort(Some("")),
            (SortField::CreatedAt, SortDirection::Descending),
        );
    }
}
