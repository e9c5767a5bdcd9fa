use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

// Parâmetros ?page=&limit= aceitos por todas as listagens.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    // Normaliza page/limit e devolve também o OFFSET correspondente.
    pub fn clamp(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        (page, limit, (page - 1) * limit)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_count: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(total_count: i64, page: i64, limit: i64) -> Self {
        let total_pages = if total_count == 0 {
            0
        } else {
            (total_count + limit - 1) / limit
        };
        Self {
            current_page: page,
            total_pages,
            total_count,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

// Uma página de resultados mais os metadados de navegação.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T: Serialize> Page<T> {
    pub fn new(items: Vec<T>, total_count: i64, page: i64, limit: i64) -> Self {
        Self {
            items,
            pagination: Pagination::new(total_count, page, limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_computes_total_pages_rounding_up() {
        let p = Pagination::new(21, 1, 10);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(!p.has_prev);
    }

    #[test]
    fn pagination_handles_empty_result() {
        let p = Pagination::new(0, 1, 10);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next);
        assert!(!p.has_prev);
    }

    #[test]
    fn pagination_last_page_has_no_next() {
        let p = Pagination::new(30, 3, 10);
        assert!(!p.has_next);
        assert!(p.has_prev);
    }

    #[test]
    fn page_query_clamps_out_of_range_values() {
        let q = PageQuery {
            page: Some(0),
            limit: Some(1000),
        };
        assert_eq!(q.clamp(), (1, 100, 0));

        let q = PageQuery {
            page: None,
            limit: None,
        };
        assert_eq!(q.clamp(), (1, 10, 0));

        let q = PageQuery {
            page: Some(3),
            limit: Some(20),
        };
        assert_eq!(q.clamp(), (3, 20, 40));
    }
}
