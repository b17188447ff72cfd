//! Pagination parameters shared by stores and the API layer

/// Pagination parameters for queries
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
        }
    }
}

impl Pagination {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }

    pub fn page(page: i64, per_page: i64) -> Self {
        Self {
            limit: per_page,
            offset: (page - 1) * per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_default() {
        let p = Pagination::default();
        assert_eq!(p.limit, 20);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_pagination_page() {
        let p = Pagination::page(3, 10);
        assert_eq!(p.limit, 10);
        assert_eq!(p.offset, 20);
    }
}
