//! Data Transfer Objects (DTOs) for layer boundary crossing
//!
//! Inputs are what the HTTP layer decodes request bodies into; outputs are
//! the response shapes. Field names are camelCase on the wire.

pub mod store;
pub mod survey;

pub use store::*;
pub use survey::*;

use makoto_domain::{repositories::Page, value_objects::Pagination};
use serde::{Deserialize, Serialize};

/// One page of a listing as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

impl<T> ListResponse<T> {
    /// Map a repository page, echoing the normalized pagination
    pub fn from_page<U>(page: Page<U>, pagination: Pagination, f: impl FnMut(U) -> T) -> Self {
        let Page { items, total } = page;
        Self {
            items: items.into_iter().map(f).collect(),
            page: pagination.page(),
            limit: pagination.limit(),
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_echoes_normalized_paging() {
        let page = Page::new(vec![1, 2], 12);
        let response = ListResponse::from_page(page, Pagination::new(0, 500), |n| n * 10);
        assert_eq!(response.items, vec![10, 20]);
        assert_eq!(response.page, 1);
        assert_eq!(response.limit, 100);
        assert_eq!(response.total, 12);
    }
}
