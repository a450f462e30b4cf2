//! The list-query pipeline: search, sort and pagination
//!
//! One generic pipeline services every list endpoint. It is a pure
//! function of the fetched collection and an immutable [`QueryRequest`],
//! parameterized per resource by the [`Searchable`] field set and a
//! projector closure: users, products and purchases all flow through
//! the same code with only those two strategies varying.
//!
//! # Envelope semantics
//!
//! `count` and `total_pages` reflect the **full unfiltered collection**;
//! only `data` reflects the search filter. This is a deliberate,
//! uniform policy (see DESIGN.md).

use serde::Serialize;

use crate::core::error::{ApiError, ApiResult, ValidationError};
use crate::core::record::Searchable;

/// Sort direction for the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `"asc"` selects ascending; any other value sorts descending.
    pub fn parse(raw: &str) -> Self {
        if raw == "asc" {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }
}

/// A requested page: 1-based page number and page size.
///
/// The number is signed on purpose: page numbers at or below zero are
/// accepted and clamp to the start of the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: i64,
    pub size: u64,
}

/// Immutable query parameters for one list request.
///
/// Constructed explicitly per request and passed by argument, never
/// shared process-wide state.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub search: String,
    pub sort_field: String,
    pub sort_order: SortOrder,
    /// `None` means "return all records, unpaginated"
    pub page: Option<PageRequest>,
}

impl QueryRequest {
    /// Build a request from raw query-string values.
    ///
    /// Absent or non-numeric `page_number`/`page_size` select the
    /// unpaginated mode; both must parse for pagination to apply.
    pub fn from_raw(
        search: Option<String>,
        sort_field: Option<String>,
        sort_order: Option<String>,
        page_number: Option<String>,
        page_size: Option<String>,
        default_sort_field: &str,
    ) -> Self {
        let page = match (
            page_number.as_deref().and_then(|v| v.trim().parse::<i64>().ok()),
            page_size.as_deref().and_then(|v| v.trim().parse::<u64>().ok()),
        ) {
            (Some(number), Some(size)) => Some(PageRequest { number, size }),
            _ => None,
        };

        Self {
            search: search.unwrap_or_default(),
            sort_field: sort_field.unwrap_or_else(|| default_sort_field.to_string()),
            sort_order: SortOrder::parse(sort_order.as_deref().unwrap_or("asc")),
            page,
        }
    }
}

/// Result envelope produced by the pipeline.
///
/// The pagination fields serialize as `null` in unpaginated mode.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult<P> {
    pub page_number: Option<i64>,
    pub page_size: Option<u64>,
    /// Size of the full underlying collection, not the filtered subset
    pub count: usize,
    pub total_pages: Option<u64>,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub data: Vec<P>,
}

/// Run the pipeline: normalize, filter, sort, project, paginate.
///
/// # Errors
///
/// Rejects `page_size = 0` with a validation error; every other input
/// combination produces a result (out-of-range pages yield empty data).
pub fn query<T, P, F>(records: Vec<T>, request: &QueryRequest, project: F) -> ApiResult<QueryResult<P>>
where
    T: Searchable,
    F: Fn(&T) -> P,
{
    if let Some(page) = &request.page {
        if page.size == 0 {
            return Err(ApiError::Validation(ValidationError::FieldError {
                field: "page_size".to_string(),
                message: "must be greater than zero".to_string(),
            }));
        }
    }

    let count = records.len();
    let term = request.search.to_lowercase();

    // Keep records matching the search term on any searchable field.
    // Missing fields never match and never error.
    let mut survivors: Vec<T> = if term.is_empty() {
        records
    } else {
        records
            .into_iter()
            .filter(|record| {
                T::searchable_fields().iter().any(|field| {
                    record
                        .field_text(field)
                        .is_some_and(|text| text.to_lowercase().contains(&term))
                })
            })
            .collect()
    };

    // Stable sort on the requested field; a record without the field
    // sorts as the empty string (first in ascending order).
    survivors.sort_by(|a, b| {
        let a_key = a
            .field_text(&request.sort_field)
            .map(|v| v.to_lowercase())
            .unwrap_or_default();
        let b_key = b
            .field_text(&request.sort_field)
            .map(|v| v.to_lowercase())
            .unwrap_or_default();
        match request.sort_order {
            SortOrder::Asc => a_key.cmp(&b_key),
            SortOrder::Desc => b_key.cmp(&a_key),
        }
    });

    let projected: Vec<P> = survivors.iter().map(&project).collect();

    let Some(page) = &request.page else {
        return Ok(QueryResult {
            page_number: None,
            page_size: None,
            count,
            total_pages: None,
            has_previous_page: false,
            has_next_page: false,
            data: projected,
        });
    };

    let total_pages = (count as u64).div_ceil(page.size);
    let offset = ((page.number - 1).max(0) as usize).saturating_mul(page.size as usize);
    let data: Vec<P> = projected
        .into_iter()
        .skip(offset)
        .take(page.size as usize)
        .collect();

    Ok(QueryResult {
        page_number: Some(page.number),
        page_size: Some(page.size),
        count,
        total_pages: Some(total_pages),
        has_previous_page: page.number > 1,
        has_next_page: page.number < total_pages as i64,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::Record;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    #[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
    struct Contact {
        id: Uuid,
        name: Option<String>,
        email: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    }

    impl Contact {
        fn new(name: Option<&str>, email: &str) -> Self {
            let now = Utc::now();
            Self {
                id: Uuid::new_v4(),
                name: name.map(String::from),
                email: email.to_string(),
                created_at: now,
                updated_at: now,
            }
        }
    }

    impl Record for Contact {
        fn collection_name() -> &'static str {
            "contacts"
        }

        fn id(&self) -> Uuid {
            self.id
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }

        fn updated_at(&self) -> DateTime<Utc> {
            self.updated_at
        }

        fn field_text(&self, field: &str) -> Option<String> {
            match field {
                "name" => self.name.clone(),
                "email" => Some(self.email.clone()),
                _ => None,
            }
        }
    }

    impl Searchable for Contact {
        fn searchable_fields() -> &'static [&'static str] {
            &["name", "email"]
        }

        fn default_sort_field() -> &'static str {
            "email"
        }
    }

    fn name_of(c: &Contact) -> String {
        c.name.clone().unwrap_or_default()
    }

    fn request(search: &str, sort_field: &str, order: SortOrder) -> QueryRequest {
        QueryRequest {
            search: search.to_string(),
            sort_field: sort_field.to_string(),
            sort_order: order,
            page: None,
        }
    }

    #[test]
    fn test_sorted_unpaginated() {
        // Scenario: [Bob, Amy], sort name asc, no pagination
        let records = vec![
            Contact::new(Some("Bob"), "b@x.com"),
            Contact::new(Some("Amy"), "a@x.com"),
        ];

        let result = query(records, &request("", "name", SortOrder::Asc), name_of).unwrap();

        assert_eq!(result.data, vec!["Amy", "Bob"]);
        assert_eq!(result.count, 2);
        assert!(result.page_number.is_none());
        assert!(result.total_pages.is_none());
        assert!(!result.has_previous_page);
        assert!(!result.has_next_page);
    }

    #[test]
    fn test_first_page_of_size_one() {
        let records = vec![
            Contact::new(Some("Bob"), "b@x.com"),
            Contact::new(Some("Amy"), "a@x.com"),
        ];
        let mut req = request("", "name", SortOrder::Asc);
        req.page = Some(PageRequest { number: 1, size: 1 });

        let result = query(records, &req, name_of).unwrap();

        assert_eq!(result.data, vec!["Amy"]);
        assert_eq!(result.count, 2);
        assert_eq!(result.total_pages, Some(2));
        assert!(result.has_next_page);
        assert!(!result.has_previous_page);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let records = vec![
            Contact::new(Some("Alice Cooper"), "alice@x.com"),
            Contact::new(Some("Bob"), "bob@coop.org"),
            Contact::new(Some("Carol"), "carol@x.com"),
        ];

        let result = query(records, &request("COOP", "name", SortOrder::Asc), name_of).unwrap();

        // Matches name on one record and email on another
        assert_eq!(result.data, vec!["Alice Cooper", "Bob"]);
        // count stays the size of the unfiltered collection
        assert_eq!(result.count, 3);
    }

    #[test]
    fn test_missing_search_field_does_not_match() {
        let records = vec![
            Contact::new(None, "anon@x.com"),
            Contact::new(Some("Amy"), "a@x.com"),
        ];

        let result = query(records, &request("amy", "name", SortOrder::Asc), name_of).unwrap();
        assert_eq!(result.data, vec!["Amy"]);
    }

    #[test]
    fn test_missing_sort_field_sorts_first_ascending() {
        let records = vec![
            Contact::new(Some("Zed"), "z@x.com"),
            Contact::new(None, "anon@x.com"),
        ];

        let result = query(records, &request("", "name", SortOrder::Asc), |c| {
            c.email.clone()
        })
        .unwrap();

        assert_eq!(result.data, vec!["anon@x.com", "z@x.com"]);
    }

    #[test]
    fn test_sort_descending_on_anything_but_asc() {
        let records = vec![
            Contact::new(Some("Amy"), "a@x.com"),
            Contact::new(Some("Bob"), "b@x.com"),
        ];

        assert_eq!(SortOrder::parse("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::parse("banana"), SortOrder::Desc);
        assert_eq!(SortOrder::parse("asc"), SortOrder::Asc);

        let result = query(records, &request("", "name", SortOrder::Desc), name_of).unwrap();
        assert_eq!(result.data, vec!["Bob", "Amy"]);
    }

    #[test]
    fn test_sort_is_stable_on_equal_keys() {
        let records = vec![
            Contact::new(Some("Same"), "first@x.com"),
            Contact::new(Some("Same"), "second@x.com"),
            Contact::new(Some("Same"), "third@x.com"),
        ];

        let result = query(records, &request("", "name", SortOrder::Asc), |c| {
            c.email.clone()
        })
        .unwrap();

        assert_eq!(
            result.data,
            vec!["first@x.com", "second@x.com", "third@x.com"]
        );
    }

    #[test]
    fn test_pages_partition_the_sorted_sequence() {
        let records: Vec<Contact> = (0..10)
            .map(|i| Contact::new(Some(&format!("user{:02}", i)), &format!("u{:02}@x.com", i)))
            .collect();

        let full = query(
            records.clone(),
            &request("", "name", SortOrder::Asc),
            name_of,
        )
        .unwrap()
        .data;

        let mut stitched = Vec::new();
        for number in 1..=4 {
            let mut req = request("", "name", SortOrder::Asc);
            req.page = Some(PageRequest { number, size: 3 });
            let page = query(records.clone(), &req, name_of).unwrap();
            assert_eq!(page.total_pages, Some(4));
            assert_eq!(page.has_previous_page, number > 1);
            assert_eq!(page.has_next_page, number < 4);
            stitched.extend(page.data);
        }

        assert_eq!(stitched, full);
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let records = vec![Contact::new(Some("Amy"), "a@x.com")];
        let mut req = request("", "name", SortOrder::Asc);
        req.page = Some(PageRequest {
            number: 99,
            size: 10,
        });

        let result = query(records, &req, name_of).unwrap();
        assert!(result.data.is_empty());
        assert!(!result.has_next_page);
        assert!(result.has_previous_page);
    }

    #[test]
    fn test_page_number_at_or_below_zero_clamps_to_start() {
        let records = vec![
            Contact::new(Some("Amy"), "a@x.com"),
            Contact::new(Some("Bob"), "b@x.com"),
        ];

        for number in [0, -3] {
            let mut req = request("", "name", SortOrder::Asc);
            req.page = Some(PageRequest { number, size: 1 });
            let result = query(records.clone(), &req, name_of).unwrap();
            assert_eq!(result.data, vec!["Amy"]);
            assert!(!result.has_previous_page);
            assert!(result.has_next_page);
        }
    }

    #[test]
    fn test_page_size_zero_is_rejected() {
        let records = vec![Contact::new(Some("Amy"), "a@x.com")];
        let mut req = request("", "name", SortOrder::Asc);
        req.page = Some(PageRequest { number: 1, size: 0 });

        let err = query(records, &req, name_of).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_from_raw_non_numeric_page_params_mean_unpaginated() {
        let req = QueryRequest::from_raw(
            Some("amy".to_string()),
            None,
            None,
            Some("two".to_string()),
            Some("10".to_string()),
            "email",
        );

        assert!(req.page.is_none());
        assert_eq!(req.search, "amy");
        assert_eq!(req.sort_field, "email");
        assert_eq!(req.sort_order, SortOrder::Asc);
    }

    #[test]
    fn test_from_raw_both_page_params_required() {
        let req = QueryRequest::from_raw(
            None,
            Some("name".to_string()),
            Some("desc".to_string()),
            Some("2".to_string()),
            None,
            "email",
        );
        assert!(req.page.is_none());
        assert_eq!(req.sort_order, SortOrder::Desc);

        let req = QueryRequest::from_raw(
            None,
            None,
            None,
            Some("2".to_string()),
            Some("5".to_string()),
            "email",
        );
        assert_eq!(req.page, Some(PageRequest { number: 2, size: 5 }));
    }
}
