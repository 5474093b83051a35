//! Per-resource filter field table
//!
//! Maps a `(resource, field)` pair to the query parameter the backend
//! understands for it. Resources and fields missing from the table have no
//! server-side filter and are dropped by the query builder.

/// Recognized filter fields for one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceFilters {
    pub resource: &'static str,
    /// `(field, parameter)` pairs
    pub fields: &'static [(&'static str, &'static str)],
}

/// Free-text search parameter shared by every resource
pub const SEARCH_PARAM: &str = "search";

pub const FILTER_TABLE: &[ResourceFilters] = &[
    ResourceFilters {
        resource: "departments",
        fields: &[("name", SEARCH_PARAM), ("code", SEARCH_PARAM)],
    },
    ResourceFilters {
        resource: "subjects",
        fields: &[
            ("department", "department"),
            ("name", SEARCH_PARAM),
            ("code", SEARCH_PARAM),
        ],
    },
    ResourceFilters {
        resource: "classes",
        fields: &[
            ("name", SEARCH_PARAM),
            ("subject", "subject"),
            ("teacher", "teacher"),
        ],
    },
];

/// Look up the filter entry for a resource
pub fn resource_filters(resource: &str) -> Option<&'static ResourceFilters> {
    FILTER_TABLE.iter().find(|entry| entry.resource == resource)
}

/// Query parameter a filter on `field` translates to for `resource`
pub fn filter_param(resource: &str, field: &str) -> Option<&'static str> {
    resource_filters(resource)?
        .fields
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, param)| *param)
}
