//! Pagination envelope vocabulary
//!
//! Providers wrap result lists in objects whose field names differ for the
//! same meaning. The table below maps every recognized spelling to its role;
//! a new provider spelling is one more row.

/// Semantic role of a top-level envelope field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// Total number of matches on the provider side.
    Total,
    /// Offset of the first resource in this page.
    Start,
    /// Page size the provider actually applied.
    Items,
    /// Free text embedding the start offset and the item count.
    Header,
    /// The list of resources.
    Resources,
}

const FIELD_ROLES: &[(&str, FieldRole)] = &[
    ("total", FieldRole::Total),
    ("totalResults", FieldRole::Total),
    ("startAt", FieldRole::Start),
    ("start", FieldRole::Start),
    ("startIndex", FieldRole::Start),
    ("maxResults", FieldRole::Items),
    ("itemsPerPage", FieldRole::Items),
    ("header", FieldRole::Header),
    ("values", FieldRole::Resources),
    ("groups", FieldRole::Resources),
    ("Resources", FieldRole::Resources),
];

pub fn role_of(field: &str) -> Option<FieldRole> {
    FIELD_ROLES
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, role)| *role)
}

/// Pulls the start offset and item count out of a decorated header such as
/// `"startAt: 10, maxResults: 25"`.
///
/// Every character that is neither a digit nor a sign separates tokens; the
/// first two tokens that parse as integers are returned in order.
pub fn parse_header(header: &str) -> (Option<i64>, Option<i64>) {
    let mut numbers = header
        .split(|c: char| !(c.is_ascii_digit() || c == '-' || c == '+'))
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse::<i64>().ok());
    (numbers.next(), numbers.next())
}
