//! Result handler contract
//!
//! The search protocol pushes resources into a [`ResultHandler`] one at a
//! time. Paging metadata arrives through the optional setters, at most once
//! each per invocation and in no particular order relative to the resources.

/// Sink for the resources of one search invocation.
pub trait ResultHandler<T> {
    /// Receives the next resource. Returning `false` stops the search; no
    /// further calls are made for this invocation.
    fn resource(&mut self, resource: T) -> bool;

    /// Total number of matches reported by the provider.
    fn total(&mut self, _total: i64) {}

    /// Offset of the first resource of this page.
    fn start(&mut self, _start: i64) {}

    /// Page size the provider applied.
    fn items(&mut self, _items: i64) {}
}

impl<T, H: ResultHandler<T> + ?Sized> ResultHandler<T> for &mut H {
    fn resource(&mut self, resource: T) -> bool {
        (**self).resource(resource)
    }

    fn total(&mut self, total: i64) {
        (**self).total(total)
    }

    fn start(&mut self, start: i64) {
        (**self).start(start)
    }

    fn items(&mut self, items: i64) {
        (**self).items(items)
    }
}

/// Handler that feeds every resource to a closure and ignores metadata.
pub struct ForEach<F>(F);

pub fn for_each<T, F>(f: F) -> ForEach<F>
where
    F: FnMut(T) -> bool,
{
    ForEach(f)
}

impl<T, F> ResultHandler<T> for ForEach<F>
where
    F: FnMut(T) -> bool,
{
    fn resource(&mut self, resource: T) -> bool {
        (self.0)(resource)
    }
}

/// Immutable outcome of a search: the resources plus paging metadata.
///
/// Metadata the provider did not report is `-1`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage<T> {
    total: i64,
    start: i64,
    items: i64,
    resources: Vec<T>,
}

impl<T> ResultPage<T> {
    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn items(&self) -> i64 {
        self.items
    }

    pub fn resources(&self) -> &[T] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.resources.iter()
    }

    /// Whether the provider reported more matches beyond this page.
    pub fn has_more(&self) -> bool {
        if self.total < 0 {
            return false;
        }
        let offset = self.start.max(0);
        let len = i64::try_from(self.resources.len()).unwrap_or(i64::MAX);
        offset
            .checked_add(len)
            .is_some_and(|end| end < self.total)
    }

    pub fn into_resources(self) -> Vec<T> {
        self.resources
    }
}

impl<T> IntoIterator for ResultPage<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ResultPage<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}

/// Accumulating handler behind [`Search::list`](crate::core::search::Search::list).
#[derive(Debug)]
pub struct ResultCollector<T> {
    page: ResultPage<T>,
    limit: Option<usize>,
}

impl<T> Default for ResultCollector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResultCollector<T> {
    pub fn new() -> Self {
        Self {
            page: ResultPage {
                total: -1,
                start: -1,
                items: -1,
                resources: Vec::new(),
            },
            limit: None,
        }
    }

    /// Stops the search once `limit` resources have been collected.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::new()
        }
    }

    pub fn finish(self) -> ResultPage<T> {
        self.page
    }
}

impl<T> ResultHandler<T> for ResultCollector<T> {
    fn resource(&mut self, resource: T) -> bool {
        if self.limit.is_some_and(|limit| self.page.resources.len() >= limit) {
            return false;
        }
        self.page.resources.push(resource);
        self.limit
            .is_none_or(|limit| self.page.resources.len() < limit)
    }

    fn total(&mut self, total: i64) {
        self.page.total = total;
    }

    fn start(&mut self, start: i64) {
        self.page.start = start;
    }

    fn items(&mut self, items: i64) {
        self.page.items = items;
    }
}
