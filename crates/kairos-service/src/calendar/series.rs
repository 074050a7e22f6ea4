//! Series metadata lookup for calendar export.

use std::collections::HashMap;

use crate::error::ServiceResult;

/// A series and its metadata document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    pub id: String,
    pub catalog_xml: String,
}

/// Source of series metadata, typically backed by the series store.
pub trait SeriesCatalog {
    /// ## Summary
    /// Returns every known series.
    ///
    /// ## Errors
    /// Returns an error if the store cannot be queried.
    fn all_series(&self) -> ServiceResult<Vec<Series>>;

    /// ## Summary
    /// Looks up one series by identifier.
    ///
    /// ## Errors
    /// Returns an error if the store cannot be queried.
    fn series(&self, id: &str) -> ServiceResult<Option<Series>>;
}

/// ## Summary
/// Series lookups for the duration of one export request.
///
/// The first lookup loads all series in bulk; identifiers missing from the
/// bulk result fall back to a single lookup. Results, including misses, are
/// remembered. Failed queries are logged and reported as no series.
pub struct SeriesCache<'a> {
    catalog: &'a dyn SeriesCatalog,
    entries: HashMap<String, Option<String>>,
    bulk_loaded: bool,
}

impl<'a> SeriesCache<'a> {
    #[must_use]
    pub fn new(catalog: &'a dyn SeriesCatalog) -> Self {
        Self {
            catalog,
            entries: HashMap::new(),
            bulk_loaded: false,
        }
    }

    /// Returns the metadata document of `series_id`, if the series exists.
    pub fn catalog_xml(&mut self, series_id: &str) -> Option<&str> {
        if series_id.trim().is_empty() {
            return None;
        }

        if !self.bulk_loaded {
            match self.catalog.all_series() {
                Ok(all) => {
                    tracing::debug!(count = all.len(), "Loaded series catalogs");
                    self.entries
                        .extend(all.into_iter().map(|s| (s.id, Some(s.catalog_xml))));
                    self.bulk_loaded = true;
                }
                Err(err) => {
                    tracing::error!(series_id, error = %err, "Error loading series catalogs");
                    return None;
                }
            }
        }

        if !self.entries.contains_key(series_id) {
            let found = match self.catalog.series(series_id) {
                Ok(found) => found.map(|s| s.catalog_xml),
                Err(err) => {
                    tracing::error!(series_id, error = %err, "Error loading series catalog");
                    return None;
                }
            };
            self.entries.insert(series_id.to_string(), found);
        }

        self.entries.get(series_id).and_then(Option::as_deref)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ServiceError;
    use std::cell::Cell;

    /// In-memory catalog counting the queries it receives.
    #[derive(Default)]
    pub(crate) struct FakeCatalog {
        pub listed: Vec<Series>,
        pub hidden: Vec<Series>,
        pub fail: bool,
        pub bulk_calls: Cell<usize>,
        pub single_calls: Cell<usize>,
    }

    impl FakeCatalog {
        pub(crate) fn with_series(id: &str, xml: &str) -> Self {
            Self {
                listed: vec![Series {
                    id: id.to_string(),
                    catalog_xml: xml.to_string(),
                }],
                ..Self::default()
            }
        }
    }

    impl SeriesCatalog for FakeCatalog {
        fn all_series(&self) -> ServiceResult<Vec<Series>> {
            self.bulk_calls.set(self.bulk_calls.get() + 1);
            if self.fail {
                return Err(ServiceError::SeriesLookup("store offline".to_string()));
            }
            Ok(self.listed.clone())
        }

        fn series(&self, id: &str) -> ServiceResult<Option<Series>> {
            self.single_calls.set(self.single_calls.get() + 1);
            if self.fail {
                return Err(ServiceError::SeriesLookup("store offline".to_string()));
            }
            Ok(self.hidden.iter().find(|s| s.id == id).cloned())
        }
    }

    #[test]
    fn test_bulk_load_happens_once() {
        let catalog = FakeCatalog::with_series("s1", "<series/>");
        let mut cache = SeriesCache::new(&catalog);

        assert_eq!(cache.catalog_xml("s1"), Some("<series/>"));
        assert_eq!(cache.catalog_xml("s1"), Some("<series/>"));
        assert_eq!(catalog.bulk_calls.get(), 1);
        assert_eq!(catalog.single_calls.get(), 0);
    }

    #[test]
    fn test_miss_falls_back_to_single_lookup_and_is_remembered() {
        let catalog = FakeCatalog {
            hidden: vec![Series {
                id: "s2".to_string(),
                catalog_xml: "<hidden/>".to_string(),
            }],
            ..FakeCatalog::default()
        };
        let mut cache = SeriesCache::new(&catalog);

        assert_eq!(cache.catalog_xml("s2"), Some("<hidden/>"));
        assert_eq!(cache.catalog_xml("missing"), None);
        assert_eq!(cache.catalog_xml("missing"), None);
        assert_eq!(catalog.single_calls.get(), 2);
    }

    #[test_log::test]
    fn test_errors_read_as_no_series() {
        let catalog = FakeCatalog {
            fail: true,
            ..FakeCatalog::with_series("s1", "<series/>")
        };
        let mut cache = SeriesCache::new(&catalog);

        assert_eq!(cache.catalog_xml("s1"), None);
        assert_eq!(cache.catalog_xml(""), None);
        assert_eq!(catalog.bulk_calls.get(), 1);
    }
}
