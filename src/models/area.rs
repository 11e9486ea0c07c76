//! Administrative areas to query.

/// How a region is selected in Overpass: a single ISO 3166-2 region, or
/// the union of individually referenced municipalities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AreaSelector {
    /// One `ISO3166-2` area clause, e.g. `FR-75` for the city of Paris.
    Iso(String),
    /// One `ref:INSEE` area clause per municipality code, in input order.
    Insee(Vec<String>),
}

/// A named region to download, built once from configuration. The name
/// doubles as the output layer name and the cache file stem.
#[derive(Debug, Clone)]
pub struct Area {
    pub name: String,
    pub selector: AreaSelector,
}

impl Area {
    pub fn new(name: impl Into<String>, selector: AreaSelector) -> Self {
        Self {
            name: name.into(),
            selector,
        }
    }
}
