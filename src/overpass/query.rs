//! Overpass QL query construction.

use crate::models::AreaSelector;

/// Server-side query timeout, seconds. Large areas are slow to resolve.
pub const TIMEOUT_SECS: u32 = 600;

const AMENITY: &str = "place_of_worship";

/// Build the full Overpass query for one area selector.
///
/// The area clauses are collected into the query-local set `.a`, the
/// amenity filter runs over nodes, ways and relations within that set,
/// and `out center` collapses ways and relations to their representative
/// center point. Codes are interpolated as-is; an empty municipality
/// list yields a valid query with an empty area set.
pub fn build_query(selector: &AreaSelector) -> String {
    let mut query = format!("[out:json][timeout:{}];", TIMEOUT_SECS);
    query.push_str(&format!("({})->.a;", area_clauses(selector)));
    query.push_str(&format!(
        "(node[\"amenity\"=\"{a}\"](area.a); way[\"amenity\"=\"{a}\"](area.a); rel[\"amenity\"=\"{a}\"](area.a););",
        a = AMENITY
    ));
    query.push_str("out center; ");
    query
}

fn area_clauses(selector: &AreaSelector) -> String {
    match selector {
        AreaSelector::Iso(code) => format!("area[\"ISO3166-2\"=\"{}\"];", code),
        AreaSelector::Insee(codes) => codes
            .iter()
            .map(|code| format!("area[\"ref:INSEE\"=\"{}\"];", code))
            .collect(),
    }
}
