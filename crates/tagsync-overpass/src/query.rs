//! Overpass QL query construction.

/// Build the query fetching every element tagged with `ref_key` inside
/// the named administrative area.
///
/// The recursion clauses pull in parents and children of the matched
/// elements, so ways and relations arrive together with their node
/// geometry. Full meta is requested so the output file can carry element
/// provenance.
pub fn build_query(ref_key: &str, region: &str, timeout_secs: u64) -> String {
    format!(
        "[out:json][timeout:{timeout_secs}];\
         (area[admin_level=2][name={region}];)->.a;\
         (nwr[\"{ref_key}\"](area.a););\
         (._;<;);(._;>;);\
         out meta;"
    )
}
