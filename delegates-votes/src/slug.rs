use regex::Regex;
use std::sync::OnceLock;

static NON_ALNUM: OnceLock<Regex> = OnceLock::new();

/// Derive a nation id from a display name: lowercase, with every run of
/// characters outside `[a-z0-9]` collapsed into one `_`.
///
/// ```
/// use delegates_votes::nation_id_from_name;
///
/// assert_eq!(nation_id_from_name("The Holy Empire of Mei"), "the_holy_empire_of_mei");
/// ```
pub fn nation_id_from_name(name: &str) -> String {
    let re = NON_ALNUM.get_or_init(|| Regex::new("[^a-z0-9]+").expect("static pattern"));
    re.replace_all(&name.to_lowercase(), "_").into_owned()
}
