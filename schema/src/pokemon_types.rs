//! Elemental types are kept as the dex spells them ("Fire", "Stellar", ...)
//! rather than as a closed enum, since the upstream feed adds new ones.
//! Every comparison between type names is case-insensitive.

/// Type given to a fusion when the batch contributed no types at all.
pub const FUSION_FALLBACK_TYPE: &str = "Fairy";

pub fn same_type(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// True if `types` contains `wanted`, ignoring case.
pub fn has_type<S: AsRef<str>>(types: &[S], wanted: &str) -> bool {
    types.iter().any(|t| same_type(t.as_ref(), wanted))
}

/// Appends the names in `types` that are not yet in `out`, keeping first-seen
/// spelling and order.
pub fn merge_unique<S: AsRef<str>>(out: &mut Vec<String>, types: &[S]) {
    for t in types {
        if !out.iter().any(|seen| seen == t.as_ref()) {
            out.push(t.as_ref().to_string());
        }
    }
}
