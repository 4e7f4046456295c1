use serde_json::Value;

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Result of resolving a field path inside a JSON tree.
///
/// `Absent` and `Null` are kept apart: a key that was never written is not the
/// same thing as a key explicitly set to `null`, even though most checks treat
/// both as "not provided".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Absent,
    Null,
    Present(&'a Value),
}

impl<'a> Lookup<'a> {
    /// True when the field resolved to a non-null value. Falsy values such as
    /// `""`, `0` or `false` still count.
    pub fn is_present(&self) -> bool {
        matches!(self, Lookup::Present(_))
    }

    /// True when the field is present and, if it is an array, non-empty.
    pub fn is_filled(&self) -> bool {
        match self {
            Lookup::Present(Value::Array(items)) => !items.is_empty(),
            Lookup::Present(_) => true,
            Lookup::Absent | Lookup::Null => false,
        }
    }

    pub fn value(self) -> Option<&'a Value> {
        match self {
            Lookup::Present(v) => Some(v),
            Lookup::Absent | Lookup::Null => None,
        }
    }
}

/// Resolve a dotted path such as `"charter.scope"` against `root`.
///
/// Traversal short-circuits to `Absent` as soon as a key is missing or an
/// intermediate value is not an object. Only the final segment may resolve to
/// `Null`.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Lookup<'a> {
    let mut current = root;
    for key in path.split('.') {
        let Value::Object(map) = current else {
            return Lookup::Absent;
        };
        match map.get(key) {
            Some(next) => current = next,
            None => return Lookup::Absent,
        }
    }
    if current.is_null() {
        Lookup::Null
    } else {
        Lookup::Present(current)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn top_level_field() {
        let v = json!({ "wbs": [1, 2] });
        assert_eq!(lookup(&v, "wbs"), Lookup::Present(&json!([1, 2])));
        assert_eq!(lookup(&v, "schedule"), Lookup::Absent);
    }

    #[test]
    fn nested_field() {
        let v = json!({ "charter": { "scope": "build the thing" } });
        assert!(lookup(&v, "charter.scope").is_present());
        assert_eq!(lookup(&v, "charter.objectives"), Lookup::Absent);
    }

    #[test]
    fn null_is_distinct_from_absent() {
        let v = json!({ "charter": { "scope": null } });
        assert_eq!(lookup(&v, "charter.scope"), Lookup::Null);
        assert_eq!(lookup(&v, "charter.other"), Lookup::Absent);
    }

    #[test]
    fn non_object_intermediate_is_absent() {
        let v = json!({ "charter": "just a string", "list": [{ "scope": 1 }] });
        assert_eq!(lookup(&v, "charter.scope"), Lookup::Absent);
        assert_eq!(lookup(&v, "list.0"), Lookup::Absent);
    }

    #[test]
    fn null_intermediate_is_absent() {
        let v = json!({ "charter": null });
        assert_eq!(lookup(&v, "charter.scope"), Lookup::Absent);
    }

    #[test]
    fn falsy_values_are_present() {
        let v = json!({ "a": "", "b": 0, "c": false });
        assert!(lookup(&v, "a").is_present());
        assert!(lookup(&v, "b").is_present());
        assert!(lookup(&v, "c").is_present());
    }

    #[test]
    fn empty_array_is_present_but_not_filled() {
        let v = json!({ "wbs": [] });
        let l = lookup(&v, "wbs");
        assert!(l.is_present());
        assert!(!l.is_filled());
    }
}
