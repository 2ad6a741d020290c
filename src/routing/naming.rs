//! Naming conventions mapping service types and operations to routes.
//!
//! # Responsibilities
//! - Type name ↔ resource slug (`app::ProfileService` ↔ `profile`)
//! - Operation name → (verb, method slug) (`getUser` → (`get`, `user`))
//! - Hold the ordered set of verbs recognized as operation prefixes
//!
//! # Design Decisions
//! - Pure functions, no state besides `KnownVerbs`
//! - Verb prefixes are tried in registration order and the first hit wins,
//!   not the longest. An operation named `get` maps to (`get`, `""`)
//! - Namespaces use Rust path syntax (`::`)

use crate::error::ConfigurationError;

/// Trailing word identifying a type as a service handler.
pub const MARKER_WORD: &str = "Service";

/// Separator between namespace segments in a fully-qualified type name.
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Verbs recognized out of the box, in priority order.
pub const DEFAULT_VERBS: [&str; 8] = [
    "options", "get", "head", "post", "put", "delete", "trace", "connect",
];

/// Ordered, lower-cased set of verbs used for operation-prefix matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownVerbs {
    verbs: Vec<String>,
}

impl KnownVerbs {
    /// Append a verb. Already-known verbs keep their original position.
    pub fn register(&mut self, verb: &str) -> Result<(), ConfigurationError> {
        if verb.is_empty() || !verb.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigurationError::InvalidVerb(verb.to_string()));
        }
        let verb = verb.to_ascii_lowercase();
        if !self.contains(&verb) {
            self.verbs.push(verb);
        }
        Ok(())
    }

    pub fn contains(&self, verb: &str) -> bool {
        self.verbs.iter().any(|v| v.eq_ignore_ascii_case(verb))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.verbs.iter().map(String::as_str)
    }
}

impl Default for KnownVerbs {
    fn default() -> Self {
        Self {
            verbs: DEFAULT_VERBS.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// Last `::` segment of a type name.
pub fn short_type_name(type_name: &str) -> &str {
    type_name
        .rsplit(NAMESPACE_SEPARATOR)
        .next()
        .unwrap_or(type_name)
}

/// Strip the marker word from a type name and lower-case what remains.
pub fn type_name_to_resource_slug(type_name: &str) -> Result<String, ConfigurationError> {
    short_type_name(type_name)
        .strip_suffix(MARKER_WORD)
        .filter(|stem| !stem.is_empty())
        .map(str::to_lowercase)
        .ok_or_else(|| ConfigurationError::NotAServiceType(type_name.to_string()))
}

/// Build the type name a resource slug would come from.
pub fn resource_slug_to_type_name(slug: &str, namespace: Option<&str>) -> String {
    let mut chars = slug.chars();
    let stem = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    match namespace {
        Some(ns) => format!("{ns}{NAMESPACE_SEPARATOR}{stem}{MARKER_WORD}"),
        None => format!("{stem}{MARKER_WORD}"),
    }
}

/// Resolve an operation name into its verb and method slug.
///
/// Returns `None` when no known verb prefixes the name; such operations are not routed.
pub fn operation_to_verb_and_slug(operation: &str, verbs: &KnownVerbs) -> Option<(String, String)> {
    verbs.iter().find_map(|verb| {
        let head = operation.get(..verb.len())?;
        if head.eq_ignore_ascii_case(verb) {
            Some((verb.to_string(), operation[verb.len()..].to_lowercase()))
        } else {
            None
        }
    })
}

/// Whether `type_name` follows the service naming convention.
///
/// With a namespace filter the name must also live under `namespace::`.
pub fn is_service_type_name(type_name: &str, namespace: Option<&str>) -> bool {
    let local = match namespace {
        Some(ns) => match type_name
            .strip_prefix(ns)
            .and_then(|rest| rest.strip_prefix(NAMESPACE_SEPARATOR))
        {
            Some(rest) => rest,
            None => return false,
        },
        None => type_name,
    };
    local.split(NAMESPACE_SEPARATOR).all(is_identifier) && local.ends_with(MARKER_WORD)
}

/// Whether any of `type_names` lives under `namespace::`.
pub fn namespace_is_declared<'a>(
    namespace: &str,
    mut type_names: impl Iterator<Item = &'a str>,
) -> bool {
    let prefix = format!("{namespace}{NAMESPACE_SEPARATOR}");
    type_names.any(|name| name.starts_with(&prefix))
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name_to_slug() {
        assert_eq!(type_name_to_resource_slug("ProfileService").unwrap(), "profile");
        assert_eq!(
            type_name_to_resource_slug("api::v1::UserAccountService").unwrap(),
            "useraccount"
        );
        assert!(type_name_to_resource_slug("Profile").is_err());
        assert!(type_name_to_resource_slug("Service").is_err());
        assert!(type_name_to_resource_slug("ServiceProfile").is_err());
    }

    #[test]
    fn test_slug_round_trip() {
        for slug in ["profile", "orders", "x", "useraccount"] {
            let name = resource_slug_to_type_name(slug, None);
            assert_eq!(type_name_to_resource_slug(&name).unwrap(), slug);
            let scoped = resource_slug_to_type_name(slug, Some("app::api"));
            assert_eq!(type_name_to_resource_slug(&scoped).unwrap(), slug);
        }
        assert_eq!(resource_slug_to_type_name("profile", Some("app")), "app::ProfileService");
    }

    #[test]
    fn test_operation_resolution() {
        let verbs = KnownVerbs::default();
        assert_eq!(
            operation_to_verb_and_slug("getUser", &verbs),
            Some(("get".into(), "user".into()))
        );
        assert_eq!(
            operation_to_verb_and_slug("DeleteAllItems", &verbs),
            Some(("delete".into(), "allitems".into()))
        );
        assert_eq!(
            operation_to_verb_and_slug("get", &verbs),
            Some(("get".into(), "".into()))
        );
        assert_eq!(operation_to_verb_and_slug("fetchUser", &verbs), None);
        assert_eq!(operation_to_verb_and_slug("ge", &verbs), None);
    }

    #[test]
    fn test_every_default_verb_prefix() {
        let verbs = KnownVerbs::default();
        for verb in DEFAULT_VERBS {
            let op = format!("{verb}Thing");
            assert_eq!(
                operation_to_verb_and_slug(&op, &verbs),
                Some((verb.to_string(), "thing".to_string()))
            );
        }
    }

    #[test]
    fn test_registration_order_tie_break() {
        let mut verbs = KnownVerbs::default();
        verbs.register("getall").unwrap();
        // "get" was registered first, so it wins over the longer "getall".
        assert_eq!(
            operation_to_verb_and_slug("getAllUsers", &verbs),
            Some(("get".into(), "allusers".into()))
        );

        verbs.register("PATCH").unwrap();
        assert_eq!(
            operation_to_verb_and_slug("patchUser", &verbs),
            Some(("patch".into(), "user".into()))
        );
    }

    #[test]
    fn test_register_rejects_invalid_verbs() {
        let mut verbs = KnownVerbs::default();
        assert!(verbs.register("").is_err());
        assert!(verbs.register("get-all").is_err());
        verbs.register("GET").unwrap();
        assert_eq!(verbs.iter().count(), DEFAULT_VERBS.len());
    }

    #[test]
    fn test_service_type_name_convention() {
        assert!(is_service_type_name("ProfileService", None));
        assert!(is_service_type_name("app::ProfileService", None));
        assert!(is_service_type_name("app::ProfileService", Some("app")));
        assert!(!is_service_type_name("ProfileService", Some("app")));
        assert!(!is_service_type_name("application::ProfileService", Some("app")));
        assert!(!is_service_type_name("ProfileHandler", None));
        assert!(!is_service_type_name("9Service", None));
    }

    #[test]
    fn test_namespace_is_declared() {
        let names = ["app::ProfileService", "other::Thing"];
        assert!(namespace_is_declared("app", names.iter().copied()));
        assert!(!namespace_is_declared("ap", names.iter().copied()));
        assert!(!namespace_is_declared("missing", names.iter().copied()));
    }
}
