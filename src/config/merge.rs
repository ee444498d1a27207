use crate::config::errors::ConfigError;
use tracing::debug;

/// Resolves one parameter from its two sources.
///
/// A command-line value is authoritative and `lookup` is never called for it. Otherwise
/// the document is queried and an absent element is a structural error naming `element`.
pub fn merge<T, F>(override_value: Option<T>, element: &str, lookup: F) -> Result<T, ConfigError>
where
    F: FnOnce() -> Option<T>,
{
    match override_value {
        Some(value) => {
            debug!(element, "taken from the command line");
            Ok(value)
        }
        None => lookup().ok_or_else(|| ConfigError::MissingElement(element.to_string())),
    }
}

/// Like [`merge`], for parameters whose absence in both sources is not an error.
pub fn merge_optional<T, F>(override_value: Option<T>, lookup: F) -> Option<T>
where
    F: FnOnce() -> Option<T>,
{
    override_value.or_else(lookup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_override_wins_without_consulting_document() {
        let consulted = Cell::new(false);
        let value = merge(Some(480), "subpopulation_size", || {
            consulted.set(true);
            Some(96)
        })
        .unwrap();
        assert_eq!(value, 480);
        assert!(!consulted.get());
    }

    #[test]
    fn test_document_fallback() {
        assert_eq!(merge(None, "generations", || Some(50)).unwrap(), 50);
    }

    #[test]
    fn test_missing_everywhere_is_structural() {
        let err = merge::<i64, _>(None, "tournament_size", || None).unwrap_err();
        match err {
            ConfigError::MissingElement(element) => assert_eq!(element, "tournament_size"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_merge_optional() {
        assert_eq!(merge_optional(None, || Some(3)), Some(3));
        assert_eq!(merge_optional(Some(1), || Some(3)), Some(1));
        assert_eq!(merge_optional::<i64, _>(None, || None), None);
    }
}
