// Registry - Name lookup for templates, modifications and drummer profiles
// Explicit name tables; nothing is discovered at runtime

use crate::modifications::{DrummerProfile, Modification};
use crate::templates::Template;

pub fn template_names() -> &'static [&'static str] {
    &Template::NAMES
}

pub fn modification_names() -> &'static [&'static str] {
    &Modification::NAMES
}

pub fn profile_names() -> &'static [&'static str] {
    &DrummerProfile::BUILT_IN
}

/// Template with default parameters
pub fn template(name: &str) -> Option<Template> {
    Template::from_name(name)
}

/// Modification with default parameters
pub fn modification(name: &str) -> Option<Modification> {
    Modification::from_name(name)
}

pub fn profile(name: &str) -> Option<DrummerProfile> {
    DrummerProfile::built_in(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_name_constructs() {
        for name in template_names() {
            assert_eq!(template(name).map(|t| t.name()), Some(*name));
        }
        for name in modification_names() {
            assert_eq!(modification(name).map(|m| m.name()), Some(*name));
        }
        for name in profile_names() {
            assert_eq!(profile(name).map(|p| p.name), Some(name.to_string()));
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(template("Basic_Groove").is_some());
        assert!(modification("HEAVY_ACCENTS").is_some());
        assert!(profile("Bonham").is_some());
    }

    #[test]
    fn test_unknown_names() {
        assert!(template("polka").is_none());
        assert!(modification("drunk").is_none());
        assert!(profile("animal").is_none());
        assert_eq!(template_names().len(), 7);
        assert_eq!(modification_names().len(), 12);
        assert_eq!(profile_names().len(), 7);
    }
}
