// src/archetype.rs
use crate::content::Archetype;

/// Map the model's archetype choice back to a catalog record.
///
/// Exact match on `name`; anything else (typo, translation, invented name) resolves to the
/// first catalog entry. `None` only for an empty catalog.
pub fn resolve<'a>(name: &str, archetypes: &'a [Archetype]) -> Option<&'a Archetype> {
    archetypes
        .iter()
        .find(|a| a.name == name)
        .or_else(|| archetypes.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arch(name: &str) -> Archetype {
        Archetype {
            name: name.into(),
            description: format!("{name} descrizione"),
            theme: "tema".into(),
            energy: "energia".into(),
        }
    }

    #[test]
    fn exact_name_resolves() {
        let c = vec![arch("Il Mago"), arch("La Luna"), arch("L'Eremita")];
        assert_eq!(resolve("La Luna", &c).unwrap().name, "La Luna");
    }

    #[test]
    fn unknown_name_falls_back_to_first() {
        let c = vec![arch("Il Mago"), arch("La Luna")];
        assert_eq!(resolve("nonexistent-name", &c).unwrap().name, "Il Mago");
    }

    #[test]
    fn match_is_exact_not_case_folded() {
        let c = vec![arch("Il Mago"), arch("La Luna")];
        assert_eq!(resolve("la luna", &c).unwrap().name, "Il Mago");
    }

    #[test]
    fn empty_catalog_yields_none() {
        assert!(resolve("Il Mago", &[]).is_none());
    }
}
