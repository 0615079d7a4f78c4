//! Registry of authored status and ability definitions.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::ability::{AbilityDefinition, AbilityId};
use crate::error::CatalogError;
use crate::status::{StatusDefinition, StatusId};

/// Read-only lookup tables built once before a battle starts.
///
/// Definitions are handed out as `Arc`s so every runtime status instance
/// shares the same immutable definition.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    statuses: BTreeMap<StatusId, Arc<StatusDefinition>>,
    abilities: BTreeMap<AbilityId, Arc<AbilityDefinition>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog, failing on the first duplicate id.
    pub fn from_definitions(
        statuses: impl IntoIterator<Item = StatusDefinition>,
        abilities: impl IntoIterator<Item = AbilityDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for status in statuses {
            catalog.register_status(status)?;
        }
        for ability in abilities {
            catalog.register_ability(ability)?;
        }
        Ok(catalog)
    }

    pub fn register_status(&mut self, definition: StatusDefinition) -> Result<(), CatalogError> {
        if self.statuses.contains_key(&definition.id) {
            return Err(CatalogError::DuplicateStatus(definition.id));
        }
        self.statuses
            .insert(definition.id.clone(), Arc::new(definition));
        Ok(())
    }

    /// Registers an ability. Every status it applies on hit must already be
    /// registered.
    pub fn register_ability(&mut self, definition: AbilityDefinition) -> Result<(), CatalogError> {
        if self.abilities.contains_key(&definition.id) {
            return Err(CatalogError::DuplicateAbility(definition.id));
        }
        if let Some(missing) = definition
            .on_hit
            .iter()
            .find(|application| !self.statuses.contains_key(&application.status))
        {
            return Err(CatalogError::UnknownStatus(missing.status.clone()));
        }
        self.abilities
            .insert(definition.id.clone(), Arc::new(definition));
        Ok(())
    }

    pub fn status(&self, id: &StatusId) -> Result<Arc<StatusDefinition>, CatalogError> {
        self.statuses
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownStatus(id.clone()))
    }

    pub fn ability(&self, id: &AbilityId) -> Result<Arc<AbilityDefinition>, CatalogError> {
        self.abilities
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownAbility(id.clone()))
    }

    pub fn statuses(&self) -> impl Iterator<Item = &Arc<StatusDefinition>> {
        self.statuses.values()
    }

    pub fn abilities(&self) -> impl Iterator<Item = &Arc<AbilityDefinition>> {
        self.abilities.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BattleError, ErrorSeverity};
    use crate::status::StatusEffect;

    #[test]
    fn lookups_share_definitions() {
        let catalog = Catalog::from_definitions(
            [StatusDefinition::new("erosion", StatusEffect::Erosion)],
            [AbilityDefinition::new("strike")],
        )
        .unwrap();

        let a = catalog.status(&"erosion".into()).unwrap();
        let b = catalog.status(&"erosion".into()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(catalog.ability(&"strike".into()).unwrap().name, "strike");
    }

    #[test]
    fn unknown_and_duplicate_ids_are_errors() {
        let mut catalog = Catalog::new();
        catalog
            .register_status(StatusDefinition::new("erosion", StatusEffect::Erosion))
            .unwrap();

        let duplicate = catalog
            .register_status(StatusDefinition::new("erosion", StatusEffect::Erosion))
            .unwrap_err();
        assert_eq!(duplicate, CatalogError::DuplicateStatus("erosion".into()));

        let missing = catalog.ability(&"fireball".into()).unwrap_err();
        assert_eq!(missing.error_code(), "CATALOG_UNKNOWN_ABILITY");
        assert_eq!(missing.severity(), ErrorSeverity::Validation);
        assert_eq!(missing.to_string(), "ability `fireball` is not registered");
    }

    #[test]
    fn abilities_must_reference_known_statuses() {
        let result = Catalog::from_definitions(
            [StatusDefinition::new("erosion", StatusEffect::Erosion)],
            [AbilityDefinition::new("brand").with_status("cinder", 2)],
        );
        assert_eq!(result.unwrap_err(), CatalogError::UnknownStatus("cinder".into()));
    }
}
