use async_trait::async_trait;
use tracing::warn;

use battle_core::{AbilityContext, AbilityDefinition, AbilityId, HexCell, ItemRef, UnitId};

use super::BattleAction;
use crate::api::{ActionError, Collaborator};
use crate::context::BattleContext;
use crate::events::BattleEvent;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Invocation {
    /// Targets fixed up front by the caller.
    Prepared(AbilityContext),
    /// Targets resolved from the caster's cell when the action runs.
    Aimed {
        caster: UnitId,
        ability: AbilityId,
        target: HexCell,
        item: Option<ItemRef>,
    },
}

/// Cast an ability, then consume its source item if it is consume-on-use.
///
/// Valid when the caster exists, is alive and has an ability charge left.
/// Executing spends one charge. Item consumption always happens after the
/// ability runner has finished.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbilityAction {
    invocation: Invocation,
}

impl AbilityAction {
    /// Cast against an explicit context.
    pub fn new(context: AbilityContext) -> Self {
        Self {
            invocation: Invocation::Prepared(context),
        }
    }

    /// Cast at `target`; affected cells and units are resolved at execution
    /// time, after any earlier movement has finished.
    pub fn aimed(caster: UnitId, ability: impl Into<AbilityId>, target: HexCell) -> Self {
        Self {
            invocation: Invocation::Aimed {
                caster,
                ability: ability.into(),
                target,
                item: None,
            },
        }
    }

    pub fn from_item(mut self, item: ItemRef) -> Self {
        match &mut self.invocation {
            Invocation::Prepared(context) => context.source_item = Some(item),
            Invocation::Aimed { item: slot, .. } => *slot = Some(item),
        }
        self
    }

    pub fn ability(&self) -> &AbilityId {
        match &self.invocation {
            Invocation::Prepared(context) => &context.ability,
            Invocation::Aimed { ability, .. } => ability,
        }
    }

    fn consumes_item(&self) -> bool {
        match &self.invocation {
            Invocation::Prepared(context) => context.consumable_item().is_some(),
            Invocation::Aimed { item, .. } => item.is_some_and(|item| item.consume_on_use),
        }
    }

    fn resolve_context(
        &self,
        definition: &AbilityDefinition,
        battle: &BattleContext,
        origin: HexCell,
    ) -> AbilityContext {
        match &self.invocation {
            Invocation::Prepared(context) => context.clone(),
            Invocation::Aimed {
                caster,
                ability,
                target,
                item,
            } => {
                let cells = match battle.services().targeting.as_ref() {
                    Some(targeting) => targeting.affected_cells(definition, *target),
                    None => target.within(definition.radius),
                };
                let mut context = AbilityContext::new(*caster, ability.clone(), origin)
                    .with_targets(battle.units_in(&cells))
                    .with_cells(cells);
                context.source_item = *item;
                context
            }
        }
    }
}

#[async_trait]
impl BattleAction for AbilityAction {
    fn name(&self) -> &'static str {
        "ability"
    }

    fn actor(&self) -> UnitId {
        match &self.invocation {
            Invocation::Prepared(context) => context.caster,
            Invocation::Aimed { caster, .. } => *caster,
        }
    }

    fn is_valid(&self, battle: &BattleContext) -> bool {
        let Some(handle) = battle.unit(self.actor()) else {
            return false;
        };
        let Ok(definition) = battle.catalog().ability(self.ability()) else {
            return false;
        };
        if self.consumes_item() && battle.services().inventory.is_none() {
            return false;
        }

        handle.read(|unit| {
            let in_range = match &self.invocation {
                Invocation::Prepared(_) => true,
                Invocation::Aimed { target, .. } => definition.in_range(unit.cell, *target),
            };
            unit.is_alive() && unit.has_charge() && in_range
        })
    }

    async fn execute(&self, battle: &BattleContext) -> Result<(), ActionError> {
        let caster = self.actor();
        let handle = battle
            .unit(caster)
            .ok_or(ActionError::UnknownUnit(caster))?;
        let definition = battle.catalog().ability(self.ability())?;
        let runner = battle
            .services()
            .abilities
            .clone()
            .ok_or(ActionError::MissingCollaborator(Collaborator::AbilityRunner))?;

        let origin = handle.write(|unit| unit.spend_charge().then_some(unit.cell));
        let origin = origin.ok_or(ActionError::NoCharges(caster))?;

        let context = self.resolve_context(&definition, battle, origin);
        runner.run(&definition, &context, battle).await?;

        if let Some(item) = context.consumable_item() {
            let inventory = battle
                .services()
                .inventory
                .clone()
                .ok_or(ActionError::MissingCollaborator(Collaborator::Inventory))?;
            if inventory.consume_item(caster, item, 1) {
                battle.publish(BattleEvent::ItemConsumed {
                    owner: caster,
                    item,
                });
            } else {
                warn!(
                    target: "runtime::action",
                    unit = %caster,
                    item = %item,
                    "Inventory had nothing to consume"
                );
            }
        }

        Ok(())
    }
}
