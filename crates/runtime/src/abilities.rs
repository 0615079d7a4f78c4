//! Default ability effect sequence.
use async_trait::async_trait;
use tracing::debug;

use battle_core::{AbilityContext, AbilityDefinition, CombatResult, UnitId, resolve_with_rules};

use crate::api::{AbilityRunner, ActionError};
use crate::context::BattleContext;
use crate::events::BattleEvent;

/// Resolves the ability against each target unit in order.
///
/// For every living target: roll the attack (abilities without a damage
/// profile always land), apply the damage through the target's damage entry
/// point, then apply the ability's on-hit statuses. A miss skips both.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardAbilityRunner;

impl StandardAbilityRunner {
    fn strike(
        &self,
        ability: &AbilityDefinition,
        caster: UnitId,
        target: UnitId,
        battle: &BattleContext,
    ) -> Result<(), ActionError> {
        let attacker = battle
            .unit(caster)
            .ok_or(ActionError::UnknownUnit(caster))?;
        let defender = battle
            .unit(target)
            .ok_or(ActionError::UnknownUnit(target))?;
        if !defender.is_alive() {
            return Ok(());
        }

        let result = match &ability.damage {
            Some(damage) => {
                let attacker_stats = attacker.read(|unit| unit.snapshot());
                let defender_stats = defender.read(|unit| unit.snapshot());
                let rules = battle.config().combat;
                battle.with_rng(|rng| {
                    resolve_with_rules(&attacker_stats, &defender_stats, damage, &rules, rng)
                })
            }
            None => CombatResult {
                is_hit: true,
                ..CombatResult::MISS
            },
        };

        battle.publish(BattleEvent::AttackResolved {
            attacker: caster,
            defender: target,
            ability: ability.id.clone(),
            result,
        });

        if !result.is_hit {
            debug!(
                target: "runtime::ability",
                ability = %ability.id,
                attacker = %caster,
                defender = %target,
                "Attack missed"
            );
            return Ok(());
        }

        if ability.damage.is_some() {
            let (taken, remaining) = defender.write(|unit| {
                let taken = unit.take_damage(result.final_damage, Some(caster));
                (taken, unit.core.health)
            });
            battle.publish(BattleEvent::UnitDamaged {
                unit: target,
                amount: taken.dealt,
                remaining,
                source: Some(caster),
            });
            if taken.defeated {
                battle.publish(BattleEvent::UnitDefeated { unit: target });
                return Ok(());
            }
        }

        for application in &ability.on_hit {
            let definition = battle.catalog().status(&application.status)?;
            let outcome = defender
                .write(|unit| unit.apply_status(definition, application.stacks, Some(caster)));
            battle.publish(BattleEvent::StatusApplied {
                unit: target,
                status: application.status.clone(),
                stacks: application.stacks,
                outcome,
                source: Some(caster),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl AbilityRunner for StandardAbilityRunner {
    async fn run(
        &self,
        ability: &AbilityDefinition,
        invocation: &AbilityContext,
        battle: &BattleContext,
    ) -> Result<(), ActionError> {
        debug!(
            target: "runtime::ability",
            ability = %ability.id,
            caster = %invocation.caster,
            targets = invocation.target_units().len(),
            "Running ability"
        );

        for &target in invocation.target_units() {
            self.strike(ability, invocation.caster, target, battle)?;
            tokio::task::yield_now().await;
        }
        Ok(())
    }
}
