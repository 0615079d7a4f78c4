mod common;

use std::sync::Arc;

use battle_core::{
    AbilityContext, AbilityId, AttributeBonuses, HexCell, ItemId, ItemRef, ScriptedRandom, UnitId,
};
use battle_runtime::{
    AbilityAction, BattleContext, BattleEvent, PathAction, QueueError, QueueReport, StepAction,
};

use common::{
    CountingInventory, InstantMover, ManualMover, ManualRunner, catalog, drain, settle, unit,
};

fn manual_battle(mover: Arc<ManualMover>, runner: Arc<ManualRunner>) -> Arc<BattleContext> {
    let ctx = BattleContext::builder()
        .catalog(catalog())
        .unit(unit(1, 0, HexCell::ORIGIN))
        .unit(unit(2, 1, HexCell::new(2, 0)))
        .mover(mover)
        .ability_runner(runner)
        .build()
        .unwrap();
    Arc::new(ctx)
}

#[tokio::test]
async fn queue_runs_valid_actions_in_order_and_waits_for_completions() {
    let mover = Arc::new(ManualMover::default());
    let runner = Arc::new(ManualRunner::default());
    let ctx = manual_battle(mover.clone(), runner.clone());
    let mut events = ctx.events().subscribe();

    // Step 2 is not adjacent once step 1 lands; the strike only reaches unit 2
    // after step 1.
    ctx.queue().enqueue(StepAction::new(UnitId(1), HexCell::new(1, 0)));
    ctx.queue().enqueue(StepAction::new(UnitId(1), HexCell::new(3, 0)));
    ctx.queue()
        .enqueue(AbilityAction::aimed(UnitId(1), "strike", HexCell::new(2, 0)));

    let task = tokio::spawn({
        let ctx = ctx.clone();
        async move { ctx.queue().run_all(&ctx).await }
    });

    settle(|| mover.pending() == 1).await;
    assert!(ctx.queue().is_running());
    assert!(runner.started().is_empty());

    assert!(mover.finish_next());
    settle(|| runner.waiting() == 1).await;
    assert_eq!(runner.started(), vec![AbilityId::from("strike")]);
    assert!(!task.is_finished());

    assert!(runner.release_next());
    let report = task.await.unwrap().unwrap();

    assert_eq!(
        report,
        QueueReport {
            executed: 2,
            skipped: 1,
            failed: 0,
        }
    );
    assert!(ctx.queue().is_empty());
    assert!(!ctx.queue().is_running());

    let caster = ctx.unit(UnitId(1)).unwrap().snapshot();
    assert_eq!(caster.cell, HexCell::new(1, 0));
    assert_eq!(caster.core.stride, 2);
    assert_eq!(caster.charges, 0);

    let events = drain(&mut events);
    assert_eq!(
        events,
        vec![
            BattleEvent::UnitMoved {
                unit: UnitId(1),
                from: HexCell::ORIGIN,
                to: HexCell::new(1, 0),
            },
            BattleEvent::ActionCompleted {
                unit: UnitId(1),
                action: "step",
            },
            BattleEvent::ActionSkipped {
                unit: UnitId(1),
                action: "step",
            },
            BattleEvent::ActionCompleted {
                unit: UnitId(1),
                action: "ability",
            },
        ]
    );
}

#[tokio::test]
async fn second_pass_is_rejected_and_late_enqueues_join_the_running_pass() {
    let mover = Arc::new(ManualMover::default());
    let runner = Arc::new(ManualRunner::default());
    let ctx = manual_battle(mover.clone(), runner);

    ctx.queue().enqueue(StepAction::new(UnitId(1), HexCell::new(0, 1)));
    let task = tokio::spawn({
        let ctx = ctx.clone();
        async move { ctx.queue().run_all(&ctx).await }
    });
    settle(|| mover.pending() == 1).await;

    assert_eq!(
        ctx.queue().run_all(&ctx).await,
        Err(QueueError::AlreadyRunning)
    );

    ctx.queue().enqueue(StepAction::new(UnitId(1), HexCell::ORIGIN));
    assert!(mover.finish_next());
    settle(|| mover.pending() == 1).await;
    assert!(mover.finish_next());

    let report = task.await.unwrap().unwrap();
    assert_eq!(report.executed, 2);
    assert_eq!(ctx.unit(UnitId(1)).unwrap().cell(), HexCell::ORIGIN);
    assert_eq!(ctx.unit(UnitId(1)).unwrap().read(|u| u.core.stride), 1);
}

#[tokio::test]
async fn dropped_completion_fails_the_action_and_the_queue_moves_on() {
    let mover = Arc::new(ManualMover::default());
    let runner = Arc::new(ManualRunner::default());
    let ctx = manual_battle(mover.clone(), runner);
    let mut events = ctx.events().subscribe();

    ctx.queue().enqueue(StepAction::new(UnitId(1), HexCell::new(1, 0)));
    ctx.queue().enqueue(StepAction::new(UnitId(1), HexCell::new(0, 1)));
    let task = tokio::spawn({
        let ctx = ctx.clone();
        async move { ctx.queue().run_all(&ctx).await }
    });

    settle(|| mover.pending() == 1).await;
    assert!(mover.abandon_next());
    settle(|| mover.pending() == 1).await;
    assert!(mover.finish_next());

    let report = task.await.unwrap().unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(report.executed, 1);
    assert_eq!(ctx.unit(UnitId(1)).unwrap().cell(), HexCell::new(0, 1));

    let failures: Vec<_> = drain(&mut events)
        .into_iter()
        .filter(|event| matches!(event, BattleEvent::ActionFailed { .. }))
        .collect();
    assert_eq!(failures.len(), 1);
}

#[tokio::test]
async fn refused_step_completes_without_moving() {
    let ctx = BattleContext::builder()
        .unit(unit(1, 0, HexCell::ORIGIN))
        .mover(Arc::new(ManualMover::refusing()))
        .build()
        .unwrap();

    ctx.queue().enqueue(StepAction::new(UnitId(1), HexCell::new(1, 0)));
    let report = ctx.queue().run_all(&ctx).await.unwrap();

    assert_eq!(report.executed, 1);
    let unit = ctx.unit(UnitId(1)).unwrap().snapshot();
    assert_eq!(unit.cell, HexCell::ORIGIN);
    assert_eq!(unit.core.stride, 3);
}

#[tokio::test]
async fn actions_without_their_collaborator_are_skipped() {
    let ctx = BattleContext::builder()
        .catalog(catalog())
        .unit(unit(1, 0, HexCell::ORIGIN))
        .unit(unit(2, 1, HexCell::new(1, 0)))
        .build()
        .unwrap();

    ctx.queue().enqueue(StepAction::new(UnitId(1), HexCell::new(0, 1)));
    ctx.queue().enqueue(PathAction::new(UnitId(1), vec![HexCell::new(0, 1)]));
    ctx.queue().enqueue(
        AbilityAction::aimed(UnitId(1), "strike", HexCell::new(1, 0))
            .from_item(ItemRef::consumable(ItemId(3))),
    );

    let report = ctx.queue().run_all(&ctx).await.unwrap();
    assert_eq!(report.skipped, 3);
    assert_eq!(ctx.unit(UnitId(2)).unwrap().read(|u| u.core.health), 100);
}

#[tokio::test]
async fn path_spends_stride_per_cell_unless_sprinting() {
    let ctx = BattleContext::builder()
        .unit(unit(1, 0, HexCell::ORIGIN))
        .mover(Arc::new(InstantMover))
        .build()
        .unwrap();

    let path = vec![HexCell::new(1, 0), HexCell::new(2, 0)];
    ctx.queue().enqueue(PathAction::new(UnitId(1), path));
    ctx.queue().enqueue(PathAction::new(UnitId(1), Vec::new()));
    let report = ctx.queue().run_all(&ctx).await.unwrap();

    assert_eq!(report.executed, 1);
    assert_eq!(report.skipped, 1);
    let unit = ctx.unit(UnitId(1)).unwrap().snapshot();
    assert_eq!(unit.cell, HexCell::new(2, 0));
    assert_eq!(unit.core.stride, 1);
}

#[tokio::test]
async fn consumable_item_is_spent_after_the_ability_resolves() {
    let inventory = Arc::new(CountingInventory::with_stock(UnitId(1), ItemId(7), 1));
    let ctx = BattleContext::builder()
        .catalog(catalog())
        .unit(unit(1, 0, HexCell::ORIGIN))
        .unit(unit(2, 1, HexCell::new(1, 0)))
        .inventory(inventory.clone())
        // hit roll, then a crit roll above the 10% crit chance
        .random_source(ScriptedRandom::new([0.0, 0.99]))
        .build()
        .unwrap();
    let mut events = ctx.events().subscribe();

    ctx.queue().enqueue(
        AbilityAction::aimed(UnitId(1), "strike", HexCell::new(1, 0))
            .from_item(ItemRef::consumable(ItemId(7))),
    );
    let report = ctx.queue().run_all(&ctx).await.unwrap();

    assert_eq!(report.executed, 1);
    assert_eq!(inventory.count(UnitId(1), ItemId(7)), 0);
    assert_eq!(ctx.unit(UnitId(2)).unwrap().read(|u| u.core.health), 90);

    let events = drain(&mut events);
    let damaged = events
        .iter()
        .position(|e| matches!(e, BattleEvent::UnitDamaged { amount: 10, .. }))
        .unwrap();
    let consumed = events
        .iter()
        .position(|e| {
            matches!(
                e,
                BattleEvent::ItemConsumed {
                    owner: UnitId(1),
                    item: ItemId(7),
                }
            )
        })
        .unwrap();
    assert!(damaged < consumed);
}

#[tokio::test]
async fn consumable_item_is_spent_even_when_the_ability_misses() {
    let inventory = Arc::new(CountingInventory::with_stock(UnitId(1), ItemId(7), 2));
    let bonuses = AttributeBonuses {
        evasion: 100,
        ..AttributeBonuses::new()
    };
    let evasive = unit(2, 1, HexCell::new(1, 0)).with_bonuses(bonuses);
    let ctx = BattleContext::builder()
        .catalog(catalog())
        .unit(unit(1, 0, HexCell::ORIGIN))
        .unit(evasive)
        .inventory(inventory.clone())
        // hit chance is 5; a draw of 99.9 misses
        .random_source(ScriptedRandom::new([0.999]))
        .build()
        .unwrap();
    let mut events = ctx.events().subscribe();

    let prepared = AbilityContext::new(UnitId(1), "strike", HexCell::ORIGIN)
        .with_targets([UnitId(2)])
        .with_cells([HexCell::new(1, 0)])
        .with_item(ItemRef::consumable(ItemId(7)));
    ctx.queue().enqueue(AbilityAction::new(prepared));
    let report = ctx.queue().run_all(&ctx).await.unwrap();

    assert_eq!(report.executed, 1);
    assert_eq!(inventory.count(UnitId(1), ItemId(7)), 1);
    assert_eq!(ctx.unit(UnitId(2)).unwrap().read(|u| u.core.health), 100);

    let events = drain(&mut events);
    let missed = events
        .iter()
        .any(|e| matches!(e, BattleEvent::AttackResolved { result, .. } if !result.is_hit));
    let damaged = events
        .iter()
        .any(|e| matches!(e, BattleEvent::UnitDamaged { .. }));
    assert!(missed);
    assert!(!damaged);
    assert!(events.contains(&BattleEvent::ItemConsumed {
        owner: UnitId(1),
        item: ItemId(7),
    }));
}

#[tokio::test]
async fn consumable_item_is_spent_when_no_target_is_left() {
    let inventory = Arc::new(CountingInventory::with_stock(UnitId(1), ItemId(3), 1));
    let ctx = BattleContext::builder()
        .catalog(catalog())
        .unit(unit(1, 0, HexCell::ORIGIN))
        .unit(unit(2, 1, HexCell::new(1, 0)))
        .inventory(inventory.clone())
        .build()
        .unwrap();
    ctx.unit(UnitId(2)).unwrap().write(|u| u.core.health = 0);

    let prepared = AbilityContext::new(UnitId(1), "strike", HexCell::ORIGIN)
        .with_targets([UnitId(2)])
        .with_item(ItemRef::consumable(ItemId(3)));
    ctx.queue().enqueue(AbilityAction::new(prepared));
    let report = ctx.queue().run_all(&ctx).await.unwrap();

    assert_eq!(report.executed, 1);
    assert_eq!(inventory.count(UnitId(1), ItemId(3)), 0);
}

#[tokio::test]
async fn ability_without_charges_is_skipped() {
    let ctx = BattleContext::builder()
        .catalog(catalog())
        .unit(unit(1, 0, HexCell::ORIGIN))
        .unit(unit(2, 1, HexCell::new(1, 0)))
        .random_source(ScriptedRandom::new([0.0, 0.99, 0.0, 0.99]))
        .build()
        .unwrap();

    ctx.queue()
        .enqueue(AbilityAction::aimed(UnitId(1), "strike", HexCell::new(1, 0)));
    ctx.queue()
        .enqueue(AbilityAction::aimed(UnitId(1), "strike", HexCell::new(1, 0)));
    ctx.queue()
        .enqueue(AbilityAction::aimed(UnitId(1), "strike", HexCell::new(3, 0)));
    let report = ctx.queue().run_all(&ctx).await.unwrap();

    assert_eq!(report.executed, 1);
    assert_eq!(report.skipped, 2);
    assert_eq!(ctx.unit(UnitId(2)).unwrap().read(|u| u.core.health), 90);
}
