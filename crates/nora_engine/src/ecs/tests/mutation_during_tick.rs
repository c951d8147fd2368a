//! Adding and removing entities and components from inside lifecycle hooks

use std::rc::Rc;

use super::{call_log, entries, CallLog, Recorder};
use crate::ecs::{Component, ComponentError, ComponentId, ComponentState, Context, Entity, EntityId, Scene};

const DT: f32 = 0.016;

/// Attaches a `child` recorder to its own entity during `start`
struct Spawner {
    log: CallLog,
}

impl Component for Spawner {
    fn start(&mut self, ctx: &mut Context<'_>) -> Result<(), ComponentError> {
        self.log.borrow_mut().push("spawner.start".to_string());
        ctx.add_component(Recorder::new("child", &self.log))?;
        Ok(())
    }

    fn update(&mut self, _ctx: &mut Context<'_>) -> Result<(), ComponentError> {
        self.log.borrow_mut().push("spawner.update".to_string());
        Ok(())
    }
}

/// Removes another entity on its first update
struct Assassin {
    target: EntityId,
}

impl Component for Assassin {
    fn update(&mut self, ctx: &mut Context<'_>) -> Result<(), ComponentError> {
        ctx.scene_mut().remove_entity(self.target);
        Ok(())
    }
}

/// Removes its own entity on its first update
struct SelfDestruct {
    log: CallLog,
}

impl Component for SelfDestruct {
    fn update(&mut self, ctx: &mut Context<'_>) -> Result<(), ComponentError> {
        let id = ctx.entity_id();
        ctx.scene_mut().remove_entity(id);
        let gone = ctx.entity().is_err() && ctx.transform().is_err();
        self.log.borrow_mut().push(format!("self.update gone={gone}"));
        Ok(())
    }
}

/// Detaches a sibling, or itself when `target` is `None`
struct Detacher {
    target: Option<ComponentId>,
    log: CallLog,
}

impl Component for Detacher {
    fn update(&mut self, ctx: &mut Context<'_>) -> Result<(), ComponentError> {
        self.log.borrow_mut().push("detacher.update".to_string());
        let target = self.target.unwrap_or_else(|| ctx.component_id());
        let returned = ctx.remove_component(target).is_some();
        self.log.borrow_mut().push(format!("returned={returned}"));
        Ok(())
    }
}

/// Takes another entity out of the scene and puts it straight back, once
struct Bouncer {
    target: EntityId,
    done: bool,
}

impl Component for Bouncer {
    fn update(&mut self, ctx: &mut Context<'_>) -> Result<(), ComponentError> {
        if !self.done {
            let entity = ctx
                .scene_mut()
                .remove_entity(self.target)
                .ok_or_else(|| ComponentError::script("target missing"))?;
            ctx.scene_mut().add_entity(entity);
            self.done = true;
        }
        Ok(())
    }
}

/// Detaches a sibling during `start` and attaches it again
struct Rebinder {
    target: Option<ComponentId>,
    log: CallLog,
}

impl Component for Rebinder {
    fn start(&mut self, ctx: &mut Context<'_>) -> Result<(), ComponentError> {
        self.log.borrow_mut().push("rebinder.start".to_string());
        let target = self.target.ok_or_else(|| ComponentError::script("no target"))?;
        let sibling = ctx.remove_component(target).ok_or_else(|| ComponentError::script("sibling missing"))?;
        ctx.add_component(sibling)?;
        Ok(())
    }
}

/// Adds a new entity to the scene on every update
struct Factory {
    log: CallLog,
}

impl Component for Factory {
    fn update(&mut self, ctx: &mut Context<'_>) -> Result<(), ComponentError> {
        let spawned = Entity::new("spawned").with_component(Recorder::new("spawned", &self.log));
        ctx.scene_mut().add_entity(spawned);
        Ok(())
    }
}

#[test]
fn test_component_added_during_start_starts_next_tick() {
    let log = call_log();
    let mut scene = Scene::new();
    let entity = scene.add_entity(Entity::new("E").with_component(Spawner { log: Rc::clone(&log) }));

    scene.tick(DT);
    assert_eq!(entries(&log), ["spawner.start", "spawner.update"]);
    assert_eq!(scene.entity(entity).expect("entity").component_count(), 2);

    scene.tick(DT);
    assert_eq!(
        entries(&log),
        ["spawner.start", "spawner.update", "child.start", "spawner.update", "child.update"]
    );
}

#[test]
fn test_entity_removed_mid_tick_gets_no_more_updates() {
    let log = call_log();
    let mut scene = Scene::new();
    let victim = Entity::new("victim").with_component(Recorder::new("victim", &log));
    let victim_id = victim.id();

    scene.add_entity(Entity::new("assassin").with_component(Assassin { target: victim_id }));
    scene.add_entity(victim);

    let report = scene.tick(DT);
    scene.tick(DT);

    // Started before the update phase, then removed before its own update
    assert_eq!(entries(&log), ["victim.start"]);
    assert_eq!(report.updated, 1);
    assert!(!scene.contains(victim_id));
    assert_eq!(scene.len(), 1);
}

#[test]
fn test_entity_reinserted_mid_tick_waits_for_next_tick() {
    let log = call_log();
    let mut scene = Scene::new();
    let victim = Entity::new("victim").with_component(Recorder::new("victim", &log));
    let victim_id = victim.id();

    scene.add_entity(Entity::new("bouncer").with_component(Bouncer { target: victim_id, done: false }));
    scene.add_entity(victim);

    let report = scene.tick(DT);
    assert_eq!(entries(&log), ["victim.start"]);
    assert_eq!(report.updated, 1);
    assert!(scene.contains(victim_id));

    scene.tick(DT);
    assert_eq!(entries(&log), ["victim.start", "victim.update"]);
}

#[test]
fn test_entity_removing_itself_stops_its_remaining_components() {
    let log = call_log();
    let mut scene = Scene::new();
    let id = scene.add_entity(
        Entity::new("doomed")
            .with_component(SelfDestruct { log: Rc::clone(&log) })
            .with_component(Recorder::new("sibling", &log)),
    );

    scene.tick(DT);
    scene.tick(DT);

    assert_eq!(entries(&log), ["sibling.start", "self.update gone=true"]);
    assert!(scene.entity(id).is_none());
    assert!(scene.is_empty());
}

#[test]
fn test_removed_sibling_is_skipped_in_same_tick() {
    let log = call_log();
    let mut entity = Entity::new("E");
    entity.add_component(Detacher { target: None, log: Rc::clone(&log) }).expect("add");
    let victim = entity.add_component(Recorder::new("victim", &log)).expect("add");
    entity.get_component_mut::<Detacher>().expect("detacher").target = Some(victim);

    let mut scene = Scene::new();
    let id = scene.add_entity(entity);
    scene.tick(DT);
    scene.tick(DT);

    assert_eq!(
        entries(&log),
        ["victim.start", "detacher.update", "returned=true", "detacher.update", "returned=false"]
    );
    let entity = scene.entity(id).expect("entity");
    assert!(entity.get_component::<Recorder>().is_none());
    assert_eq!(entity.component_count(), 1);
}

#[test]
fn test_component_reattached_during_start_starts_next_tick() {
    let log = call_log();
    let mut entity = Entity::new("E");
    entity.add_component(Rebinder { target: None, log: Rc::clone(&log) }).expect("add");
    let sibling = entity.add_component(Recorder::new("B", &log)).expect("add");
    entity.get_component_mut::<Rebinder>().expect("rebinder").target = Some(sibling);

    let mut scene = Scene::new();
    let id = scene.add_entity(entity);

    let report = scene.tick(DT);
    assert_eq!(entries(&log), ["rebinder.start"]);
    assert!(report.is_clean());
    assert_eq!(scene.entity(id).expect("entity").component_state(sibling), Some(ComponentState::Pending));

    scene.tick(DT);
    assert_eq!(entries(&log), ["rebinder.start", "B.start", "B.update"]);
}

#[test]
fn test_component_removing_itself_is_dropped_after_its_call() {
    let log = call_log();
    let mut scene = Scene::new();
    let id = scene.add_entity(
        Entity::new("E")
            .with_component(Detacher { target: None, log: Rc::clone(&log) })
            .with_component(Recorder::new("after", &log)),
    );

    scene.tick(DT);
    scene.tick(DT);

    assert_eq!(
        entries(&log),
        ["after.start", "detacher.update", "returned=false", "after.update", "after.update"]
    );
    let entity = scene.entity(id).expect("entity");
    assert!(entity.get_component::<Detacher>().is_none());
    assert_eq!(entity.component_count(), 1);
}

#[test]
fn test_entity_added_during_update_joins_next_tick() {
    let log = call_log();
    let mut scene = Scene::new();
    scene.add_entity(Entity::new("factory").with_component(Factory { log: Rc::clone(&log) }));

    scene.tick(DT);
    assert_eq!(scene.len(), 2);
    assert!(entries(&log).is_empty());

    scene.tick(DT);
    assert_eq!(scene.len(), 3);
    assert_eq!(entries(&log), ["spawned.start", "spawned.update"]);
}

#[test]
fn test_moved_entity_keeps_started_components() {
    let log = call_log();
    let mut first = Scene::new();
    let id = first.add_entity(Entity::new("traveller").with_component(Recorder::new("T", &log)));
    first.tick(DT);

    let traveller = first.remove_entity(id).expect("traveller");
    let mut second = Scene::new();
    second.add_entity(traveller);
    second.tick(DT);

    assert_eq!(entries(&log), ["T.start", "T.update", "T.update"]);
}
