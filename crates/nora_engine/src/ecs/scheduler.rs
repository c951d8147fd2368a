//! Per-frame lifecycle dispatch
//!
//! One tick runs in two phases:
//!
//! 1. **Start**: every pending component of an active entity gets its single
//!    `start` call.
//! 2. **Update**: every started component of an active entity gets `update`.
//!
//! Each phase works from a snapshot of `(entity, component)` ids taken when
//! the phase begins, in entity-then-component insertion order. Every item is
//! re-validated right before its call, so hooks may add or remove entities
//! and components freely: removals take effect immediately, additions are
//! picked up by the next tick. Re-validation compares attach stamps, so an
//! entity or component that was removed and attached again after the
//! snapshot counts as an addition.

use super::component::{Component, ComponentId};
use super::context::Context;
use super::entity::{latest_attach_stamp, ComponentState, EntityId};
use super::error::{ComponentError, EcsError, LifecyclePhase};
use super::scene::Scene;
use crate::foundation::time::{FrameTime, Stopwatch};
use crate::input::InputState;

/// Outcome of a single tick
#[derive(Debug, Default)]
pub struct TickReport {
    /// Frame number of this tick, starting at 1
    pub frame: u64,

    /// `start` calls made
    pub started: usize,

    /// `update` calls made
    pub updated: usize,

    /// Lifecycle calls that returned an error, as [`EcsError::LifecycleCallFailure`]
    pub failures: Vec<EcsError>,
}

impl TickReport {
    /// Whether every lifecycle call succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl Scene {
    /// Advance one frame of `delta_time` seconds with no input
    pub fn tick(&mut self, delta_time: f32) -> TickReport {
        self.tick_with_input(delta_time, &InputState::default())
    }

    /// Advance one frame of `delta_time` seconds
    pub fn tick_with_input(&mut self, delta_time: f32, input: &InputState) -> TickReport {
        let stopwatch = Stopwatch::start_new();
        let time = self.clock.advance(delta_time);
        let mut report = TickReport {
            frame: time.frame_count,
            ..TickReport::default()
        };

        for phase in [LifecyclePhase::Start, LifecyclePhase::Update] {
            let snapshot = self.snapshot(phase);
            for &(entity, component) in &snapshot.items {
                self.dispatch(entity, component, phase, snapshot.stamp, time, input, &mut report);
            }
        }

        self.ticks += 1;
        self.last_frame_ms = stopwatch.elapsed_millis();

        log::trace!(
            "Frame {}: {} started, {} updated, {} failed",
            report.frame,
            report.started,
            report.updated,
            report.failures.len()
        );
        report
    }

    /// Ids of components due for `phase` on active entities, in dispatch order
    fn snapshot(&self, phase: LifecyclePhase) -> PhaseSnapshot {
        let state = expected_state(phase);
        let items = self
            .entities()
            .filter(|entity| entity.is_active())
            .flat_map(|entity| {
                entity
                    .slots()
                    .iter()
                    .filter(move |slot| slot.state == state && slot.behaviour.is_some())
                    .map(move |slot| (entity.id(), slot.id))
            })
            .collect();

        PhaseSnapshot {
            stamp: latest_attach_stamp(),
            items,
        }
    }

    fn dispatch(
        &mut self,
        entity_id: EntityId,
        component_id: ComponentId,
        phase: LifecyclePhase,
        stamp: u64,
        time: FrameTime,
        input: &InputState,
        report: &mut TickReport,
    ) {
        let Some(entity) = self.entities.get_mut(&entity_id) else {
            return;
        };
        if !entity.is_active() || entity.attached() > stamp {
            return;
        }
        let entity_name = entity.name().to_owned();
        let Some(slot) = entity.slot_mut(component_id) else {
            return;
        };
        if slot.state != expected_state(phase) || slot.attached > stamp {
            return;
        }
        let Some(mut behaviour) = slot.behaviour.take() else {
            return;
        };

        // A start call counts even if it fails
        if phase == LifecyclePhase::Start {
            slot.state = ComponentState::Started;
        }
        let component_name = slot.name;

        let result = {
            let mut ctx = Context::new(self, entity_id, component_id, time, input);
            invoke(behaviour.as_mut(), phase, &mut ctx)
        };

        match phase {
            LifecyclePhase::Start => report.started += 1,
            LifecyclePhase::Update => report.updated += 1,
        }

        match self.entities.get_mut(&entity_id) {
            Some(entity) => entity.restore(component_id, behaviour),
            None => log::debug!("Dropping {component_name} ({component_id}): {entity_id} left the scene during {phase}"),
        }

        if let Err(source) = result {
            let failure = EcsError::LifecycleCallFailure {
                entity: entity_id,
                entity_name,
                component: component_id,
                component_name,
                phase,
                source: Box::new(source),
            };
            log::error!("{failure}");

            if self.config.disable_on_error {
                if let Some(slot) = self.entities.get_mut(&entity_id).and_then(|entity| entity.slot_mut(component_id)) {
                    if slot.state != ComponentState::Removed {
                        slot.state = ComponentState::Disabled;
                        log::warn!("Disabled {component_name} ({component_id}) after failed {phase}");
                    }
                }
            }

            self.lifecycle_failures += 1;
            report.failures.push(failure);
        }
    }
}

/// Work list for one phase
struct PhaseSnapshot {
    /// Latest attach stamp when the list was taken
    stamp: u64,
    items: Vec<(EntityId, ComponentId)>,
}

fn expected_state(phase: LifecyclePhase) -> ComponentState {
    match phase {
        LifecyclePhase::Start => ComponentState::Pending,
        LifecyclePhase::Update => ComponentState::Started,
    }
}

fn invoke(behaviour: &mut dyn Component, phase: LifecyclePhase, ctx: &mut Context<'_>) -> Result<(), ComponentError> {
    match phase {
        LifecyclePhase::Start => behaviour.start(ctx),
        LifecyclePhase::Update => behaviour.update(ctx),
    }
}
