use std::collections::BTreeMap;
use std::time::Duration;

use glam::Vec3;
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};

use crate::collision::{self, CollisionOutcome, ExpiryReason};
use crate::config::EngineConfig;
use crate::damage::{self, ExplosionEvent, ExplosionSink};
use crate::error::EngineError;
use crate::ids::{EquipmentId, ProjectileId, SessionId, TargetId};
use crate::intent::{Intent, IntentQueue, QueuedIntent, TimerQueue};
use crate::kinematics::{clamp_step, integrate, is_finite_state, ProjectileKind};
use crate::projectile::Projectile;
use crate::session::WeaponSession;
use crate::snapshot::{ExplosionVisual, HudSnapshot, RenderSnapshot};
use crate::target::{TargetCategory, TargetExtent, TargetRegistry};
use crate::weapon::WeaponKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetireReason {
    GroundImpact,
    TargetHit(TargetId),
    Timeout,
    OutOfBounds,
    NonFinite,
    /// Dropped together with the session that fired it.
    SessionClosed,
}

/// One-shot notifications for the UI/audio layers (not persistent state).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    SessionOpened {
        session: SessionId,
        weapon: WeaponKind,
    },
    SessionClosed {
        session: SessionId,
    },
    Fired {
        session: SessionId,
        projectile: ProjectileId,
    },
    ReloadStarted {
        session: SessionId,
        due_at: Duration,
    },
    ReloadCompleted {
        session: SessionId,
    },
    ProjectileRetired {
        projectile: ProjectileId,
        reason: RetireReason,
    },
    Hit {
        target: TargetId,
        damage: f32,
        new_health: f32,
        source: Option<SessionId>,
    },
    Destroyed {
        target: TargetId,
    },
    TargetRemoved {
        target: TargetId,
    },
}

pub struct TickReport {
    pub tick: u64,
    pub now: Duration,
    pub events: Vec<SimEvent>,
    /// Explosions resolved this tick, for registries the engine does not own.
    pub explosions: Vec<ExplosionEvent>,
}

impl TickReport {
    pub fn forward_explosions(&self, sink: &mut impl ExplosionSink) {
        for explosion in &self.explosions {
            sink.on_explosion(explosion);
        }
    }
}

/// The single owner of all mutable simulation state.
///
/// Outside code only enqueues intents; they are applied at the start of the
/// next [`tick`](SimulationState::tick). Reload completions go through the same
/// queue via timers keyed on the simulation clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    config: EngineConfig,
    clock: Duration,
    tick: u64,
    sessions: BTreeMap<SessionId, WeaponSession>,
    projectiles: Vec<Projectile>,
    targets: TargetRegistry,
    explosions: Vec<ExplosionVisual>,
    intents: IntentQueue,
    timers: TimerQueue,
    /// Events raised outside a tick, reported by the next one.
    lifecycle: Vec<SimEvent>,
    next_session_id: u64,
    next_projectile_id: u64,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl SimulationState {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            clock: Duration::ZERO,
            tick: 0,
            sessions: BTreeMap::new(),
            projectiles: Vec::new(),
            targets: TargetRegistry::new(),
            explosions: Vec::new(),
            intents: IntentQueue::default(),
            timers: TimerQueue::default(),
            lifecycle: Vec::new(),
            next_session_id: 1,
            next_projectile_id: 1,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn now(&self) -> Duration {
        self.clock
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn session(&self, id: SessionId) -> Option<&WeaponSession> {
        self.sessions.get(&id)
    }

    pub fn sessions(&self) -> impl Iterator<Item = &WeaponSession> {
        self.sessions.values()
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn targets(&self) -> &TargetRegistry {
        &self.targets
    }

    /// Places a target in the world. Only used while setting up a scene.
    pub fn spawn_target(
        &mut self,
        category: TargetCategory,
        position: Vec3,
        max_health: f32,
        extent: TargetExtent,
    ) -> Result<TargetId, EngineError> {
        self.targets.spawn(category, position, max_health, extent)
    }

    /// Takes control of a piece of equipment.
    pub fn open_session(
        &mut self,
        equipment: EquipmentId,
        weapon: WeaponKind,
        position: Vec3,
        heading: f32,
    ) -> Result<SessionId, EngineError> {
        if let Some(busy) = self.sessions.values().find(|s| s.equipment == equipment) {
            return Err(EngineError::EquipmentInUse {
                equipment,
                session: busy.id,
            });
        }

        let id = SessionId(self.next_session_id);
        self.next_session_id += 1;
        self.sessions
            .insert(id, WeaponSession::new(id, equipment, weapon, position, heading));
        info!("{id} opened: {weapon} on {equipment}");
        self.lifecycle.push(SimEvent::SessionOpened {
            session: id,
            weapon,
        });
        Ok(id)
    }

    /// Tears a session down together with its projectiles, queued intents and
    /// timers. Other sessions are untouched.
    ///
    /// The dropped projectiles are reported as retired, followed by
    /// [`SimEvent::SessionClosed`], in the next tick report.
    pub fn close_session(&mut self, id: SessionId) -> Result<(), EngineError> {
        self.sessions
            .remove(&id)
            .ok_or(EngineError::UnknownSession(id))?;

        let lifecycle = &mut self.lifecycle;
        self.projectiles.retain(|projectile| {
            if projectile.owner != id {
                return true;
            }
            lifecycle.push(SimEvent::ProjectileRetired {
                projectile: projectile.id,
                reason: RetireReason::SessionClosed,
            });
            false
        });
        self.intents.discard_session(id);
        self.timers.discard_session(id);
        lifecycle.push(SimEvent::SessionClosed { session: id });
        info!("{id} closed");
        Ok(())
    }

    /// Queues an intent for the next tick. Intents for unknown sessions are
    /// dropped when the tick applies them.
    pub fn enqueue(&mut self, session: SessionId, intent: Intent) {
        self.intents.push(session, intent);
    }

    /// Advances the world by `delta`.
    ///
    /// The clock moves by the full delta; integration uses the delta clamped
    /// to `config.max_step`.
    pub fn tick(&mut self, delta: Duration) -> TickReport {
        self.clock += delta;
        self.tick += 1;
        let now = self.clock;
        let step = clamp_step(delta, self.config.max_step).as_secs_f32();

        // --- Input ---
        // 1. Opens and closes made between ticks come first.
        let mut events = std::mem::take(&mut self.lifecycle);

        // 2. Due reload timers join the queue behind the player's intents.
        self.timers.release_due(now, &mut self.intents);
        for queued in self.intents.drain() {
            self.apply_intent(queued, &mut events);
        }
        // 3. Sessions closed by ExitMode above.
        events.append(&mut self.lifecycle);

        // --- Simulation ---
        self.run_sessions(now, step, &mut events);
        let explosions = self.step_projectiles(now, step, &mut events);

        for explosion in &explosions {
            self.apply_explosion(explosion, &mut events);
        }

        // --- Cleanup ---
        let lifetime = self.config.explosion_lifetime;
        self.explosions
            .retain(|visual| now.saturating_sub(visual.started_at) < lifetime);

        for target in self.targets.purge_destroyed(now, self.config.destroy_delay) {
            events.push(SimEvent::TargetRemoved { target });
        }

        TickReport {
            tick: self.tick,
            now,
            events,
            explosions,
        }
    }

    fn apply_intent(&mut self, queued: QueuedIntent, events: &mut Vec<SimEvent>) {
        let QueuedIntent { session: id, intent } = queued;
        let now = self.clock;

        if intent == Intent::ExitMode {
            // A second ExitMode in the same batch finds nothing to close.
            if let Err(err) = self.close_session(id) {
                trace!("{err}");
            }
            return;
        }

        let Some(session) = self.sessions.get_mut(&id) else {
            trace!("dropping {intent:?} for unknown {id}");
            return;
        };

        match intent {
            Intent::MoveAxis(axis) if axis.is_finite() => session.set_move_axis(axis),
            Intent::FireDown => session.press_trigger(),
            Intent::FireUp => session.release_trigger(),
            Intent::ReloadPressed => {
                if let Some(ticket) = session.try_reload(now) {
                    debug!("{id} reloading until {:?}", ticket.due_at);
                    self.timers.schedule(
                        ticket.due_at,
                        id,
                        Intent::ReloadComplete {
                            ticket: ticket.ticket,
                        },
                    );
                    events.push(SimEvent::ReloadStarted {
                        session: id,
                        due_at: ticket.due_at,
                    });
                }
            }
            Intent::AimDelta { dx, dy } if dx.is_finite() && dy.is_finite() => {
                session.nudge_aim(dx, dy)
            }
            Intent::AimPointer(offset) if offset.is_finite() => session.aim_at_pointer(offset),
            Intent::AimDirection { yaw, pitch } if yaw.is_finite() && pitch.is_finite() => {
                session.set_aim_target(yaw, pitch)
            }
            Intent::ReloadComplete { ticket } => {
                if session.complete_reload(ticket) {
                    debug!("{id} reloaded");
                    events.push(SimEvent::ReloadCompleted { session: id });
                }
            }
            other => warn!("ignoring degenerate {other:?} for {id}"),
        }
    }

    fn run_sessions(&mut self, now: Duration, step: f32, events: &mut Vec<SimEvent>) {
        for session in self.sessions.values_mut() {
            session.smooth_aim();
            session.advance_platform(step);

            if !session.take_trigger_pull() {
                continue;
            }
            let id = ProjectileId(self.next_projectile_id);
            if let Some(projectile) = session.try_fire(now, id) {
                self.next_projectile_id += 1;
                debug!("{} fired {:?} {:?}", session.id, projectile.kind, id);
                events.push(SimEvent::Fired {
                    session: session.id,
                    projectile: id,
                });
                self.projectiles.push(projectile);
            }
        }
    }

    /// Moves every projectile once and retires the ones that hit something or
    /// ran out of time. Returns the explosions they caused.
    fn step_projectiles(
        &mut self,
        now: Duration,
        step: f32,
        events: &mut Vec<SimEvent>,
    ) -> Vec<ExplosionEvent> {
        let targets = &self.targets;
        let mut explosions = Vec::new();

        self.projectiles.retain_mut(|projectile| {
            // 1. Integrate, unless the state is already broken.
            let ballistics = projectile.ballistics();
            let before_ok = is_finite_state(projectile.position, projectile.velocity);
            if before_ok {
                (projectile.position, projectile.velocity) =
                    integrate(projectile.position, projectile.velocity, ballistics, step);
            }
            if !before_ok || !is_finite_state(projectile.position, projectile.velocity) {
                warn!("dropping {:?} with non-finite state", projectile.id);
                events.push(SimEvent::ProjectileRetired {
                    projectile: projectile.id,
                    reason: RetireReason::NonFinite,
                });
                return false;
            }

            // 2. Classify the new position. Only terminal outcomes fall through.
            let profile = projectile.weapon.profile();
            let (reason, blast) = match collision::detect(projectile, now, targets, profile.hit_test)
            {
                CollisionOutcome::NoHit => return true,
                CollisionOutcome::GroundImpact(point) => {
                    // Bullets just stop in the dirt.
                    let blast = (projectile.kind != ProjectileKind::HitscanBullet).then_some(point);
                    (RetireReason::GroundImpact, blast)
                }
                CollisionOutcome::TargetHit { target, impact } => {
                    // Every kind, bullets included, blasts at the target's reference point.
                    (RetireReason::TargetHit(target), Some(impact))
                }
                CollisionOutcome::Expired {
                    point,
                    reason,
                    detonates,
                } => {
                    let reason = match reason {
                        ExpiryReason::Timeout => RetireReason::Timeout,
                        ExpiryReason::OutOfBounds => RetireReason::OutOfBounds,
                    };
                    // Shells and missiles go off in the air; bullets vanish.
                    (reason, detonates.then_some(point))
                }
            };

            // 3. Blast with the weapon's numbers, credited to the shooter.
            if let Some(position) = blast {
                explosions.push(ExplosionEvent {
                    position,
                    damage: profile.damage,
                    radius: profile.blast_radius,
                    timestamp: now,
                    falloff: profile.falloff,
                    source: Some(projectile.owner),
                });
            }
            events.push(SimEvent::ProjectileRetired {
                projectile: projectile.id,
                reason,
            });
            false
        });

        explosions
    }

    fn apply_explosion(&mut self, explosion: &ExplosionEvent, events: &mut Vec<SimEvent>) {
        self.explosions.push(ExplosionVisual {
            position: explosion.position,
            radius: explosion.radius,
            started_at: explosion.timestamp,
        });

        for report in damage::resolve(explosion, &mut self.targets, explosion.falloff) {
            events.push(SimEvent::Hit {
                target: report.target,
                damage: report.damage_applied,
                new_health: report.new_health,
                source: explosion.source,
            });
            if report.destroyed {
                info!("{} destroyed", report.target);
                events.push(SimEvent::Destroyed {
                    target: report.target,
                });
            }
        }
    }

    pub fn render_snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            projectiles: self.projectiles.iter().map(Into::into).collect(),
            explosions: self
                .explosions
                .iter()
                .map(|visual| visual.view(self.clock))
                .collect(),
            targets: self.targets.iter().map(Into::into).collect(),
        }
    }

    pub fn hud_snapshot(&self, session: SessionId) -> Option<HudSnapshot> {
        self.sessions.get(&session).map(HudSnapshot::from)
    }
}
