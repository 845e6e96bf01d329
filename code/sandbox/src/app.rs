use std::time::Duration;

use engine::{
    EngineConfig, EquipmentId, HudThrottle, SessionId, SimEvent, SimulationState, TickReport,
};
use glam::{Vec2, Vec3};
use tracing::{debug, info};

use crate::config::{Args, SandboxError};
use crate::controls::{ControlAdapter, ControlMode, RawInput};
use crate::layout;
use crate::scenery::SceneryRegistry;

pub const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);
const PLAYER_EQUIPMENT: EquipmentId = EquipmentId(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    Running,
    /// The operated session has been closed.
    Finished,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub ticks: u64,
    pub shots: u32,
    pub hits: u32,
    pub destroyed: u32,
    pub reloads: u32,
}

pub struct SandboxApp {
    sim: SimulationState,
    scenery: SceneryRegistry,
    hud: HudThrottle,
    controls: ControlAdapter,
    session: SessionId,
    stats: RunStats,
    finished: bool,
}

impl SandboxApp {
    pub fn new(args: &Args) -> Result<Self, SandboxError> {
        let config = EngineConfig::default();
        let hud = HudThrottle::new(config.hud_interval);
        let mut sim = SimulationState::new(config);
        let mut scenery = SceneryRegistry::new();
        layout::populate(args.seed, args.targets, args.scenery, &mut sim, &mut scenery)?;

        let mode = ControlMode::from(args.equipment);
        let spawn = match mode {
            ControlMode::Fighter => Vec3::new(0.0, 40.0, -20.0),
            _ => Vec3::ZERO,
        };
        let session = sim.open_session(PLAYER_EQUIPMENT, args.equipment, spawn, 0.0)?;
        info!(
            %session,
            equipment = %args.equipment,
            targets = sim.targets().len(),
            scenery = scenery.objects().len(),
            "Sandbox ready"
        );

        Ok(Self {
            sim,
            scenery,
            hud,
            controls: ControlAdapter::new(mode, VIEWPORT),
            session,
            stats: RunStats::default(),
            finished: false,
        })
    }

    pub fn control_mode(&self) -> ControlMode {
        self.controls.mode()
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn simulation(&self) -> &SimulationState {
        &self.sim
    }

    pub fn scenery(&self) -> &SceneryRegistry {
        &self.scenery
    }

    /// Translates a raw input and queues it for the next tick.
    pub fn handle_input(&mut self, input: RawInput) {
        if self.finished {
            return;
        }
        if let Some(intent) = self.controls.translate(input) {
            debug!(?intent, "Queued");
            self.sim.enqueue(self.session, intent);
        }
    }

    pub fn tick(&mut self, delta: Duration) -> TickStatus {
        if self.finished {
            return TickStatus::Finished;
        }

        let report = self.sim.tick(delta);
        self.stats.ticks = report.tick;
        report.forward_explosions(&mut self.scenery);
        self.record(&report);

        if !self.finished && self.hud.ready(report.now) {
            if let Some(hud) = self.sim.hud_snapshot(self.session) {
                debug!(
                    ammo = hud.ammo,
                    max_ammo = hud.max_ammo,
                    reloading = hud.reloading,
                    yaw = hud.yaw,
                    pitch = hud.pitch,
                    speed = hud.speed,
                    landing = ?hud.predicted_landing,
                    "HUD"
                );
            }
        }

        if self.finished {
            TickStatus::Finished
        } else {
            TickStatus::Running
        }
    }

    fn record(&mut self, report: &TickReport) {
        for event in &report.events {
            match event {
                SimEvent::Fired { .. } => self.stats.shots += 1,
                SimEvent::Hit {
                    target,
                    damage,
                    new_health,
                    ..
                } => {
                    self.stats.hits += 1;
                    debug!(%target, damage, new_health, "Hit");
                }
                SimEvent::Destroyed { target } => {
                    self.stats.destroyed += 1;
                    info!(%target, "Target destroyed");
                }
                SimEvent::ReloadStarted { due_at, .. } => {
                    self.stats.reloads += 1;
                    info!(?due_at, "Reloading");
                }
                SimEvent::ReloadCompleted { .. } => info!("Reload complete"),
                SimEvent::SessionClosed { session } if *session == self.session => {
                    info!(%session, "Left the equipment");
                    self.finished = true;
                }
                _ => {}
            }
        }
    }
}
