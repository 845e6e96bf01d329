//! Per-equipment weapon state: magazine, cooldown, reload gate and aim.
//!
//! Every guard rejection is silent. A session can always get back to a state
//! where it fires again once its guards are satisfied.

use std::time::Duration;

use glam::{Vec2, Vec3};
use log::trace;
use serde::{Deserialize, Serialize};

use crate::config::REFERENCE_FRAME;
use crate::ids::{EquipmentId, ProjectileId, SessionId};
use crate::projectile::Projectile;
use crate::trajectory;
use crate::weapon::{WeaponKind, WeaponProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReloadState {
    Ready,
    Reloading {
        started_at: Duration,
        completes_at: Duration,
        ticket: u64,
    },
}

/// Handed out when a reload starts; the reload completes only for the ticket
/// that started it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadTicket {
    pub session: SessionId,
    pub ticket: u64,
    pub due_at: Duration,
}

/// Current angles chase the target angles a fraction per tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AimState {
    pub yaw: f32,
    pub pitch: f32,
    pub target_yaw: f32,
    pub target_pitch: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSession {
    pub id: SessionId,
    pub equipment: EquipmentId,
    pub kind: WeaponKind,
    pub position: Vec3,
    pub heading: f32,
    ammo: u32,
    last_fire: Option<Duration>,
    reload: ReloadState,
    next_ticket: u64,
    aim: AimState,
    move_axis: Vec2,
    trigger_held: bool,
    shot_requested: bool,
}

impl WeaponSession {
    pub fn new(
        id: SessionId,
        equipment: EquipmentId,
        kind: WeaponKind,
        position: Vec3,
        heading: f32,
    ) -> Self {
        let profile = kind.profile();
        let mut session = Self {
            id,
            equipment,
            kind,
            position,
            heading,
            ammo: profile.max_ammo,
            last_fire: None,
            reload: ReloadState::Ready,
            next_ticket: 0,
            aim: AimState::default(),
            move_axis: Vec2::ZERO,
            trigger_held: false,
            shot_requested: false,
        };
        // Start inside the limits (artillery cannot point below 0.1 rad).
        session.set_aim_target(0.0, 0.0);
        session.aim.yaw = session.aim.target_yaw;
        session.aim.pitch = session.aim.target_pitch;
        session
    }

    pub fn profile(&self) -> &'static WeaponProfile {
        self.kind.profile()
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn max_ammo(&self) -> u32 {
        self.profile().max_ammo
    }

    pub fn reload_state(&self) -> ReloadState {
        self.reload
    }

    pub fn is_reloading(&self) -> bool {
        matches!(self.reload, ReloadState::Reloading { .. })
    }

    pub fn last_fire(&self) -> Option<Duration> {
        self.last_fire
    }

    pub fn aim(&self) -> AimState {
        self.aim
    }

    pub fn move_axis(&self) -> Vec2 {
        self.move_axis
    }

    /// Ammo left, not reloading, and the fire interval has passed.
    pub fn can_fire(&self, now: Duration) -> bool {
        if self.ammo == 0 || self.is_reloading() {
            return false;
        }
        match self.last_fire {
            Some(last) => now.saturating_sub(last) >= self.profile().fire_interval,
            None => true,
        }
    }

    /// Fires one round if the guards pass, returning the spawned projectile.
    pub fn try_fire(&mut self, now: Duration, id: ProjectileId) -> Option<Projectile> {
        if !self.can_fire(now) {
            trace!(
                "{} fire rejected (ammo {}, reloading {})",
                self.id,
                self.ammo,
                self.is_reloading()
            );
            return None;
        }

        // 1. Spend the round and restart the fire interval.
        self.ammo -= 1;
        self.last_fire = Some(now);

        // 2. Launch along the smoothed aim, not the target aim.
        let profile = self.profile();
        let (origin, direction) = self.muzzle();
        let ballistics = profile.projectile.ballistics();

        Some(Projectile {
            id,
            kind: profile.projectile,
            weapon: self.kind,
            owner: self.id,
            position: origin,
            velocity: direction * profile.muzzle_speed,
            spawned_at: now,
            ttl: ballistics.max_lifetime,
        })
    }

    /// Starts a reload if the magazine is not full and no reload is running.
    pub fn try_reload(&mut self, now: Duration) -> Option<ReloadTicket> {
        if self.ammo >= self.max_ammo() || self.is_reloading() {
            trace!("{} reload rejected", self.id);
            return None;
        }

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        let completes_at = now + self.profile().reload_duration;
        self.reload = ReloadState::Reloading {
            started_at: now,
            completes_at,
            ticket,
        };

        Some(ReloadTicket {
            session: self.id,
            ticket,
            due_at: completes_at,
        })
    }

    /// Refills the magazine if `ticket` belongs to the running reload.
    pub fn complete_reload(&mut self, ticket: u64) -> bool {
        match self.reload {
            // Tickets from an earlier reload are ignored.
            ReloadState::Reloading { ticket: current, .. } if current == ticket => {
                self.ammo = self.max_ammo();
                self.reload = ReloadState::Ready;
                true
            }
            _ => false,
        }
    }

    pub fn press_trigger(&mut self) {
        self.trigger_held = true;
        self.shot_requested = true;
    }

    pub fn release_trigger(&mut self) {
        self.trigger_held = false;
    }

    /// Whether this tick should attempt a shot. Automatic weapons keep firing
    /// while held; others fire once per trigger press.
    pub fn take_trigger_pull(&mut self) -> bool {
        // A press and release inside one tick still counts as a shot.
        let requested = std::mem::take(&mut self.shot_requested);
        if self.profile().automatic {
            self.trigger_held || requested
        } else {
            requested
        }
    }

    /// Sets the aim target, clamped to the weapon's limits.
    pub fn set_aim_target(&mut self, yaw: f32, pitch: f32) {
        let aim = &self.profile().aim;
        self.aim.target_yaw = yaw.clamp(aim.min_yaw, aim.max_yaw);
        self.aim.target_pitch = pitch.clamp(aim.min_pitch, aim.max_pitch);
    }

    /// Maps a pointer offset from the screen center (each axis in [-1, 1], y
    /// pointing down) onto the aim target.
    pub fn aim_at_pointer(&mut self, offset: Vec2) {
        let aim = &self.profile().aim;
        let offset = offset.clamp(Vec2::NEG_ONE, Vec2::ONE);
        self.set_aim_target(
            offset.x * aim.pointer_yaw_scale,
            -offset.y * aim.pointer_pitch_scale,
        );
    }

    /// Moves the aim target by a relative pointer motion.
    pub fn nudge_aim(&mut self, dx: f32, dy: f32) {
        let scale = self.profile().aim.delta_scale;
        self.set_aim_target(
            self.aim.target_yaw + dx * scale,
            self.aim.target_pitch - dy * scale,
        );
    }

    /// One smoothing step towards the target angles.
    pub fn smooth_aim(&mut self) {
        let smoothing = self.profile().aim.smoothing;
        self.aim.yaw += (self.aim.target_yaw - self.aim.yaw) * smoothing;
        self.aim.pitch += (self.aim.target_pitch - self.aim.pitch) * smoothing;
    }

    pub fn set_move_axis(&mut self, axis: Vec2) {
        self.move_axis = axis.clamp(Vec2::NEG_ONE, Vec2::ONE);
    }

    /// Turns and drives the platform for `dt` seconds.
    pub fn advance_platform(&mut self, dt: f32) {
        let profile = self.profile();
        self.heading += self.move_axis.x * profile.turn_rate * dt;
        self.position += forward(self.heading) * self.move_axis.y * profile.platform_speed * dt;
    }

    /// Current platform speed in world units per second.
    pub fn speed(&self) -> f32 {
        self.move_axis.y.abs() * self.profile().platform_speed
    }

    /// Muzzle position and unit firing direction for the current aim.
    pub fn muzzle(&self) -> (Vec3, Vec3) {
        let profile = self.profile();
        let origin = self.position + Vec3::Y * profile.muzzle_height;
        (origin, aim_direction(self.heading + self.aim.yaw, self.aim.pitch))
    }

    /// Where a shot fired now would come down, ignoring targets.
    pub fn predicted_landing(&self) -> Vec3 {
        let (origin, direction) = self.muzzle();
        trajectory::predict_landing(origin, direction, self.kind, REFERENCE_FRAME)
    }
}

// --- Geometry ---

fn forward(heading: f32) -> Vec3 {
    Vec3::new(heading.sin(), 0.0, heading.cos())
}

/// Unit vector for a world yaw (around +Y, 0 facing +Z) and pitch (up positive).
pub fn aim_direction(yaw: f32, pitch: f32) -> Vec3 {
    let (sin_pitch, cos_pitch) = pitch.sin_cos();
    Vec3::new(yaw.sin() * cos_pitch, sin_pitch, yaw.cos() * cos_pitch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn make_session(kind: WeaponKind) -> WeaponSession {
        WeaponSession::new(SessionId(1), EquipmentId(7), kind, Vec3::ZERO, 0.0)
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn fire_respects_the_interval() {
        let mut tank = make_session(WeaponKind::Tank);

        let shell = tank.try_fire(ms(0), ProjectileId(1));
        assert!(shell.is_some(), "First shot needs no cooldown");
        assert_eq!(tank.ammo(), 39);

        assert!(tank.try_fire(ms(1499), ProjectileId(2)).is_none(), "Still cooling down");
        assert!(tank.try_fire(ms(1500), ProjectileId(3)).is_some(), "Interval is inclusive");
        assert_eq!(tank.ammo(), 38);
    }

    #[test]
    fn empty_magazine_rejects_fire() {
        let mut pistol = make_session(WeaponKind::Pistol);
        pistol.ammo = 0;

        assert!(pistol.try_fire(ms(10_000), ProjectileId(1)).is_none());
        assert_eq!(pistol.ammo(), 0);
        assert_eq!(pistol.last_fire(), None);
    }

    #[test]
    fn reload_gates_firing_until_its_ticket_completes() {
        let mut tank = make_session(WeaponKind::Tank);
        tank.ammo = 5;

        let ticket = tank.try_reload(ms(0)).expect("reload should start");
        assert_eq!(ticket.due_at, ms(4000));
        assert!(tank.try_reload(ms(100)).is_none(), "Reload while reloading is a no-op");
        assert!(tank.try_fire(ms(2000), ProjectileId(1)).is_none(), "Reload gate");

        assert!(!tank.complete_reload(ticket.ticket + 1), "Foreign ticket ignored");
        assert!(tank.is_reloading());

        assert!(tank.complete_reload(ticket.ticket));
        assert_eq!(tank.ammo(), 40);
        assert_eq!(tank.reload_state(), ReloadState::Ready);
        assert!(!tank.complete_reload(ticket.ticket), "Stale completion does nothing");
    }

    #[test]
    fn full_magazine_rejects_reload() {
        let mut rifle = make_session(WeaponKind::Rifle);
        assert!(rifle.try_reload(ms(0)).is_none());
        assert!(!rifle.is_reloading());
    }

    #[test]
    fn pointer_aim_is_clamped_to_the_turret_limits() {
        let mut tank = make_session(WeaponKind::Tank);
        tank.aim_at_pointer(Vec2::new(3.0, -5.0));
        let aim = tank.aim();
        assert_eq!(aim.target_yaw, FRAC_PI_2);
        assert_eq!(aim.target_pitch, 0.25);

        tank.aim_at_pointer(Vec2::new(-1.0, 1.0));
        assert_eq!(tank.aim().target_yaw, -FRAC_PI_2);
        assert_eq!(tank.aim().target_pitch, -0.15);
    }

    #[test]
    fn aim_eases_towards_the_target() {
        let mut tank = make_session(WeaponKind::Tank);
        tank.set_aim_target(1.0, 0.2);

        tank.smooth_aim();
        let aim = tank.aim();
        assert!((aim.yaw - 0.15).abs() < 1e-6, "First step covers 15%");
        assert!((aim.pitch - 0.03).abs() < 1e-6);

        for _ in 0..200 {
            tank.smooth_aim();
        }
        assert!((tank.aim().yaw - 1.0).abs() < 1e-4);
    }

    #[test]
    fn artillery_starts_inside_its_elevation_window() {
        let gun = make_session(WeaponKind::Artillery);
        assert_eq!(gun.aim().pitch, 0.1);
        assert_eq!(gun.aim().target_pitch, 0.1);
    }

    #[test]
    fn semi_automatic_weapons_fire_once_per_press() {
        let mut pistol = make_session(WeaponKind::Pistol);
        pistol.press_trigger();
        assert!(pistol.take_trigger_pull());
        assert!(!pistol.take_trigger_pull(), "Holding does not refire");

        let mut rifle = make_session(WeaponKind::Rifle);
        rifle.press_trigger();
        assert!(rifle.take_trigger_pull());
        assert!(rifle.take_trigger_pull(), "Automatic fire while held");
        rifle.release_trigger();
        assert!(!rifle.take_trigger_pull());
    }

    #[test]
    fn shells_leave_the_muzzle_along_the_aim() {
        let mut tank = make_session(WeaponKind::Tank);
        tank.heading = FRAC_PI_2;
        let shell = tank.try_fire(ms(0), ProjectileId(9)).expect("shot");

        assert_eq!(shell.owner, SessionId(1));
        assert_eq!(shell.position, Vec3::new(0.0, 2.2, 0.0));
        assert!((shell.velocity - Vec3::new(2.5, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn platform_drives_along_its_heading() {
        let mut tank = make_session(WeaponKind::Tank);
        tank.set_move_axis(Vec2::new(0.0, 2.0));
        assert_eq!(tank.speed(), 8.0, "Axis is clamped to 1");

        tank.advance_platform(0.5);
        assert!((tank.position - Vec3::new(0.0, 0.0, 4.0)).length() < 1e-5);
    }
}
