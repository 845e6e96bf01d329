//! Static equipment tables, read once when a session is opened.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::collision::HitTest;
use crate::damage::FalloffPolicy;
use crate::kinematics::ProjectileKind;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString, Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum WeaponKind {
    Rifle,
    Pistol,
    Tank,
    Fighter,
    Artillery,
}

/// Angular limits and input mapping for a weapon's aim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimProfile {
    pub min_yaw: f32,
    pub max_yaw: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
    /// Radians of yaw for a pointer at the right edge of the screen.
    pub pointer_yaw_scale: f32,
    /// Radians of pitch for a pointer at the top edge of the screen.
    pub pointer_pitch_scale: f32,
    /// Radians per unit of relative pointer motion.
    pub delta_scale: f32,
    pub smoothing: f32,
}

/// Numbers shown on the HUD next to the ammo counter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatBlock {
    pub damage: f32,
    pub armor: Option<f32>,
    pub range: Option<f32>,
    pub accuracy: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponProfile {
    pub projectile: ProjectileKind,
    /// World units per reference frame.
    pub muzzle_speed: f32,
    /// Muzzle height above the platform position.
    pub muzzle_height: f32,
    pub damage: f32,
    pub blast_radius: f32,
    pub max_ammo: u32,
    pub fire_interval: Duration,
    pub reload_duration: Duration,
    /// Keeps firing while the trigger is held.
    pub automatic: bool,
    pub aim: AimProfile,
    pub hit_test: HitTest,
    pub falloff: FalloffPolicy,
    /// Platform speed in world units per second.
    pub platform_speed: f32,
    /// Platform turn rate in radians per second.
    pub turn_rate: f32,
    pub stats: StatBlock,
}

const AIM_SMOOTHING: f32 = 0.15;

const RIFLE: WeaponProfile = WeaponProfile {
    projectile: ProjectileKind::HitscanBullet,
    muzzle_speed: 6.0,
    muzzle_height: 1.5,
    damage: 35.0,
    blast_radius: 0.5,
    max_ammo: 30,
    fire_interval: Duration::from_millis(100),
    reload_duration: Duration::from_millis(2500),
    automatic: true,
    aim: AimProfile {
        min_yaw: -0.6,
        max_yaw: 0.6,
        min_pitch: -0.3,
        max_pitch: 0.5,
        pointer_yaw_scale: 0.6,
        pointer_pitch_scale: 0.5,
        delta_scale: 0.002,
        smoothing: AIM_SMOOTHING,
    },
    hit_test: HitTest::Sphere,
    falloff: FalloffPolicy::UnflooredLinear,
    platform_speed: 5.0,
    turn_rate: 2.0,
    stats: StatBlock {
        damage: 35.0,
        armor: None,
        range: Some(400.0),
        accuracy: Some(0.85),
    },
};

const PISTOL: WeaponProfile = WeaponProfile {
    projectile: ProjectileKind::HitscanBullet,
    muzzle_speed: 4.5,
    muzzle_height: 1.5,
    damage: 25.0,
    blast_radius: 0.5,
    max_ammo: 12,
    fire_interval: Duration::from_millis(250),
    reload_duration: Duration::from_millis(2000),
    automatic: false,
    aim: AimProfile {
        min_yaw: -0.6,
        max_yaw: 0.6,
        min_pitch: -0.3,
        max_pitch: 0.5,
        pointer_yaw_scale: 0.6,
        pointer_pitch_scale: 0.5,
        delta_scale: 0.002,
        smoothing: AIM_SMOOTHING,
    },
    hit_test: HitTest::Sphere,
    falloff: FalloffPolicy::UnflooredLinear,
    platform_speed: 5.0,
    turn_rate: 2.0,
    stats: StatBlock {
        damage: 25.0,
        armor: None,
        range: Some(50.0),
        accuracy: Some(0.75),
    },
};

const TANK: WeaponProfile = WeaponProfile {
    projectile: ProjectileKind::BallisticShell,
    muzzle_speed: 2.5,
    muzzle_height: 2.2,
    damage: 250.0,
    blast_radius: 20.0,
    max_ammo: 40,
    fire_interval: Duration::from_millis(1500),
    reload_duration: Duration::from_millis(4000),
    automatic: false,
    aim: AimProfile {
        min_yaw: -FRAC_PI_2,
        max_yaw: FRAC_PI_2,
        min_pitch: -0.15,
        max_pitch: 0.25,
        pointer_yaw_scale: FRAC_PI_2,
        pointer_pitch_scale: 0.25,
        delta_scale: 0.003,
        smoothing: AIM_SMOOTHING,
    },
    hit_test: HitTest::Sphere,
    falloff: FalloffPolicy::FlooredLinear,
    platform_speed: 8.0,
    turn_rate: 0.8,
    stats: StatBlock {
        damage: 250.0,
        armor: Some(500.0),
        range: Some(2000.0),
        accuracy: Some(0.9),
    },
};

const FIGHTER: WeaponProfile = WeaponProfile {
    projectile: ProjectileKind::PoweredMissile,
    muzzle_speed: 3.0,
    muzzle_height: -1.0,
    damage: 180.0,
    blast_radius: 12.0,
    max_ammo: 8,
    fire_interval: Duration::from_millis(800),
    reload_duration: Duration::from_millis(4000),
    automatic: false,
    aim: AimProfile {
        min_yaw: -0.5,
        max_yaw: 0.5,
        min_pitch: -0.6,
        max_pitch: 0.3,
        pointer_yaw_scale: 0.5,
        pointer_pitch_scale: 0.6,
        delta_scale: 0.002,
        smoothing: AIM_SMOOTHING,
    },
    hit_test: HitTest::Sphere,
    falloff: FalloffPolicy::FlooredLinear,
    platform_speed: 40.0,
    turn_rate: 1.2,
    stats: StatBlock {
        damage: 180.0,
        armor: Some(120.0),
        range: Some(3000.0),
        accuracy: Some(0.8),
    },
};

const ARTILLERY: WeaponProfile = WeaponProfile {
    projectile: ProjectileKind::ArtilleryShell,
    muzzle_speed: 2.2,
    muzzle_height: 2.0,
    damage: 400.0,
    blast_radius: 25.0,
    max_ammo: 20,
    fire_interval: Duration::from_millis(3000),
    reload_duration: Duration::from_millis(4000),
    automatic: false,
    aim: AimProfile {
        min_yaw: -FRAC_PI_4,
        max_yaw: FRAC_PI_4,
        min_pitch: 0.1,
        max_pitch: 1.1,
        pointer_yaw_scale: FRAC_PI_4,
        pointer_pitch_scale: 1.1,
        delta_scale: 0.002,
        smoothing: AIM_SMOOTHING,
    },
    hit_test: HitTest::Box { tolerance: 2.0 },
    falloff: FalloffPolicy::FlooredLinear,
    platform_speed: 0.0,
    turn_rate: 0.0,
    stats: StatBlock {
        damage: 400.0,
        armor: Some(200.0),
        range: Some(5000.0),
        accuracy: Some(0.7),
    },
};

impl WeaponKind {
    pub fn profile(self) -> &'static WeaponProfile {
        match self {
            WeaponKind::Rifle => &RIFLE,
            WeaponKind::Pistol => &PISTOL,
            WeaponKind::Tank => &TANK,
            WeaponKind::Fighter => &FIGHTER,
            WeaponKind::Artillery => &ARTILLERY,
        }
    }
}
