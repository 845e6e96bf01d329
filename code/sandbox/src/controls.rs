//! Per-mode input adapters: raw key and pointer events in, engine intents out.

use std::collections::HashSet;

use engine::{Intent, WeaponKind};
use glam::Vec2;

/// Radians the fighter's aim moves per arrow key press.
const FIGHTER_AIM_STEP: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    Space,
    R,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    MouseDown,
    MouseUp,
    /// Absolute pointer position in pixels, origin top-left.
    PointerMoved { x: f32, y: f32 },
    /// Relative motion while the pointer is locked.
    PointerDelta { dx: f32, dy: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    Tank,
    Rifle,
    Pistol,
    Fighter,
    Artillery,
}

impl From<WeaponKind> for ControlMode {
    fn from(kind: WeaponKind) -> Self {
        match kind {
            WeaponKind::Tank => ControlMode::Tank,
            WeaponKind::Rifle => ControlMode::Rifle,
            WeaponKind::Pistol => ControlMode::Pistol,
            WeaponKind::Fighter => ControlMode::Fighter,
            WeaponKind::Artillery => ControlMode::Artillery,
        }
    }
}

impl ControlMode {
    pub fn weapon(self) -> WeaponKind {
        match self {
            ControlMode::Tank => WeaponKind::Tank,
            ControlMode::Rifle => WeaponKind::Rifle,
            ControlMode::Pistol => WeaponKind::Pistol,
            ControlMode::Fighter => WeaponKind::Fighter,
            ControlMode::Artillery => WeaponKind::Artillery,
        }
    }

    fn is_firearm(self) -> bool {
        matches!(self, ControlMode::Rifle | ControlMode::Pistol)
    }
}

pub struct ControlAdapter {
    mode: ControlMode,
    viewport: Vec2,
    held: HashSet<KeyCode>,
    fighter_yaw: f32,
    fighter_pitch: f32,
}

impl ControlAdapter {
    pub fn new(mode: ControlMode, viewport: Vec2) -> Self {
        Self {
            mode,
            viewport,
            held: HashSet::new(),
            fighter_yaw: 0.0,
            fighter_pitch: 0.0,
        }
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Maps one raw event to at most one intent.
    pub fn translate(&mut self, input: RawInput) -> Option<Intent> {
        match input {
            RawInput::KeyDown(key) => {
                // Key repeat.
                if !self.held.insert(key) {
                    return None;
                }
                self.key_down(key)
            }
            RawInput::KeyUp(key) => {
                if !self.held.remove(&key) {
                    return None;
                }
                self.key_up(key)
            }
            RawInput::MouseDown if self.mode != ControlMode::Fighter => Some(Intent::FireDown),
            RawInput::MouseUp if self.mode != ControlMode::Fighter => Some(Intent::FireUp),
            RawInput::PointerMoved { x, y } if self.mode != ControlMode::Fighter => {
                Some(Intent::AimPointer(self.pointer_offset(x, y)))
            }
            RawInput::PointerDelta { dx, dy } if self.mode.is_firearm() => {
                Some(Intent::AimDelta { dx, dy })
            }
            _ => None,
        }
    }

    fn key_down(&mut self, key: KeyCode) -> Option<Intent> {
        match key {
            KeyCode::W | KeyCode::A | KeyCode::S | KeyCode::D => Some(self.move_axis()),
            KeyCode::R => Some(Intent::ReloadPressed),
            KeyCode::Escape => Some(Intent::ExitMode),
            KeyCode::Space if self.mode == ControlMode::Fighter => Some(Intent::FireDown),
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right
                if self.mode == ControlMode::Fighter =>
            {
                Some(self.step_fighter_aim(key))
            }
            _ => None,
        }
    }

    fn key_up(&mut self, key: KeyCode) -> Option<Intent> {
        match key {
            KeyCode::W | KeyCode::A | KeyCode::S | KeyCode::D => Some(self.move_axis()),
            KeyCode::Space if self.mode == ControlMode::Fighter => Some(Intent::FireUp),
            _ => None,
        }
    }

    fn move_axis(&self) -> Intent {
        let axis = |negative, positive| {
            let mut value = 0.0;
            if self.held.contains(&negative) {
                value -= 1.0;
            }
            if self.held.contains(&positive) {
                value += 1.0;
            }
            value
        };
        Intent::MoveAxis(Vec2::new(
            axis(KeyCode::A, KeyCode::D),
            axis(KeyCode::S, KeyCode::W),
        ))
    }

    /// Pointer position as an offset from the viewport center, each axis in [-1, 1].
    fn pointer_offset(&self, x: f32, y: f32) -> Vec2 {
        let half = self.viewport * 0.5;
        if half.x <= 0.0 || half.y <= 0.0 {
            return Vec2::ZERO;
        }
        ((Vec2::new(x, y) - half) / half).clamp(Vec2::NEG_ONE, Vec2::ONE)
    }

    fn step_fighter_aim(&mut self, key: KeyCode) -> Intent {
        let limits = &WeaponKind::Fighter.profile().aim;
        match key {
            KeyCode::Up => self.fighter_pitch += FIGHTER_AIM_STEP,
            KeyCode::Down => self.fighter_pitch -= FIGHTER_AIM_STEP,
            KeyCode::Left => self.fighter_yaw -= FIGHTER_AIM_STEP,
            KeyCode::Right => self.fighter_yaw += FIGHTER_AIM_STEP,
            _ => {}
        }
        self.fighter_yaw = self.fighter_yaw.clamp(limits.min_yaw, limits.max_yaw);
        self.fighter_pitch = self.fighter_pitch.clamp(limits.min_pitch, limits.max_pitch);
        Intent::AimDirection {
            yaw: self.fighter_yaw,
            pitch: self.fighter_pitch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter(mode: ControlMode) -> ControlAdapter {
        ControlAdapter::new(mode, Vec2::new(800.0, 600.0))
    }

    #[test]
    fn pointer_position_becomes_a_centered_offset() {
        let mut tank = adapter(ControlMode::Tank);
        assert_eq!(
            tank.translate(RawInput::PointerMoved { x: 400.0, y: 300.0 }),
            Some(Intent::AimPointer(Vec2::ZERO))
        );
        assert_eq!(
            tank.translate(RawInput::PointerMoved { x: 800.0, y: 0.0 }),
            Some(Intent::AimPointer(Vec2::new(1.0, -1.0)))
        );
        assert_eq!(
            tank.translate(RawInput::PointerMoved { x: -50.0, y: 900.0 }),
            Some(Intent::AimPointer(Vec2::new(-1.0, 1.0))),
            "Offsets outside the viewport are clamped"
        );
    }

    #[test]
    fn held_keys_combine_into_one_move_axis() {
        let mut tank = adapter(ControlMode::Tank);
        assert_eq!(
            tank.translate(RawInput::KeyDown(KeyCode::W)),
            Some(Intent::MoveAxis(Vec2::new(0.0, 1.0)))
        );
        assert_eq!(
            tank.translate(RawInput::KeyDown(KeyCode::D)),
            Some(Intent::MoveAxis(Vec2::new(1.0, 1.0)))
        );
        assert_eq!(tank.translate(RawInput::KeyDown(KeyCode::D)), None, "Repeat is ignored");
        assert_eq!(
            tank.translate(RawInput::KeyUp(KeyCode::W)),
            Some(Intent::MoveAxis(Vec2::new(1.0, 0.0)))
        );
    }

    #[test]
    fn fighter_fires_with_space_and_aims_with_arrows() {
        let mut fighter = adapter(ControlMode::Fighter);
        assert_eq!(fighter.translate(RawInput::MouseDown), None);
        assert_eq!(fighter.translate(RawInput::PointerMoved { x: 0.0, y: 0.0 }), None);
        assert_eq!(
            fighter.translate(RawInput::KeyDown(KeyCode::Space)),
            Some(Intent::FireDown)
        );
        assert_eq!(
            fighter.translate(RawInput::KeyUp(KeyCode::Space)),
            Some(Intent::FireUp)
        );

        let mut last = None;
        for _ in 0..10 {
            last = fighter.translate(RawInput::KeyDown(KeyCode::Up));
            assert_eq!(fighter.translate(RawInput::KeyUp(KeyCode::Up)), None);
        }
        let max_pitch = WeaponKind::Fighter.profile().aim.max_pitch;
        assert!(
            matches!(last, Some(Intent::AimDirection { pitch, .. }) if pitch == max_pitch),
            "Pitch stops at the fighter limit, got {last:?}"
        );
    }

    #[test]
    fn firearms_follow_relative_pointer_motion() {
        let mut rifle = adapter(ControlMode::Rifle);
        assert_eq!(
            rifle.translate(RawInput::PointerDelta { dx: 4.0, dy: -2.0 }),
            Some(Intent::AimDelta { dx: 4.0, dy: -2.0 })
        );

        let mut artillery = adapter(ControlMode::Artillery);
        assert_eq!(artillery.translate(RawInput::PointerDelta { dx: 4.0, dy: -2.0 }), None);
    }

    #[test]
    fn shared_keys_map_the_same_in_every_mode() {
        for mode in [
            ControlMode::Tank,
            ControlMode::Rifle,
            ControlMode::Pistol,
            ControlMode::Fighter,
            ControlMode::Artillery,
        ] {
            let mut controls = adapter(mode);
            assert_eq!(
                controls.translate(RawInput::KeyDown(KeyCode::R)),
                Some(Intent::ReloadPressed)
            );
            assert_eq!(
                controls.translate(RawInput::KeyDown(KeyCode::Escape)),
                Some(Intent::ExitMode)
            );
            assert_eq!(ControlMode::from(mode.weapon()), mode);
        }
    }
}
