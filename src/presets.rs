use std::collections::HashMap;

use crate::resource::{GroupId, LightState};

/// Scene sequence the button cycles through, in press order.
pub const DEFAULT_ROTATION: &[&str] = &[
    "deep-sea",
    "blue",
    "relax",
    "reading",
    "concentrate",
    "candle-light",
];

/// Immutable room and scene catalogs. Built once at startup and shared
/// read-only between requests; this deployment supports exactly this set of
/// names, not an extensible registry.
#[derive(Debug, Clone)]
pub struct Presets {
    scenes: HashMap<&'static str, LightState>,
    rooms: HashMap<&'static str, GroupId>,
}

impl Presets {
    pub fn builtin() -> Self {
        fn color(hue: u16, bri: u8, sat: u8, ct: u16, x: f32, y: f32, tenths: u16) -> LightState {
            LightState::default()
                .on()
                .with_hue(hue)
                .with_effect("none")
                .with_brightness(bri)
                .with_saturation(sat)
                .with_mirek(ct)
                .with_xy(x, y)
                .with_alert("none")
                .with_transition_time(tenths)
        }

        let scenes = HashMap::from([
            ("on", LightState::default().on()),
            ("off", LightState::default().off()),
            ("red", color(65527, 13, 253, 500, 0.6736, 0.3221, 4)),
            ("blue", color(46573, 254, 251, 500, 0.1754, 0.0556, 4)),
            ("energize", color(34495, 254, 232, 155, 0.3151, 0.3252, 4)),
            ("relax", color(13088, 144, 212, 467, 0.5128, 0.4147, 4)),
            ("reading", color(15331, 222, 121, 343, 0.4448, 0.4066, 4)),
            ("concentrate", color(33849, 254, 44, 234, 0.3693, 0.3695, 4)),
            ("candle-light", color(15339, 19, 120, 343, 0.4443, 0.4064, 4)),
            ("virgin-america", color(54179, 254, 253, 223, 0.3621, 0.1491, 4)),
            ("white", color(34495, 203, 232, 155, 0.3151, 0.3252, 4)),
            ("orange", color(4868, 254, 252, 500, 0.6225, 0.3594, 4)),
            // deep-sea snaps instantly, everything else fades in
            ("deep-sea", color(65527, 253, 253, 500, 0.6736, 0.3221, 0)),
            ("green", color(25654, 254, 253, 290, 0.4083, 0.5162, 4)),
            ("snow", color(34258, 254, 176, 181, 0.3327, 0.3413, 4)),
            ("movie-mode", color(65527, 51, 253, 500, 0.6736, 0.3221, 4)),
        ]);

        let rooms = HashMap::from([
            ("all", GroupId(0)),
            ("bedroom", GroupId(1)),
            ("living-room", GroupId(2)),
            ("hallway", GroupId(3)),
            ("master-bedroom", GroupId(4)),
            ("kitchen", GroupId(5)),
        ]);

        Presets { scenes, rooms }
    }

    /// Resolves a scene name to its light state. Total: names outside the
    /// catalog fall back to the plain `on` state instead of failing.
    pub fn light_state(&self, name: &str) -> LightState {
        self.scenes
            .get(name)
            .cloned()
            .unwrap_or_else(|| LightState::default().on())
    }

    /// Resolves a room name to its bridge group id. Total: names outside the
    /// catalog resolve to [`GroupId::INVALID`], never to a real group.
    pub fn group_id(&self, name: &str) -> GroupId {
        self.rooms.get(name).copied().unwrap_or(GroupId::INVALID)
    }

    pub fn has_scene(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }
}
