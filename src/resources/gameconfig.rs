//! Game configuration resource.
//!
//! Holds every tunable of the board, gesture, recenter and piece behavior.
//! Values start from safe defaults and can be overridden from an INI file;
//! missing keys keep their current value.
//!
//! # Configuration File Format
//!
//! ```ini
//! [grid]
//! size = 3
//! cell_size = 0.2
//! trigger_depth = 0.15
//!
//! [spawn]
//! distance = 1.0
//! vertical_offset = 0.0
//! horizontal_offset = 0.0
//! rotation_offset_x = 0.0
//! rotation_offset_y = 0.0
//! rotation_offset_z = 0.0
//!
//! [gesture]
//! allow_rotation = true
//! rotation_speed = 20.0
//! max_vertical_angle = 90.0
//! ; 0 disables the yaw clamp
//! max_rotation_angle = 0.0
//! scale_sensitivity = 0.01
//! min_scale = 0.1
//! max_scale = 2.0
//!
//! [recenter]
//! duration = 0.5
//! vertical_position_factor = 0.25
//! camera_distance_offset = 0.8
//! ground_check_distance = 2.0
//! ground_clearance = 0.05
//! fallback_drop = 0.3
//! reset_duration = 0.5
//! reset_pitch = 90.0
//!
//! [piece]
//! offset_x = 0.0
//! offset_y = 0.1
//! offset_z = 0.0
//! rotation_offset_x = 0.0
//! rotation_offset_y = 0.0
//! rotation_offset_z = 0.0
//! smoothness = 25.0
//! position_threshold = 0.005
//! placement_height = 0.05
//! reference_width = 0.05
//! scale_multiplier = 1.0
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use glam::Vec3;
use log::{info, warn};
use std::path::PathBuf;

use crate::components::gridgenerator::{MAX_GRID_SIZE, MIN_GRID_SIZE};
use crate::components::piece::PieceFollow;
use crate::components::scale::{MAX_SCALE_MULTIPLIER, MIN_SCALE_MULTIPLIER};
use crate::resources::prefabs::{PiecePrefab, REFERENCE_MARKER_WIDTH};

const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Debug, Clone, PartialEq)]
pub struct GridSettings {
    pub size: u32,
    pub cell_size: f32,
    pub trigger_depth: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            size: 3,
            cell_size: 0.2,
            trigger_depth: 0.15,
        }
    }
}

/// Board spawn pose relative to the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnSettings {
    pub distance: f32,
    pub vertical_offset: f32,
    pub horizontal_offset: f32,
    /// Euler degrees applied after facing the camera's forward.
    pub rotation_offset: Vec3,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            distance: 1.0,
            vertical_offset: 0.0,
            horizontal_offset: 0.0,
            rotation_offset: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GestureSettings {
    pub allow_rotation: bool,
    /// Degrees per pixel per second.
    pub rotation_speed: f32,
    pub max_vertical_angle: f32,
    /// Yaw clamp in degrees; `None` leaves yaw free.
    pub max_rotation_angle: Option<f32>,
    pub scale_sensitivity: f32,
    pub min_scale: f32,
    pub max_scale: f32,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            allow_rotation: true,
            rotation_speed: 20.0,
            max_vertical_angle: 90.0,
            max_rotation_angle: None,
            scale_sensitivity: 0.01,
            min_scale: 0.1,
            max_scale: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecenterSettings {
    pub duration: f32,
    /// Viewport height of the recenter target, 0 = bottom, 1 = top.
    pub vertical_position_factor: f32,
    /// Depth beyond the near clip plane.
    pub camera_distance_offset: f32,
    pub ground_check_distance: f32,
    /// Height above a ground hit.
    pub ground_clearance: f32,
    /// Drop below the camera when no ground is found.
    pub fallback_drop: f32,
    pub reset_duration: f32,
    pub reset_pitch: f32,
}

impl Default for RecenterSettings {
    fn default() -> Self {
        Self {
            duration: 0.5,
            vertical_position_factor: 0.25,
            camera_distance_offset: 0.8,
            ground_check_distance: 2.0,
            ground_clearance: 0.05,
            fallback_drop: 0.3,
            reset_duration: 0.5,
            reset_pitch: 90.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieceSettings {
    pub position_offset: Vec3,
    pub rotation_offset: Vec3,
    pub smoothness: f32,
    pub position_threshold: f32,
    /// Height above the cell origin a placed piece snaps to.
    pub placement_height: f32,
    pub reference_width: f32,
    pub scale_multiplier: f32,
}

impl Default for PieceSettings {
    fn default() -> Self {
        let follow = PieceFollow::default();
        Self {
            position_offset: follow.position_offset,
            rotation_offset: follow.rotation_offset,
            smoothness: follow.smoothness,
            position_threshold: follow.position_threshold,
            placement_height: 0.05,
            reference_width: REFERENCE_MARKER_WIDTH,
            scale_multiplier: 1.0,
        }
    }
}

impl PieceSettings {
    pub fn follow(&self) -> PieceFollow {
        PieceFollow {
            position_offset: self.position_offset,
            rotation_offset: self.rotation_offset,
            smoothness: self.smoothness,
            position_threshold: self.position_threshold,
        }
    }

    pub fn prefab(&self) -> PiecePrefab {
        PiecePrefab {
            follow: self.follow(),
            reference_width: self.reference_width,
            scale_multiplier: self.scale_multiplier,
        }
    }

    pub fn placement_offset(&self) -> Vec3 {
        Vec3::Y * self.placement_height
    }
}

/// Game configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub grid: GridSettings,
    pub spawn: SpawnSettings,
    pub gesture: GestureSettings,
    pub recenter: RecenterSettings,
    pub piece: PieceSettings,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn get_f32(config: &Ini, section: &str, key: &str, target: &mut f32) {
    match config.getfloat(section, key) {
        Ok(Some(v)) => *target = v as f32,
        Ok(None) => {}
        Err(e) => warn!("Ignoring [{}] {}: {}", section, key, e),
    }
}

fn get_vec3(config: &Ini, section: &str, prefix: &str, target: &mut Vec3) {
    get_f32(config, section, &format!("{prefix}_x"), &mut target.x);
    get_f32(config, section, &format!("{prefix}_y"), &mut target.y);
    get_f32(config, section, &format!("{prefix}_z"), &mut target.z);
}

fn set_vec3(config: &mut Ini, section: &str, prefix: &str, v: Vec3) {
    config.set(section, &format!("{prefix}_x"), Some(v.x.to_string()));
    config.set(section, &format!("{prefix}_y"), Some(v.y.to_string()));
    config.set(section, &format!("{prefix}_z"), Some(v.z.to_string()));
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            grid: GridSettings::default(),
            spawn: SpawnSettings::default(),
            gesture: GestureSettings::default(),
            recenter: RecenterSettings::default(),
            piece: PieceSettings::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply_ini(&config);
        info!(
            "Loaded config from {:?}: grid {}x{} @ {}m, scale [{}, {}]",
            self.config_path,
            self.grid.size,
            self.grid.size,
            self.grid.cell_size,
            self.gesture.min_scale,
            self.gesture.max_scale
        );
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply_ini(&config);
        Ok(())
    }

    fn apply_ini(&mut self, config: &Ini) {
        // [grid] section
        match config.getuint("grid", "size") {
            Ok(Some(size)) => self.grid.size = size.min(u32::MAX as u64) as u32,
            Ok(None) => {}
            Err(e) => warn!("Ignoring [grid] size: {}", e),
        }
        get_f32(config, "grid", "cell_size", &mut self.grid.cell_size);
        get_f32(config, "grid", "trigger_depth", &mut self.grid.trigger_depth);

        // [spawn] section
        get_f32(config, "spawn", "distance", &mut self.spawn.distance);
        get_f32(config, "spawn", "vertical_offset", &mut self.spawn.vertical_offset);
        get_f32(
            config,
            "spawn",
            "horizontal_offset",
            &mut self.spawn.horizontal_offset,
        );
        get_vec3(config, "spawn", "rotation_offset", &mut self.spawn.rotation_offset);

        // [gesture] section
        if let Some(allow) = config.getbool("gesture", "allow_rotation").ok().flatten() {
            self.gesture.allow_rotation = allow;
        }
        get_f32(config, "gesture", "rotation_speed", &mut self.gesture.rotation_speed);
        get_f32(
            config,
            "gesture",
            "max_vertical_angle",
            &mut self.gesture.max_vertical_angle,
        );
        if let Some(angle) = config
            .getfloat("gesture", "max_rotation_angle")
            .ok()
            .flatten()
        {
            self.gesture.max_rotation_angle = (angle > 0.0).then_some(angle as f32);
        }
        get_f32(
            config,
            "gesture",
            "scale_sensitivity",
            &mut self.gesture.scale_sensitivity,
        );
        get_f32(config, "gesture", "min_scale", &mut self.gesture.min_scale);
        get_f32(config, "gesture", "max_scale", &mut self.gesture.max_scale);

        // [recenter] section
        get_f32(config, "recenter", "duration", &mut self.recenter.duration);
        get_f32(
            config,
            "recenter",
            "vertical_position_factor",
            &mut self.recenter.vertical_position_factor,
        );
        get_f32(
            config,
            "recenter",
            "camera_distance_offset",
            &mut self.recenter.camera_distance_offset,
        );
        get_f32(
            config,
            "recenter",
            "ground_check_distance",
            &mut self.recenter.ground_check_distance,
        );
        get_f32(
            config,
            "recenter",
            "ground_clearance",
            &mut self.recenter.ground_clearance,
        );
        get_f32(config, "recenter", "fallback_drop", &mut self.recenter.fallback_drop);
        get_f32(config, "recenter", "reset_duration", &mut self.recenter.reset_duration);
        get_f32(config, "recenter", "reset_pitch", &mut self.recenter.reset_pitch);

        // [piece] section
        get_vec3(config, "piece", "offset", &mut self.piece.position_offset);
        get_vec3(config, "piece", "rotation_offset", &mut self.piece.rotation_offset);
        get_f32(config, "piece", "smoothness", &mut self.piece.smoothness);
        get_f32(
            config,
            "piece",
            "position_threshold",
            &mut self.piece.position_threshold,
        );
        get_f32(config, "piece", "placement_height", &mut self.piece.placement_height);
        get_f32(config, "piece", "reference_width", &mut self.piece.reference_width);
        get_f32(config, "piece", "scale_multiplier", &mut self.piece.scale_multiplier);

        self.sanitize();
    }

    /// Bring out-of-range values back into their valid ranges.
    pub fn sanitize(&mut self) {
        let size = self.grid.size.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE);
        if size != self.grid.size {
            warn!("Grid size {} clamped to {}", self.grid.size, size);
            self.grid.size = size;
        }
        if !(self.grid.cell_size > 0.0) {
            warn!(
                "Cell size {} is not positive, using default",
                self.grid.cell_size
            );
            self.grid.cell_size = GridSettings::default().cell_size;
        }
        if self.gesture.min_scale > self.gesture.max_scale {
            warn!(
                "min_scale {} > max_scale {}, swapping",
                self.gesture.min_scale, self.gesture.max_scale
            );
            std::mem::swap(&mut self.gesture.min_scale, &mut self.gesture.max_scale);
        }
        self.gesture.max_vertical_angle = self.gesture.max_vertical_angle.abs();
        self.recenter.duration = self.recenter.duration.max(0.0);
        self.recenter.reset_duration = self.recenter.reset_duration.max(0.0);
        self.piece.scale_multiplier = self
            .piece
            .scale_multiplier
            .clamp(MIN_SCALE_MULTIPLIER, MAX_SCALE_MULTIPLIER);
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("grid", "size", Some(self.grid.size.to_string()));
        config.set("grid", "cell_size", Some(self.grid.cell_size.to_string()));
        config.set(
            "grid",
            "trigger_depth",
            Some(self.grid.trigger_depth.to_string()),
        );

        config.set("spawn", "distance", Some(self.spawn.distance.to_string()));
        config.set(
            "spawn",
            "vertical_offset",
            Some(self.spawn.vertical_offset.to_string()),
        );
        config.set(
            "spawn",
            "horizontal_offset",
            Some(self.spawn.horizontal_offset.to_string()),
        );
        set_vec3(&mut config, "spawn", "rotation_offset", self.spawn.rotation_offset);

        let g = &self.gesture;
        config.set("gesture", "allow_rotation", Some(g.allow_rotation.to_string()));
        config.set("gesture", "rotation_speed", Some(g.rotation_speed.to_string()));
        config.set(
            "gesture",
            "max_vertical_angle",
            Some(g.max_vertical_angle.to_string()),
        );
        config.set(
            "gesture",
            "max_rotation_angle",
            Some(g.max_rotation_angle.unwrap_or(0.0).to_string()),
        );
        config.set(
            "gesture",
            "scale_sensitivity",
            Some(g.scale_sensitivity.to_string()),
        );
        config.set("gesture", "min_scale", Some(g.min_scale.to_string()));
        config.set("gesture", "max_scale", Some(g.max_scale.to_string()));

        let r = &self.recenter;
        config.set("recenter", "duration", Some(r.duration.to_string()));
        config.set(
            "recenter",
            "vertical_position_factor",
            Some(r.vertical_position_factor.to_string()),
        );
        config.set(
            "recenter",
            "camera_distance_offset",
            Some(r.camera_distance_offset.to_string()),
        );
        config.set(
            "recenter",
            "ground_check_distance",
            Some(r.ground_check_distance.to_string()),
        );
        config.set("recenter", "ground_clearance", Some(r.ground_clearance.to_string()));
        config.set("recenter", "fallback_drop", Some(r.fallback_drop.to_string()));
        config.set("recenter", "reset_duration", Some(r.reset_duration.to_string()));
        config.set("recenter", "reset_pitch", Some(r.reset_pitch.to_string()));

        let p = &self.piece;
        set_vec3(&mut config, "piece", "offset", p.position_offset);
        set_vec3(&mut config, "piece", "rotation_offset", p.rotation_offset);
        config.set("piece", "smoothness", Some(p.smoothness.to_string()));
        config.set(
            "piece",
            "position_threshold",
            Some(p.position_threshold.to_string()),
        );
        config.set("piece", "placement_height", Some(p.placement_height.to_string()));
        config.set("piece", "reference_width", Some(p.reference_width.to_string()));
        config.set("piece", "scale_multiplier", Some(p.scale_multiplier.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = GameConfig::new();
        assert_eq!(c.grid.size, 3);
        assert_eq!(c.grid.cell_size, 0.2);
        assert_eq!(c.spawn.distance, 1.0);
        assert_eq!(c.gesture.min_scale, 0.1);
        assert_eq!(c.gesture.max_scale, 2.0);
        assert_eq!(c.gesture.max_rotation_angle, None);
        assert_eq!(c.recenter.duration, 0.5);
        assert_eq!(c.piece.placement_offset(), Vec3::new(0.0, 0.05, 0.0));
    }

    #[test]
    fn test_load_overrides_and_keeps_missing() {
        let mut c = GameConfig::new();
        c.load_from_str(
            "[grid]\nsize = 5\ncell_size = 0.15\n\n[gesture]\nmax_rotation_angle = 180\nallow_rotation = false\n\n[piece]\noffset_y = 0.2\n",
        )
        .unwrap();
        assert_eq!(c.grid.size, 5);
        assert!((c.grid.cell_size - 0.15).abs() < 1e-6);
        assert_eq!(c.gesture.max_rotation_angle, Some(180.0));
        assert!(!c.gesture.allow_rotation);
        assert!((c.piece.position_offset.y - 0.2).abs() < 1e-6);
        // untouched
        assert_eq!(c.spawn.distance, 1.0);
        assert_eq!(c.gesture.rotation_speed, 20.0);
    }

    #[test]
    fn test_sanitize_ranges() {
        let mut c = GameConfig::new();
        c.load_from_str(
            "[grid]\nsize = 12\ncell_size = -1\n[gesture]\nmin_scale = 3\nmax_scale = 0.5\n[piece]\nscale_multiplier = 9\n",
        )
        .unwrap();
        assert_eq!(c.grid.size, 7);
        assert_eq!(c.grid.cell_size, 0.2);
        assert_eq!(c.gesture.min_scale, 0.5);
        assert_eq!(c.gesture.max_scale, 3.0);
        assert_eq!(c.piece.scale_multiplier, 3.0);
    }

    #[test]
    fn test_zero_max_rotation_angle_disables_clamp() {
        let mut c = GameConfig::new();
        c.gesture.max_rotation_angle = Some(45.0);
        c.load_from_str("[gesture]\nmax_rotation_angle = 0\n").unwrap();
        assert_eq!(c.gesture.max_rotation_angle, None);
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "ar_tictactoe_config_{}.ini",
            std::process::id()
        ));
        let mut original = GameConfig::with_path(&path);
        original.grid.size = 4;
        original.spawn.rotation_offset = Vec3::new(10.0, 20.0, 30.0);
        original.gesture.max_rotation_angle = Some(120.0);
        original.save_to_file().unwrap();

        let mut loaded = GameConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.grid.size, 4);
        assert_eq!(loaded.spawn.rotation_offset, Vec3::new(10.0, 20.0, 30.0));
        assert_eq!(loaded.gesture.max_rotation_angle, Some(120.0));
    }

    #[test]
    fn test_missing_file_is_error() {
        let mut c = GameConfig::with_path("/nonexistent/ar_tictactoe.ini");
        assert!(c.load_from_file().is_err());
        assert_eq!(c, GameConfig::with_path("/nonexistent/ar_tictactoe.ini"));
    }
}
