use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::context_resolver::{ContextConfig, ContextProfile, ProfileSet};
use crate::cursor_filter::CursorConfig;
use crate::gesture_stabilizer::StabilizerConfig;
use crate::motion_tracker::MotionConfig;

/// Umbrales sobre la entrada de landmarks
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Confianza mínima del detector para aceptar una mano
    pub min_confidence: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
        }
    }
}

/// Parámetros de todas las etapas del motor
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub detection: DetectionConfig,
    pub motion: MotionConfig,
    pub stabilizer: StabilizerConfig,
    pub cursor: CursorConfig,
    pub context: ContextConfig,
}

/// Configuración completa: motor + perfiles de aplicación
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default = "default_profiles")]
    pub profiles: ProfileSet,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            profiles: default_profiles(),
        }
    }
}

/// Carga `quironomo.json`. El archivo puede omitir cualquier sección;
/// los valores ausentes toman los de fábrica.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("no se pudo leer la configuración en {}", path.display()))?;
    let config: AppConfig = serde_json::from_str(&contents)
        .with_context(|| format!("configuración inválida en {}", path.display()))?;
    config
        .profiles
        .validate()
        .with_context(|| format!("perfiles inválidos en {}", path.display()))?;
    Ok(config)
}

fn profile(pairs: &[(&str, &str)]) -> ContextProfile {
    ContextProfile {
        bindings: pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

/// Perfiles de fábrica: un perfil global de multimedia más dos ejemplos
/// de aplicación
pub fn default_profiles() -> ProfileSet {
    let global = profile(&[
        ("OPEN_PALM", "volume_up"),
        ("FIST", "volume_down"),
        ("THUMBS_UP", "play_pause"),
        ("SWIPE_LEFT", "next_track"),
        ("SWIPE_RIGHT", "previous_track"),
        ("SWIPE_UP", "next_slide"),
        ("SWIPE_DOWN", "previous_slide"),
        ("POINT", "mouse_cursor"),
        ("PINCH", "mouse_click"),
        ("PEACE", "scroll_up"),
        ("ROCK", "scroll_down"),
        ("OK_SIGN", "screenshot"),
        ("STOP", "alt_tab"),
    ]);

    let presenter = profile(&[
        ("SWIPE_LEFT", "next_slide"),
        ("SWIPE_RIGHT", "previous_slide"),
        ("OPEN_PALM", "start_presentation"),
        ("FIST", "end_presentation"),
    ]);

    let video_player = profile(&[
        ("OPEN_PALM", "play_pause"),
        ("SWIPE_LEFT", "seek_forward"),
        ("SWIPE_RIGHT", "seek_backward"),
        ("SWIPE_UP", "volume_up"),
        ("SWIPE_DOWN", "volume_down"),
    ]);

    let mut profiles = HashMap::new();
    profiles.insert("global".to_string(), global);
    profiles.insert("presenter".to_string(), presenter);
    profiles.insert("video_player".to_string(), video_player);

    ProfileSet {
        default_profile: "global".to_string(),
        profiles,
    }
}
