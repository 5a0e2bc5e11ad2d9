use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// Mapa gesto → identificador de comando para una aplicación
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ContextProfile {
    pub bindings: HashMap<String, String>,
}

impl ContextProfile {
    pub fn get(&self, label: &str) -> Option<&str> {
        self.bindings.get(label).map(String::as_str)
    }
}

/// Conjunto de perfiles con uno designado como respaldo global
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileSet {
    pub default_profile: String,
    pub profiles: HashMap<String, ContextProfile>,
}

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("el perfil por defecto '{name}' no existe en la tabla de perfiles")]
    MissingDefaultProfile { name: String },
}

impl ProfileSet {
    pub fn validate(&self) -> Result<(), ContextError> {
        if !self.profiles.contains_key(&self.default_profile) {
            return Err(ContextError::MissingDefaultProfile {
                name: self.default_profile.clone(),
            });
        }
        Ok(())
    }
}

/// Fuente del identificador de la aplicación activa
pub trait ActiveAppSource {
    /// `None` cuando la aplicación en foco no se puede determinar
    fn active_app(&mut self) -> Option<String>;
}

/// Fuente respaldada en un archivo de texto plano: el integrador externo
/// escribe ahí el nombre de la aplicación en foco
pub struct FileAppSource {
    path: PathBuf,
}

impl FileAppSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ActiveAppSource for FileAppSource {
    fn active_app(&mut self) -> Option<String> {
        let contents = fs::read_to_string(&self.path).ok()?;
        let name = contents.trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Intervalo mínimo entre consultas a la fuente de aplicación activa
    pub poll_interval_ms: u64,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 250,
        }
    }
}

/// Resuelve qué perfil aplica en cada instante.
///
/// La consulta a la fuente está acotada por `poll_interval_ms`: entre
/// consultas se reutiliza la última aplicación observada. Sin aplicación
/// conocida, o sin perfil para ella, rige el perfil por defecto.
pub struct ContextResolver {
    source: Box<dyn ActiveAppSource + Send>,
    config: ContextConfig,
    profiles: ProfileSet,
    cached_app: Option<String>,
    last_poll_ms: Option<u64>,
}

impl ContextResolver {
    pub fn new(
        source: Box<dyn ActiveAppSource + Send>,
        config: ContextConfig,
        profiles: ProfileSet,
    ) -> Result<Self, ContextError> {
        profiles.validate()?;
        Ok(Self {
            source,
            config,
            profiles,
            cached_app: None,
            last_poll_ms: None,
        })
    }

    /// Actualiza la aplicación activa si el intervalo de consulta ya venció
    pub fn refresh(&mut self, now_ms: u64) {
        let due = match self.last_poll_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.config.poll_interval_ms,
        };
        if due {
            self.cached_app = self.source.active_app();
            self.last_poll_ms = Some(now_ms);
        }
    }

    pub fn active_app(&self) -> Option<&str> {
        self.cached_app.as_deref()
    }

    /// Perfil de la aplicación activa, o el perfil por defecto
    pub fn current_profile(&self) -> &ContextProfile {
        self.cached_app
            .as_ref()
            .and_then(|app| self.profiles.profiles.get(app))
            .unwrap_or_else(|| self.default_profile())
    }

    pub fn default_profile(&self) -> &ContextProfile {
        // validate() garantiza la entrada
        &self.profiles.profiles[&self.profiles.default_profile]
    }
}
