use std::collections::VecDeque;

use serde::Deserialize;
use thiserror::Error;

/// Gestos de movimiento reconocidos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionLabel {
    SwipeLeft,
    SwipeRight,
    SwipeUp,
    SwipeDown,
}

impl MotionLabel {
    /// Etiqueta textual usada en los perfiles de contexto
    pub fn as_str(self) -> &'static str {
        match self {
            MotionLabel::SwipeLeft => "SWIPE_LEFT",
            MotionLabel::SwipeRight => "SWIPE_RIGHT",
            MotionLabel::SwipeUp => "SWIPE_UP",
            MotionLabel::SwipeDown => "SWIPE_DOWN",
        }
    }
}

#[derive(Debug, Error)]
pub enum MotionError {
    #[error("timestamp {got} ms anterior al último observado ({last} ms)")]
    NonMonotonicTimestamp { got: u64, last: u64 },
}

/// Muestra de posición del centroide de la mano
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    pub x: f32,
    pub y: f32,
    pub timestamp_ms: u64,
}

/// Parámetros del rastreador de movimiento
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Máximo de muestras retenidas
    pub capacity: usize,
    /// Edad máxima de una muestra respecto a la más reciente
    pub max_age_ms: u64,
    /// Desplazamiento mínimo (normalizado al ancho del frame) para un swipe
    pub min_displacement: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            max_age_ms: 400,
            min_displacement: 0.10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionClassification {
    pub label: Option<MotionLabel>,
    pub confidence: f32,
}

impl MotionClassification {
    pub fn none() -> Self {
        Self {
            label: None,
            confidence: 0.0,
        }
    }
}

/// Ventana deslizante de posiciones, acotada por cantidad y por edad
#[derive(Debug)]
pub struct MotionHistory {
    samples: VecDeque<MotionSample>,
    capacity: usize,
    max_age_ms: u64,
}

impl MotionHistory {
    pub fn new(capacity: usize, max_age_ms: u64) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            max_age_ms,
        }
    }

    /// Inserta una muestra y expulsa las que exceden capacidad o edad
    pub fn push(&mut self, sample: MotionSample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
        let newest = sample.timestamp_ms;
        while let Some(oldest) = self.samples.front() {
            if newest.saturating_sub(oldest.timestamp_ms) > self.max_age_ms {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn oldest(&self) -> Option<&MotionSample> {
        self.samples.front()
    }

    pub fn newest(&self) -> Option<&MotionSample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Detecta swipes comparando la muestra más vieja de la ventana con la más
/// reciente. El eje dominante decide la dirección; +y apunta hacia abajo
/// (coordenadas de imagen), así que un aumento de y es SWIPE_DOWN.
pub struct MotionTracker {
    config: MotionConfig,
    history: MotionHistory,
}

impl MotionTracker {
    pub fn new(config: MotionConfig) -> Self {
        let history = MotionHistory::new(config.capacity, config.max_age_ms);
        Self { config, history }
    }

    /// Registra la posición del centroide y clasifica la ventana resultante.
    ///
    /// Un timestamp que retrocede vacía el historial y devuelve error: las
    /// muestras viejas ya no son comparables con el nuevo reloj.
    pub fn update(
        &mut self,
        x: f32,
        y: f32,
        timestamp_ms: u64,
    ) -> Result<MotionClassification, MotionError> {
        if let Some(last) = self.history.newest() {
            if timestamp_ms < last.timestamp_ms {
                let last_ts = last.timestamp_ms;
                self.history.clear();
                return Err(MotionError::NonMonotonicTimestamp {
                    got: timestamp_ms,
                    last: last_ts,
                });
            }
        }

        self.history.push(MotionSample { x, y, timestamp_ms });
        Ok(self.classify())
    }

    fn classify(&self) -> MotionClassification {
        let (oldest, newest) = match (self.history.oldest(), self.history.newest()) {
            (Some(a), Some(b)) if self.history.len() >= 2 => (a, b),
            _ => return MotionClassification::none(),
        };

        let dx = newest.x - oldest.x;
        let dy = newest.y - oldest.y;
        let magnitude = dx.abs().max(dy.abs());
        let threshold = self.config.min_displacement;
        if magnitude < threshold {
            return MotionClassification::none();
        }

        let label = if dx.abs() >= dy.abs() {
            if dx > 0.0 {
                MotionLabel::SwipeRight
            } else {
                MotionLabel::SwipeLeft
            }
        } else if dy > 0.0 {
            MotionLabel::SwipeDown
        } else {
            MotionLabel::SwipeUp
        };

        let confidence = ((magnitude - threshold) / threshold).min(1.0);
        MotionClassification {
            label: Some(label),
            confidence,
        }
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }
}
