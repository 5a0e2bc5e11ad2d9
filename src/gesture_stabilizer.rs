use serde::Deserialize;

use crate::motion_tracker::{MotionClassification, MotionLabel};
use crate::pose_classifier::{PoseClassification, PoseLabel};
use crate::types::Hand;

/// Etiqueta unificada de gesto: pose estática o movimiento
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureLabel {
    Pose(PoseLabel),
    Motion(MotionLabel),
}

impl GestureLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            GestureLabel::Pose(p) => p.as_str(),
            GestureLabel::Motion(m) => m.as_str(),
        }
    }
}

/// Gesto confirmado, listo para mapearse a un comando
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEvent {
    pub hand: Hand,
    pub label: GestureLabel,
    pub confidence: f32,
    pub timestamp_ms: u64,
}

/// Parámetros del filtro de estabilidad
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StabilizerConfig {
    /// Frames consecutivos con la misma etiqueta para confirmar
    pub confirm_frames: u32,
    /// Silencio tras emitir, en milisegundos
    pub cooldown_ms: u64,
    /// Confianza mínima para que una observación cuente
    pub min_confidence: f32,
    /// Confianza mínima de pose para que gane sobre el movimiento
    pub pose_floor: f32,
    /// Sin mano durante este tiempo, el estado vuelve a reposo
    pub hand_lost_timeout_ms: u64,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            confirm_frames: 5,
            cooldown_ms: 500,
            min_confidence: 0.15,
            pose_floor: 0.30,
            hand_lost_timeout_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Idle,
    Candidate {
        label: GestureLabel,
        count: u32,
        confidence: f32,
    },
    Cooldown {
        until_ms: u64,
    },
}

/// Máquina de estados que convierte clasificaciones por frame en eventos
/// confirmados.
///
/// Reposo → candidato (primera etiqueta válida) → emisión al juntar
/// `confirm_frames` frames consecutivos → enfriamiento de `cooldown_ms`.
/// Un cambio de etiqueta reinicia la cuenta; la ausencia de etiqueta
/// aborta al candidato. Cada gesto se emite exactamente una vez.
pub struct GestureStabilizer {
    hand: Hand,
    config: StabilizerConfig,
    state: State,
}

impl GestureStabilizer {
    pub fn new(hand: Hand, config: StabilizerConfig) -> Self {
        Self {
            hand,
            config,
            state: State::Idle,
        }
    }

    /// Fusión pose/movimiento: la pose gana si su confianza alcanza
    /// `pose_floor`; si no, manda el movimiento y la pose queda de respaldo.
    fn fuse(
        &self,
        pose: PoseClassification,
        motion: MotionClassification,
    ) -> Option<(GestureLabel, f32)> {
        let pose_obs = pose.label.map(|l| (GestureLabel::Pose(l), pose.confidence));
        let motion_obs = motion
            .label
            .map(|l| (GestureLabel::Motion(l), motion.confidence));

        let picked = match (pose_obs, motion_obs) {
            (Some(p), _) if pose.confidence >= self.config.pose_floor => Some(p),
            (_, Some(m)) => Some(m),
            (p, None) => p,
        };
        picked.filter(|(_, conf)| *conf >= self.config.min_confidence)
    }

    /// Procesa un frame y devuelve un evento solo en el frame que lo confirma
    pub fn observe(
        &mut self,
        pose: PoseClassification,
        motion: MotionClassification,
        timestamp_ms: u64,
    ) -> Option<GestureEvent> {
        let instant = self.fuse(pose, motion);

        if let State::Cooldown { until_ms } = self.state {
            if timestamp_ms < until_ms {
                return None;
            }
            self.state = State::Idle;
        }

        let (label, conf) = match instant {
            Some(obs) => obs,
            None => {
                // Sin observación el candidato se abandona
                self.state = State::Idle;
                return None;
            }
        };

        let (count, confidence) = match self.state {
            State::Candidate {
                label: current,
                count,
                confidence,
            } if current == label => (count + 1, confidence.max(conf)),
            _ => (1, conf),
        };

        if count >= self.config.confirm_frames {
            self.state = State::Cooldown {
                until_ms: timestamp_ms + self.config.cooldown_ms,
            };
            return Some(GestureEvent {
                hand: self.hand,
                label,
                confidence,
                timestamp_ms,
            });
        }

        self.state = State::Candidate {
            label,
            count,
            confidence,
        };
        None
    }

    /// Vuelve al reposo (p. ej. cuando la mano sale del encuadre)
    pub fn reset(&mut self) {
        self.state = State::Idle;
    }

    pub fn config(&self) -> &StabilizerConfig {
        &self.config
    }
}
