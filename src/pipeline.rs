use thiserror::Error;

use crate::config::EngineConfig;
use crate::feature_extractor::{extract, FeatureError};
use crate::gesture_stabilizer::{GestureEvent, GestureStabilizer};
use crate::motion_tracker::{MotionError, MotionTracker};
use crate::pose_classifier::{PoseClassifier, PoseLabel};
use crate::types::{landmark, DetectionFrame, Hand, LandmarkSet, NUM_HANDS};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("features: {0}")]
    Feature(#[from] FeatureError),
    #[error("movimiento: {0}")]
    Motion(#[from] MotionError),
}

/// Salida de una mano en un frame
#[derive(Debug, Clone, PartialEq)]
pub struct HandOutput {
    pub event: Option<GestureEvent>,
    /// Posición de la yema del índice cuando la pose instantánea es POINT
    pub pointer: Option<(f32, f32)>,
}

/// Salida agregada de un frame completo
#[derive(Debug)]
pub struct FrameOutput {
    pub timestamp_ms: u64,
    pub events: Vec<GestureEvent>,
    pub pointer: Option<(f32, f32)>,
    pub errors: Vec<PipelineError>,
}

/// Cadena de procesamiento de una mano: extracción → clasificación →
/// movimiento → estabilización
struct HandPipeline {
    tracker: MotionTracker,
    stabilizer: GestureStabilizer,
    last_seen_ms: Option<u64>,
}

impl HandPipeline {
    fn new(hand: Hand, config: &EngineConfig) -> Self {
        Self {
            tracker: MotionTracker::new(config.motion.clone()),
            stabilizer: GestureStabilizer::new(hand, config.stabilizer.clone()),
            last_seen_ms: None,
        }
    }

    fn process(
        &mut self,
        classifier: &PoseClassifier,
        set: &LandmarkSet,
        timestamp_ms: u64,
    ) -> Result<HandOutput, PipelineError> {
        self.last_seen_ms = Some(timestamp_ms);

        let fv = extract(set)?;
        let pose = classifier.classify(&fv);
        let motion = self
            .tracker
            .update(fv.centroid.x, fv.centroid.y, timestamp_ms)?;

        let pointer = if pose.label == Some(PoseLabel::Point) {
            let tip = set.points[landmark::INDEX_TIP];
            Some((tip.x, tip.y))
        } else {
            None
        };

        let event = self.stabilizer.observe(pose, motion, timestamp_ms);
        Ok(HandOutput { event, pointer })
    }

    /// Frame sin esta mano. Un parpadeo breve del detector no toca el
    /// estado; pasado el plazo, todo vuelve a reposo.
    fn note_absent(&mut self, timestamp_ms: u64) {
        let timeout = self.stabilizer.config().hand_lost_timeout_ms;
        if let Some(last) = self.last_seen_ms {
            if timestamp_ms.saturating_sub(last) > timeout {
                self.stabilizer.reset();
                self.tracker.reset();
                self.last_seen_ms = None;
            }
        }
    }
}

/// Motor completo: procesa frames de landmarks y produce eventos
/// confirmados, con una cadena independiente por mano.
///
/// `process_frame` nunca falla: una mano con datos inservibles cuenta como
/// ausente en ese frame y el error queda en la salida para quien registre.
pub struct GestureEngine {
    classifier: PoseClassifier,
    config: EngineConfig,
    hands: [HandPipeline; NUM_HANDS],
    skipped: u64,
}

impl GestureEngine {
    pub fn new(config: EngineConfig) -> Self {
        let hands = [
            HandPipeline::new(Hand::Left, &config),
            HandPipeline::new(Hand::Right, &config),
        ];
        Self {
            classifier: PoseClassifier::new(),
            config,
            hands,
            skipped: 0,
        }
    }

    pub fn process_frame(&mut self, frame: &DetectionFrame) -> FrameOutput {
        let mut events = Vec::new();
        let mut pointer = None;
        let mut errors = Vec::new();

        for hand in Hand::ALL {
            let idx = hand.index();
            let pipeline = &mut self.hands[idx];

            // Una detección floja cuenta como mano ausente
            let set = frame.hands[idx]
                .as_ref()
                .filter(|s| s.confidence >= self.config.detection.min_confidence);

            match set {
                Some(set) => match pipeline.process(&self.classifier, set, frame.timestamp_ms) {
                    Ok(out) => {
                        if let Some(ev) = out.event {
                            events.push(ev);
                        }
                        if pointer.is_none() {
                            pointer = out.pointer;
                        }
                    }
                    Err(err) => {
                        self.skipped += 1;
                        errors.push(err);
                    }
                },
                None => pipeline.note_absent(frame.timestamp_ms),
            }
        }

        FrameOutput {
            timestamp_ms: frame.timestamp_ms,
            events,
            pointer,
            errors,
        }
    }

    /// Frames descartados por datos inservibles desde el arranque
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
