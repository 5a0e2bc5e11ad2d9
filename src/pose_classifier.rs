use crate::feature_extractor::{Feature, FeatureVector};
use crate::types::Finger;

/// Poses estáticas reconocidas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoseLabel {
    OpenPalm,
    Fist,
    ThumbsUp,
    Peace,
    OkSign,
    Point,
    Pinch,
    Stop,
    Rock,
}

impl PoseLabel {
    /// Etiqueta textual usada en los perfiles de contexto
    pub fn as_str(self) -> &'static str {
        match self {
            PoseLabel::OpenPalm => "OPEN_PALM",
            PoseLabel::Fist => "FIST",
            PoseLabel::ThumbsUp => "THUMBS_UP",
            PoseLabel::Peace => "PEACE",
            PoseLabel::OkSign => "OK_SIGN",
            PoseLabel::Point => "POINT",
            PoseLabel::Pinch => "PINCH",
            PoseLabel::Stop => "STOP",
            PoseLabel::Rock => "ROCK",
        }
    }
}

/// Resultado de clasificación: exactamente una etiqueta (o ninguna) por frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseClassification {
    pub label: Option<PoseLabel>,
    pub confidence: f32,
}

impl PoseClassification {
    pub fn none() -> Self {
        Self {
            label: None,
            confidence: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Cmp {
    Above,
    Below,
}

/// Comparación de umbral sobre una dimensión del vector de features.
/// `margin_norm` normaliza cuánto se excede el umbral para la confianza.
#[derive(Debug, Clone)]
struct Condition {
    feature: Feature,
    cmp: Cmp,
    threshold: f32,
    margin_norm: f32,
}

impl Condition {
    /// `Some(margen normalizado)` si la condición se cumple, `None` si no
    fn eval(&self, fv: &FeatureVector) -> Option<f32> {
        let value = fv.get(self.feature);
        let margin = match self.cmp {
            Cmp::Above => value - self.threshold,
            Cmp::Below => self.threshold - value,
        };
        if margin > 0.0 {
            Some((margin / self.margin_norm).clamp(0.0, 1.0))
        } else {
            None
        }
    }
}

/// Regla con nombre: conjunción de comparaciones de umbral
#[derive(Debug, Clone)]
pub struct PoseRule {
    pub label: PoseLabel,
    conditions: Vec<Condition>,
}

impl PoseRule {
    /// Confianza = margen mínimo entre todas las condiciones (la más justa
    /// al umbral manda)
    fn matches(&self, fv: &FeatureVector) -> Option<f32> {
        let mut min_margin = 1.0f32;
        for cond in &self.conditions {
            min_margin = min_margin.min(cond.eval(fv)?);
        }
        Some(min_margin)
    }
}

const ANGLE_MARGIN: f32 = 30.0; // grados
const DIST_MARGIN: f32 = 0.15; // distancia normalizada

const EXTENDED_DEG: f32 = 150.0;
const FIST_DEG: f32 = 40.0;
const CURLED_DEG: f32 = 100.0;
const OK_RING_DIST: f32 = 0.35;
const PINCH_DIST: f32 = 0.25;

fn flex_above(finger: Finger, threshold: f32) -> Condition {
    Condition {
        feature: Feature::Flexion(finger),
        cmp: Cmp::Above,
        threshold,
        margin_norm: ANGLE_MARGIN,
    }
}

fn flex_below(finger: Finger, threshold: f32) -> Condition {
    Condition {
        feature: Feature::Flexion(finger),
        cmp: Cmp::Below,
        threshold,
        margin_norm: ANGLE_MARGIN,
    }
}

fn tips_close(a: Finger, b: Finger, threshold: f32) -> Condition {
    Condition {
        feature: Feature::TipDistance(a, b),
        cmp: Cmp::Below,
        threshold,
        margin_norm: DIST_MARGIN,
    }
}

/// Clasificador de poses por reglas geométricas ordenadas.
///
/// El orden de evaluación es parte del contrato — la primera regla que se
/// cumple gana. Tabla por defecto:
///
/// 1. OPEN_PALM — flexión de los 5 dedos > 150°
/// 2. FIST      — flexión de los 5 dedos < 40°
/// 3. OK_SIGN   — yemas pulgar-índice < 0.35 y medio/anular/meñique > 150°
/// 4. PINCH     — yemas pulgar-índice < 0.25 (antes que POINT: un índice
///               recto con pinza activa es PINCH, no POINT)
/// 5. THUMBS_UP — pulgar > 150° y el resto < 100°
/// 6. PEACE     — índice y medio > 150°, anular y meñique < 100°, pulgar < 150°
/// 7. ROCK      — índice y meñique > 150°, medio y anular < 100°, pulgar < 150°
/// 8. STOP      — índice/medio/anular/meñique > 150°, pulgar < 150°
/// 9. POINT     — índice > 150° y medio/anular/meñique < 100°
pub struct PoseClassifier {
    rules: Vec<PoseRule>,
}

impl PoseClassifier {
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    pub fn with_rules(rules: Vec<PoseRule>) -> Self {
        Self { rules }
    }

    /// Devuelve exactamente una etiqueta (posiblemente ninguna) con su
    /// confianza. Sin empates: el orden de la tabla decide.
    pub fn classify(&self, fv: &FeatureVector) -> PoseClassification {
        for rule in &self.rules {
            if let Some(margin) = rule.matches(fv) {
                return PoseClassification {
                    label: Some(rule.label),
                    confidence: margin,
                };
            }
        }
        PoseClassification::none()
    }

    pub fn rules(&self) -> &[PoseRule] {
        &self.rules
    }
}

impl Default for PoseClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn default_rules() -> Vec<PoseRule> {
    use Finger::*;

    vec![
        PoseRule {
            label: PoseLabel::OpenPalm,
            conditions: Finger::ALL
                .iter()
                .map(|&f| flex_above(f, EXTENDED_DEG))
                .collect(),
        },
        PoseRule {
            label: PoseLabel::Fist,
            conditions: Finger::ALL
                .iter()
                .map(|&f| flex_below(f, FIST_DEG))
                .collect(),
        },
        PoseRule {
            label: PoseLabel::OkSign,
            conditions: vec![
                tips_close(Thumb, Index, OK_RING_DIST),
                flex_above(Middle, EXTENDED_DEG),
                flex_above(Ring, EXTENDED_DEG),
                flex_above(Pinky, EXTENDED_DEG),
            ],
        },
        PoseRule {
            label: PoseLabel::Pinch,
            conditions: vec![tips_close(Thumb, Index, PINCH_DIST)],
        },
        PoseRule {
            label: PoseLabel::ThumbsUp,
            conditions: vec![
                flex_above(Thumb, EXTENDED_DEG),
                flex_below(Index, CURLED_DEG),
                flex_below(Middle, CURLED_DEG),
                flex_below(Ring, CURLED_DEG),
                flex_below(Pinky, CURLED_DEG),
            ],
        },
        PoseRule {
            label: PoseLabel::Peace,
            conditions: vec![
                flex_above(Index, EXTENDED_DEG),
                flex_above(Middle, EXTENDED_DEG),
                flex_below(Ring, CURLED_DEG),
                flex_below(Pinky, CURLED_DEG),
                flex_below(Thumb, EXTENDED_DEG),
            ],
        },
        PoseRule {
            label: PoseLabel::Rock,
            conditions: vec![
                flex_above(Index, EXTENDED_DEG),
                flex_above(Pinky, EXTENDED_DEG),
                flex_below(Middle, CURLED_DEG),
                flex_below(Ring, CURLED_DEG),
                flex_below(Thumb, EXTENDED_DEG),
            ],
        },
        PoseRule {
            label: PoseLabel::Stop,
            conditions: vec![
                flex_above(Index, EXTENDED_DEG),
                flex_above(Middle, EXTENDED_DEG),
                flex_above(Ring, EXTENDED_DEG),
                flex_above(Pinky, EXTENDED_DEG),
                flex_below(Thumb, EXTENDED_DEG),
            ],
        },
        PoseRule {
            label: PoseLabel::Point,
            conditions: vec![
                flex_above(Index, EXTENDED_DEG),
                flex_below(Middle, CURLED_DEG),
                flex_below(Ring, CURLED_DEG),
                flex_below(Pinky, CURLED_DEG),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_extractor::extract;
    use crate::test_util::*;
    use crate::types::Hand;

    fn classify_set(set: &crate::types::LandmarkSet) -> PoseClassification {
        let fv = extract(set).unwrap();
        PoseClassifier::new().classify(&fv)
    }

    #[test]
    fn recognizes_each_synthetic_pose() {
        let cases = [
            (open_palm(Hand::Right), PoseLabel::OpenPalm),
            (fist(Hand::Right), PoseLabel::Fist),
            (thumbs_up(Hand::Right), PoseLabel::ThumbsUp),
            (point(Hand::Right), PoseLabel::Point),
            (peace(Hand::Right), PoseLabel::Peace),
            (stop_sign(Hand::Right), PoseLabel::Stop),
            (rock_sign(Hand::Right), PoseLabel::Rock),
            (pinch(Hand::Right), PoseLabel::Pinch),
            (ok_sign(Hand::Right), PoseLabel::OkSign),
        ];

        for (set, expected) in cases {
            let c = classify_set(&set);
            assert_eq!(c.label, Some(expected), "esperaba {:?}", expected);
            assert!(c.confidence > 0.0);
        }
    }

    #[test]
    fn pinch_beats_point_by_rule_order() {
        // La pinza mantiene el índice recto: sin el orden de la tabla
        // también calzaría POINT
        let c = classify_set(&pinch(Hand::Right));
        assert_eq!(c.label, Some(PoseLabel::Pinch));
    }

    #[test]
    fn no_rule_matched_returns_none() {
        // Pulgar recto + palma abierta parcial no calza ninguna regla
        let set = hand_with(Hand::Right, [true, true, true, false, false]);
        let c = classify_set(&set);
        assert_eq!(c.label, None);
        assert_eq!(c.confidence, 0.0);
    }

    #[test]
    fn classification_is_idempotent() {
        let fv = extract(&fist(Hand::Left)).unwrap();
        let clf = PoseClassifier::new();
        assert_eq!(clf.classify(&fv), clf.classify(&fv));
    }

    #[test]
    fn confidence_drops_near_threshold() {
        let clf = PoseClassifier::new();

        let mut fv = extract(&open_palm(Hand::Right)).unwrap();
        let holgada = clf.classify(&fv);

        // Flexiones apenas sobre el umbral de 150°
        fv.flexion_deg = [151.0; 5];
        let justa = clf.classify(&fv);

        assert_eq!(holgada.label, Some(PoseLabel::OpenPalm));
        assert_eq!(justa.label, Some(PoseLabel::OpenPalm));
        assert!(justa.confidence < holgada.confidence);
        assert!(justa.confidence < 0.1);
    }

    #[test]
    fn exact_threshold_does_not_match() {
        let mut fv = extract(&open_palm(Hand::Right)).unwrap();
        fv.flexion_deg = [150.0; 5];
        let c = PoseClassifier::new().classify(&fv);
        assert_ne!(c.label, Some(PoseLabel::OpenPalm));
    }

    #[test]
    fn rule_order_breaks_ties() {
        // Dos reglas que calzan con el mismo vector: gana la primera
        let rules = vec![
            PoseRule {
                label: PoseLabel::Stop,
                conditions: vec![flex_above(Finger::Index, 100.0)],
            },
            PoseRule {
                label: PoseLabel::Point,
                conditions: vec![flex_above(Finger::Index, 100.0)],
            },
        ];
        let clf = PoseClassifier::with_rules(rules);
        let fv = extract(&open_palm(Hand::Right)).unwrap();
        assert_eq!(clf.classify(&fv).label, Some(PoseLabel::Stop));
    }
}
