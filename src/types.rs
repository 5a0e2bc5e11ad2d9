use serde::{Deserialize, Serialize};

/// Número de landmarks por mano que entrega el detector externo
pub const NUM_LANDMARKS: usize = 21;

/// Máximo de manos rastreadas simultáneamente
pub const NUM_HANDS: usize = 2;

/// Intervalo nominal entre frames a 30 fps (ms)
pub const FRAME_INTERVAL_MS: u64 = 33;

/// Índices de landmarks según el modelo de 21 puntos
pub mod landmark {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// Punto 3D normalizado al frame: x, y en [0,1], z = profundidad relativa
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Distancia euclidiana 3D a otro landmark
    pub fn distance_to(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Identidad de la mano reportada por el detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub const ALL: [Hand; NUM_HANDS] = [Hand::Left, Hand::Right];

    /// Slot dentro de un `DetectionFrame`
    pub fn index(self) -> usize {
        match self {
            Hand::Left => 0,
            Hand::Right => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Hand::Left => "left",
            Hand::Right => "right",
        }
    }
}

/// Dedos de la mano, en el orden de los arreglos de features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    pub fn index(self) -> usize {
        match self {
            Finger::Thumb => 0,
            Finger::Index => 1,
            Finger::Middle => 2,
            Finger::Ring => 3,
            Finger::Pinky => 4,
        }
    }

    /// Landmark de la yema
    pub fn tip(self) -> usize {
        match self {
            Finger::Thumb => landmark::THUMB_TIP,
            Finger::Index => landmark::INDEX_TIP,
            Finger::Middle => landmark::MIDDLE_TIP,
            Finger::Ring => landmark::RING_TIP,
            Finger::Pinky => landmark::PINKY_TIP,
        }
    }

    /// Articulación media (IP para el pulgar, PIP para el resto)
    pub fn mid_joint(self) -> usize {
        match self {
            Finger::Thumb => landmark::THUMB_IP,
            Finger::Index => landmark::INDEX_PIP,
            Finger::Middle => landmark::MIDDLE_PIP,
            Finger::Ring => landmark::RING_PIP,
            Finger::Pinky => landmark::PINKY_PIP,
        }
    }

    /// Base del dedo (MCP)
    pub fn base(self) -> usize {
        match self {
            Finger::Thumb => landmark::THUMB_MCP,
            Finger::Index => landmark::INDEX_MCP,
            Finger::Middle => landmark::MIDDLE_MCP,
            Finger::Ring => landmark::RING_MCP,
            Finger::Pinky => landmark::PINKY_MCP,
        }
    }
}

/// Conjunto de landmarks de una mano en un frame, tal como lo entrega el
/// detector externo. Vive solo durante el procesamiento de ese frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkSet {
    pub hand: Hand,
    /// Se esperan exactamente `NUM_LANDMARKS` puntos; el extractor valida
    pub points: Vec<Landmark>,
    /// Confianza de detección reportada, en [0,1]
    pub confidence: f32,
}

impl LandmarkSet {
    pub fn new(hand: Hand, points: Vec<Landmark>, confidence: f32) -> Self {
        Self {
            hand,
            points,
            confidence,
        }
    }

    /// Centroide de todos los landmarks (coordenadas de frame)
    pub fn centroid(&self) -> Landmark {
        if self.points.is_empty() {
            return Landmark::default();
        }
        let n = self.points.len() as f32;
        let mut c = Landmark::default();
        for p in &self.points {
            c.x += p.x;
            c.y += p.y;
            c.z += p.z;
        }
        Landmark::new(c.x / n, c.y / n, c.z / n)
    }
}

/// Frame de detección: timestamp en ms y un slot opcional por mano
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionFrame {
    pub timestamp_ms: u64,
    pub hands: [Option<LandmarkSet>; NUM_HANDS],
}

impl DetectionFrame {
    pub fn new(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            hands: [None, None],
        }
    }

    pub fn with_hand(mut self, set: LandmarkSet) -> Self {
        let idx = set.hand.index();
        self.hands[idx] = Some(set);
        self
    }

    pub fn hand(&self, hand: Hand) -> Option<&LandmarkSet> {
        self.hands[hand.index()].as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_averages_points() {
        let set = LandmarkSet::new(
            Hand::Right,
            vec![Landmark::new(0.0, 0.0, 0.0), Landmark::new(1.0, 1.0, 0.0)],
            1.0,
        );
        let c = set.centroid();
        assert!((c.x - 0.5).abs() < 1e-6);
        assert!((c.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn frame_assigns_slot_per_hand() {
        let set = LandmarkSet::new(Hand::Left, vec![Landmark::default(); NUM_LANDMARKS], 0.9);
        let frame = DetectionFrame::new(100).with_hand(set);
        assert!(frame.hand(Hand::Left).is_some());
        assert!(frame.hand(Hand::Right).is_none());
    }

    #[test]
    fn finger_indices_within_range() {
        for finger in Finger::ALL {
            assert!(finger.tip() < NUM_LANDMARKS);
            assert!(finger.base() < finger.mid_joint());
            assert!(finger.mid_joint() < finger.tip());
        }
    }
}
