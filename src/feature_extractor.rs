use crate::types::{landmark, Finger, Landmark, LandmarkSet, NUM_LANDMARKS};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("Se esperaban {NUM_LANDMARKS} landmarks, llegaron {got}")]
    InsufficientLandmarks { got: usize },

    #[error("Landmark {index} con coordenada no finita")]
    NonFiniteLandmark { index: usize },
}

/// Pares de yemas en orden fijo, parte del layout del vector de features
pub const TIP_PAIRS: [(Finger, Finger); 10] = [
    (Finger::Thumb, Finger::Index),
    (Finger::Thumb, Finger::Middle),
    (Finger::Thumb, Finger::Ring),
    (Finger::Thumb, Finger::Pinky),
    (Finger::Index, Finger::Middle),
    (Finger::Index, Finger::Ring),
    (Finger::Index, Finger::Pinky),
    (Finger::Middle, Finger::Ring),
    (Finger::Middle, Finger::Pinky),
    (Finger::Ring, Finger::Pinky),
];

/// Dimensión de referencia que no puede colapsar a cero aunque el detector
/// entregue basura; mantiene la extracción determinista
const MIN_SCALE: f32 = 1e-6;

/// Vector de features de una mano en un frame. Inmutable una vez calculado.
///
/// Todas las distancias están normalizadas por la escala de la mano
/// (muñeca → base del dedo medio), los ángulos en grados [0, 180].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    /// Ángulo de flexión en la articulación media de cada dedo,
    /// en el orden de `Finger::ALL`. 180° = dedo recto, 0° = plegado.
    pub flexion_deg: [f32; 5],
    /// Distancias entre pares de yemas, en el orden de `TIP_PAIRS`
    pub tip_distances: [f32; 10],
    /// Distancia de cada yema al centroide de la palma
    pub tip_to_centroid: [f32; 5],
    /// Normal de la palma (unitaria), producto cruz anclado en la muñeca
    pub palm_normal: [f32; 3],
    /// Centroide de los 21 landmarks, en coordenadas de frame sin normalizar
    pub centroid: Landmark,
    /// Escala usada para normalizar (muñeca → MCP del dedo medio)
    pub scale: f32,
}

/// Dimensión individual del vector, para las reglas del clasificador
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Feature {
    Flexion(Finger),
    TipDistance(Finger, Finger),
    TipToCentroid(Finger),
    PalmNormalZ,
}

impl FeatureVector {
    pub fn get(&self, feature: Feature) -> f32 {
        match feature {
            Feature::Flexion(f) => self.flexion_deg[f.index()],
            Feature::TipDistance(a, b) => self.tip_distances[pair_index(a, b)],
            Feature::TipToCentroid(f) => self.tip_to_centroid[f.index()],
            Feature::PalmNormalZ => self.palm_normal[2],
        }
    }
}

fn pair_index(a: Finger, b: Finger) -> usize {
    TIP_PAIRS
        .iter()
        .position(|&(p, q)| (p == a && q == b) || (p == b && q == a))
        .unwrap_or(0)
}

/// Extrae el vector de features de un conjunto de landmarks.
///
/// Función pura: sin estado compartido ni efectos. Falla con
/// `InsufficientLandmarks` si el detector entregó menos de 21 puntos.
pub fn extract(set: &LandmarkSet) -> Result<FeatureVector, FeatureError> {
    if set.points.len() < NUM_LANDMARKS {
        return Err(FeatureError::InsufficientLandmarks {
            got: set.points.len(),
        });
    }
    for (index, p) in set.points.iter().enumerate().take(NUM_LANDMARKS) {
        if !p.x.is_finite() || !p.y.is_finite() || !p.z.is_finite() {
            return Err(FeatureError::NonFiniteLandmark { index });
        }
    }

    let points = &set.points;
    let wrist = points[landmark::WRIST];

    // Escala de referencia: invariante al tamaño de mano y distancia a cámara
    let scale = wrist
        .distance_to(&points[landmark::MIDDLE_MCP])
        .max(MIN_SCALE);

    let centroid = set.centroid();

    let mut flexion_deg = [0.0f32; 5];
    for finger in Finger::ALL {
        flexion_deg[finger.index()] = joint_angle_deg(
            points[finger.base()],
            points[finger.mid_joint()],
            points[finger.tip()],
        );
    }

    let mut tip_distances = [0.0f32; 10];
    for (i, &(a, b)) in TIP_PAIRS.iter().enumerate() {
        tip_distances[i] = points[a.tip()].distance_to(&points[b.tip()]) / scale;
    }

    let mut tip_to_centroid = [0.0f32; 5];
    for finger in Finger::ALL {
        tip_to_centroid[finger.index()] = points[finger.tip()].distance_to(&centroid) / scale;
    }

    let palm_normal = palm_normal(
        wrist,
        points[landmark::INDEX_MCP],
        points[landmark::PINKY_MCP],
    );

    Ok(FeatureVector {
        flexion_deg,
        tip_distances,
        tip_to_centroid,
        palm_normal,
        centroid,
        scale,
    })
}

/// Ángulo en `mid` entre los huesos mid→base y mid→tip, en grados
fn joint_angle_deg(base: Landmark, mid: Landmark, tip: Landmark) -> f32 {
    let v1 = [base.x - mid.x, base.y - mid.y, base.z - mid.z];
    let v2 = [tip.x - mid.x, tip.y - mid.y, tip.z - mid.z];

    let n1 = (v1[0] * v1[0] + v1[1] * v1[1] + v1[2] * v1[2]).sqrt().max(1e-9);
    let n2 = (v2[0] * v2[0] + v2[1] * v2[1] + v2[2] * v2[2]).sqrt().max(1e-9);

    let dot = v1[0] * v2[0] + v1[1] * v2[1] + v1[2] * v2[2];
    let cos = (dot / (n1 * n2)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Normal unitaria del plano de la palma: cruz de (muñeca → MCP índice) con
/// (muñeca → MCP meñique)
fn palm_normal(wrist: Landmark, index_mcp: Landmark, pinky_mcp: Landmark) -> [f32; 3] {
    let u = [
        index_mcp.x - wrist.x,
        index_mcp.y - wrist.y,
        index_mcp.z - wrist.z,
    ];
    let v = [
        pinky_mcp.x - wrist.x,
        pinky_mcp.y - wrist.y,
        pinky_mcp.z - wrist.z,
    ];

    let cross = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    let norm = (cross[0] * cross[0] + cross[1] * cross[1] + cross[2] * cross[2])
        .sqrt()
        .max(1e-9);

    [cross[0] / norm, cross[1] / norm, cross[2] / norm]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{fist, open_palm};
    use crate::types::Hand;

    #[test]
    fn rejects_fewer_than_21_landmarks() {
        let set = LandmarkSet::new(Hand::Right, vec![Landmark::default(); 10], 0.9);
        let err = extract(&set).unwrap_err();
        assert!(matches!(err, FeatureError::InsufficientLandmarks { got: 10 }));
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        let mut set = open_palm(Hand::Right);
        set.points[5].y = f32::NAN;
        let err = extract(&set).unwrap_err();
        assert!(matches!(err, FeatureError::NonFiniteLandmark { index: 5 }));
    }

    #[test]
    fn extraction_is_deterministic() {
        let set = open_palm(Hand::Right);
        let a = extract(&set).unwrap();
        let b = extract(&set).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn open_palm_has_straight_fingers() {
        let fv = extract(&open_palm(Hand::Right)).unwrap();
        for finger in Finger::ALL {
            assert!(
                fv.flexion_deg[finger.index()] > 150.0,
                "dedo {:?} con flexión {}",
                finger,
                fv.flexion_deg[finger.index()]
            );
        }
    }

    #[test]
    fn fist_has_curled_fingers() {
        let fv = extract(&fist(Hand::Right)).unwrap();
        for finger in Finger::ALL {
            assert!(
                fv.flexion_deg[finger.index()] < 40.0,
                "dedo {:?} con flexión {}",
                finger,
                fv.flexion_deg[finger.index()]
            );
        }
    }

    #[test]
    fn distances_normalized_by_scale() {
        // La misma mano al doble de tamaño produce las mismas distancias
        let base = open_palm(Hand::Right);
        let mut doubled = base.clone();
        for p in &mut doubled.points {
            p.x *= 2.0;
            p.y *= 2.0;
            p.z *= 2.0;
        }

        let fv_base = extract(&base).unwrap();
        let fv_doubled = extract(&doubled).unwrap();
        for i in 0..TIP_PAIRS.len() {
            assert!((fv_base.tip_distances[i] - fv_doubled.tip_distances[i]).abs() < 1e-4);
        }
    }

    #[test]
    fn palm_normal_is_unit_length() {
        let fv = extract(&open_palm(Hand::Right)).unwrap();
        let n = fv.palm_normal;
        let norm = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }
}
