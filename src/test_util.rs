//! Manos sintéticas para las pruebas: geometría canónica de 21 landmarks
//! con dedos rectos o plegados según la pose deseada.

use crate::types::{Hand, Landmark, LandmarkSet, NUM_LANDMARKS};

const WRIST: (f32, f32) = (0.50, 0.85);
const FINGER_X: [f32; 4] = [0.44, 0.50, 0.56, 0.62]; // índice, medio, anular, meñique
const MCP_Y: f32 = 0.65;

fn lm(x: f32, y: f32) -> Landmark {
    Landmark::new(x, y, 0.0)
}

/// Construye una mano con cada dedo recto (`true`) o plegado (`false`),
/// en el orden pulgar, índice, medio, anular, meñique.
pub fn hand_with(hand: Hand, extended: [bool; 5]) -> LandmarkSet {
    let mut points = vec![Landmark::default(); NUM_LANDMARKS];
    points[0] = lm(WRIST.0, WRIST.1);

    // Pulgar: cmc, mcp, ip, tip
    points[1] = lm(0.42, 0.80);
    points[2] = lm(0.38, 0.75);
    if extended[0] {
        points[3] = lm(0.34, 0.70);
        points[4] = lm(0.30, 0.65);
    } else {
        points[3] = lm(0.36, 0.72);
        points[4] = lm(0.39, 0.74);
    }

    // Dedos: mcp, pip, dip, tip hacia arriba (−y) si están rectos,
    // con la yema curvada de vuelta hacia la palma si están plegados
    for (i, &x) in FINGER_X.iter().enumerate() {
        let base = 5 + i * 4;
        points[base] = lm(x, MCP_Y);
        points[base + 1] = lm(x, MCP_Y - 0.05);
        if extended[i + 1] {
            points[base + 2] = lm(x, MCP_Y - 0.10);
            points[base + 3] = lm(x, MCP_Y - 0.15);
        } else {
            points[base + 2] = lm(x + 0.01, MCP_Y - 0.01);
            points[base + 3] = lm(x + 0.01, MCP_Y + 0.03);
        }
    }

    LandmarkSet::new(hand, points, 0.95)
}

pub fn open_palm(hand: Hand) -> LandmarkSet {
    hand_with(hand, [true; 5])
}

pub fn fist(hand: Hand) -> LandmarkSet {
    hand_with(hand, [false; 5])
}

pub fn thumbs_up(hand: Hand) -> LandmarkSet {
    hand_with(hand, [true, false, false, false, false])
}

pub fn point(hand: Hand) -> LandmarkSet {
    hand_with(hand, [false, true, false, false, false])
}

pub fn peace(hand: Hand) -> LandmarkSet {
    hand_with(hand, [false, true, true, false, false])
}

pub fn stop_sign(hand: Hand) -> LandmarkSet {
    hand_with(hand, [false, true, true, true, true])
}

pub fn rock_sign(hand: Hand) -> LandmarkSet {
    hand_with(hand, [false, true, false, false, true])
}

/// Índice recto con la yema del pulgar tocando la yema del índice
pub fn pinch(hand: Hand) -> LandmarkSet {
    let mut set = hand_with(hand, [false, true, false, false, false]);
    set.points[3] = lm(0.40, 0.63);
    set.points[4] = lm(0.445, 0.51); // junto a la yema del índice (0.44, 0.50)
    set
}

/// Medio, anular y meñique rectos; pulgar e índice formando el aro
pub fn ok_sign(hand: Hand) -> LandmarkSet {
    let mut set = hand_with(hand, [false, false, true, true, true]);
    set.points[3] = lm(0.36, 0.70);
    set.points[4] = lm(0.405, 0.605);
    set.points[6] = lm(0.43, 0.61);
    set.points[7] = lm(0.42, 0.605);
    set.points[8] = lm(0.41, 0.60);
    set
}

/// Desplaza todos los landmarks de la mano (para simular swipes)
pub fn translated(set: &LandmarkSet, dx: f32, dy: f32) -> LandmarkSet {
    let mut out = set.clone();
    for p in &mut out.points {
        p.x += dx;
        p.y += dy;
    }
    out
}
