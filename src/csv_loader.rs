use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use csv::ReaderBuilder;

use crate::types::{DetectionFrame, Hand, Landmark, LandmarkSet, FRAME_INTERVAL_MS, NUM_LANDMARKS};

/// Carga una secuencia de DetectionFrame desde un CSV en el formato
/// sample,hand,landmark,x,y,z,conf. Los timestamps se sintetizan a
/// cadencia de cámara (un frame cada 33 ms).
pub fn load_frames_from_csv(path: impl AsRef<Path>) -> Result<Vec<DetectionFrame>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("No se pudo abrir el CSV {:?}", path))?;

    // sample → mano → (puntos parciales, confianza)
    let mut samples: BTreeMap<usize, [Option<PartialHand>; 2]> = BTreeMap::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record =
            result.with_context(|| format!("Fila {} inválida en {:?}", row_idx + 1, path))?;
        if record.len() < 7 {
            bail!("La fila {} no tiene 7 columnas", row_idx + 1);
        }

        let sample: usize = record[0]
            .parse()
            .with_context(|| format!("sample inválido en fila {}", row_idx + 1))?;
        let hand = match &record[1] {
            "left" => Hand::Left,
            "right" => Hand::Right,
            other => bail!("Mano desconocida '{}' en fila {}", other, row_idx + 1),
        };
        let landmark: usize = record[2]
            .parse()
            .with_context(|| format!("landmark inválido en fila {}", row_idx + 1))?;

        if landmark >= NUM_LANDMARKS {
            bail!("Landmark {} fuera de rango (fila {})", landmark, row_idx + 1);
        }

        let x: f32 = record[3].parse()?;
        let y: f32 = record[4].parse()?;
        let z: f32 = record[5].parse()?;
        let conf: f32 = record[6].parse()?;

        let slots = samples.entry(sample).or_default();
        let partial = slots[hand.index()].get_or_insert_with(PartialHand::default);
        partial.points[landmark] = Some(Landmark { x, y, z });
        partial.confidence = conf;
    }

    if samples.is_empty() {
        return Err(anyhow!("El CSV {:?} no contiene datos", path));
    }

    let max_sample = *samples.keys().max().unwrap();

    // Un sample sin filas es un frame sin manos; una mano con landmarks
    // incompletos se descarta como ausente en ese frame.
    let mut frames = Vec::with_capacity(max_sample + 1);
    for sample_idx in 0..=max_sample {
        let mut frame = DetectionFrame::new(sample_idx as u64 * FRAME_INTERVAL_MS);
        if let Some(slots) = samples.get(&sample_idx) {
            for (hand, slot) in Hand::ALL.into_iter().zip(slots.iter()) {
                if let Some(set) = slot.as_ref().and_then(|p| p.complete(hand)) {
                    frame = frame.with_hand(set);
                }
            }
        }
        frames.push(frame);
    }

    Ok(frames)
}

#[derive(Default)]
struct PartialHand {
    points: [Option<Landmark>; NUM_LANDMARKS],
    confidence: f32,
}

impl PartialHand {
    fn complete(&self, hand: Hand) -> Option<LandmarkSet> {
        let mut points = Vec::with_capacity(NUM_LANDMARKS);
        for p in &self.points {
            points.push((*p)?);
        }
        Some(LandmarkSet {
            hand,
            points,
            confidence: self.confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;
    use std::fs;

    fn write_hand(csv: &mut String, sample: usize, hand: &str, conf: f32) {
        for lm in 0..NUM_LANDMARKS {
            writeln!(
                csv,
                "{},{},{},{:.3},{:.3},0.0,{}",
                sample,
                hand,
                lm,
                0.1 + lm as f32 * 0.01,
                0.2,
                conf
            )
            .unwrap();
        }
    }

    #[test]
    fn rebuilds_frames_with_gaps() {
        let mut csv = String::from("sample,hand,landmark,x,y,z,conf\n");
        write_hand(&mut csv, 0, "right", 0.9);
        // El sample 1 no tiene filas
        write_hand(&mut csv, 2, "right", 0.8);
        write_hand(&mut csv, 2, "left", 0.7);

        let path = std::env::temp_dir().join("quironomo_csv_huecos_test.csv");
        fs::write(&path, &csv).unwrap();
        let frames = load_frames_from_csv(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].timestamp_ms, 0);
        assert_eq!(frames[1].timestamp_ms, FRAME_INTERVAL_MS);
        assert!(frames[0].hand(Hand::Right).is_some());
        assert!(frames[0].hand(Hand::Left).is_none());
        assert!(frames[1].hand(Hand::Right).is_none());
        assert!(frames[2].hand(Hand::Left).is_some());
        assert!(frames[2].hand(Hand::Right).is_some());

        let right = frames[2].hand(Hand::Right).unwrap();
        assert_eq!(right.points.len(), NUM_LANDMARKS);
        assert!((right.confidence - 0.8).abs() < 1e-6);
    }

    #[test]
    fn incomplete_hand_stays_absent() {
        let mut csv = String::from("sample,hand,landmark,x,y,z,conf\n");
        for lm in 0..10 {
            writeln!(csv, "0,right,{},0.1,0.2,0.0,0.9", lm).unwrap();
        }

        let path = std::env::temp_dir().join("quironomo_csv_incompleta_test.csv");
        fs::write(&path, &csv).unwrap();
        let frames = load_frames_from_csv(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(frames.len(), 1);
        assert!(frames[0].hand(Hand::Right).is_none());
    }

    #[test]
    fn unknown_hand_is_error() {
        let csv = "sample,hand,landmark,x,y,z,conf\n0,ambas,0,0.1,0.2,0.0,0.9\n";
        let path = std::env::temp_dir().join("quironomo_csv_mano_test.csv");
        fs::write(&path, csv).unwrap();
        let result = load_frames_from_csv(&path);
        let _ = fs::remove_file(&path);
        assert!(result.is_err());
    }

    #[test]
    fn empty_csv_is_error() {
        let path = std::env::temp_dir().join("quironomo_csv_vacio_test.csv");
        fs::write(&path, "sample,hand,landmark,x,y,z,conf\n").unwrap();
        let result = load_frames_from_csv(&path);
        let _ = fs::remove_file(&path);
        assert!(result.is_err());
    }
}
