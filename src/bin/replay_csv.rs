/*
Herramienta de diagnóstico: reproduce capturas CSV de landmarks y muestra
qué ve cada etapa del motor.

Uso:
    replay_csv <captura.csv | carpeta> [--dump-features]

Con una carpeta elige una captura al azar, útil para revisar lotes
grabados. Con --dump-features imprime las flexiones por frame además de
los eventos y comandos.
*/

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use quironomo::command_mapper::CommandMapper;
use quironomo::config::{default_profiles, EngineConfig};
use quironomo::csv_loader::load_frames_from_csv;
use quironomo::feature_extractor::extract;
use quironomo::pipeline::GestureEngine;
use quironomo::types::Hand;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        bail!("Uso: {} <captura.csv | carpeta> [--dump-features]", args[0]);
    }

    let dump_features = args.iter().any(|a| a == "--dump-features");

    let mut path = PathBuf::from(&args[1]);
    if path.is_dir() {
        let csv_files: Vec<PathBuf> = fs::read_dir(&path)
            .with_context(|| format!("No se pudo leer la carpeta {:?}", path))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| {
                p.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
            })
            .collect();

        if csv_files.is_empty() {
            bail!("No hay archivos CSV en {:?}", path);
        }

        use rand::Rng;
        let random_idx = rand::thread_rng().gen_range(0..csv_files.len());
        path = csv_files[random_idx].clone();
        println!("📄 Captura elegida al azar: {:?}", path);
    }

    let frames = load_frames_from_csv(&path)?;
    println!("✅ {} frames cargados de {:?}\n", frames.len(), path);

    let profiles = default_profiles();
    let global = &profiles.profiles[&profiles.default_profile];
    let mut engine = GestureEngine::new(EngineConfig::default());

    let mut total_events = 0usize;
    for frame in &frames {
        if dump_features {
            for hand in Hand::ALL {
                if let Some(set) = frame.hand(hand) {
                    match extract(set) {
                        Ok(fv) => println!(
                            "  [{} ms] {} flexiones: {:.0?} escala: {:.3}",
                            frame.timestamp_ms,
                            hand.as_str(),
                            fv.flexion_deg,
                            fv.scale
                        ),
                        Err(e) => eprintln!(
                            "  [{} ms] {} features inservibles: {}",
                            frame.timestamp_ms,
                            hand.as_str(),
                            e
                        ),
                    }
                }
            }
        }

        let out = engine.process_frame(frame);
        for ev in &out.events {
            total_events += 1;
            println!(
                "🎯 [{} ms] {} {} (conf: {:.0}%)",
                ev.timestamp_ms,
                ev.hand.as_str(),
                ev.label.as_str(),
                ev.confidence * 100.0
            );
            match CommandMapper::resolve(ev, global, global) {
                Some(cmd) => println!("🎮   → {}", cmd.id),
                None => println!("⚠️    sin comando en el perfil global"),
            }
        }
        for err in &out.errors {
            eprintln!("⚠️  [{} ms] frame descartado: {}", out.timestamp_ms, err);
        }
    }

    println!(
        "\n📊 {} eventos, {} frames descartados",
        total_events,
        engine.skipped()
    );
    Ok(())
}
