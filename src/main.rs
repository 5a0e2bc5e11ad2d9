/*
Quironomo - Motor de gestos de mano con mapeo según contexto

Recibe landmarks de mano (21 puntos por mano, formato MediaPipe) y produce
comandos abstractos:
1. Extrae features geométricas invariantes a escala
2. Clasifica poses estáticas por reglas y swipes por desplazamiento
3. Estabiliza con confirmación por frames consecutivos y enfriamiento
4. Mapea al comando del perfil de la aplicación activa

Modos:
    quironomo captura.csv     reproduce una captura grabada
    quironomo                 lee frames JSON por stdin (uno por línea)

La aplicación en foco se lee de /tmp/quironomo_app_activa; el integrador
externo escribe ahí el nombre. La configuración opcional vive en
quironomo.json junto al binario.
*/

use std::env;
use std::io::BufRead;
use std::path::Path;

use anyhow::Result;
use crossbeam_channel::{bounded, unbounded};

use quironomo::command_mapper::{Command, CommandMapper};
use quironomo::config::{load_config, AppConfig};
use quironomo::context_resolver::{ContextResolver, FileAppSource};
use quironomo::csv_loader::load_frames_from_csv;
use quironomo::cursor_filter::CursorFilter;
use quironomo::pipeline::{FrameOutput, GestureEngine};
use quironomo::types::DetectionFrame;

const CONFIG_PATH: &str = "quironomo.json";
const APP_FOCUS_FILE: &str = "/tmp/quironomo_app_activa";

fn load_or_default_config() -> AppConfig {
    let path = Path::new(CONFIG_PATH);
    if path.exists() {
        match load_config(path) {
            Ok(config) => {
                println!("✅ Configuración cargada de {}", CONFIG_PATH);
                config
            }
            Err(e) => {
                eprintln!("❌ Configuración inválida, usando valores de fábrica: {:#}", e);
                AppConfig::default()
            }
        }
    } else {
        AppConfig::default()
    }
}

fn main() -> Result<()> {
    println!("🖐️  Quironomo - Motor de Gestos de Mano\n");

    let config = load_or_default_config();

    let args: Vec<String> = env::args().collect();
    if args.len() >= 2 {
        println!("🔧 Modo: Replay CSV");
        println!("📄 Captura: {}\n", args[1]);
        return replay_mode(&args[1], config);
    }

    println!("🔧 Modo: Live (frames JSON por stdin)\n");
    live_mode(config)
}

/// Reproduce una captura completa y muestra los comandos que produciría
fn replay_mode(path: &str, config: AppConfig) -> Result<()> {
    let frames = load_frames_from_csv(path)?;
    println!("✅ {} frames cargados\n", frames.len());

    let mut engine = GestureEngine::new(config.engine.clone());
    let mut resolver = ContextResolver::new(
        Box::new(FileAppSource::new(APP_FOCUS_FILE)),
        config.engine.context.clone(),
        config.profiles,
    )?;

    let mut total_commands = 0usize;
    for frame in &frames {
        let out = engine.process_frame(frame);
        resolver.refresh(out.timestamp_ms);
        for cmd in map_output(&out, &resolver) {
            total_commands += 1;
            println!("🎮 [{} ms] {}", out.timestamp_ms, cmd.id);
        }
        for err in &out.errors {
            eprintln!("⚠️  [{} ms] frame descartado: {}", out.timestamp_ms, err);
        }
    }

    println!(
        "\n📊 {} comandos, {} frames descartados",
        total_commands,
        engine.skipped()
    );
    Ok(())
}

/// Procesa frames en vivo con hilos separados para entrada y salida
fn live_mode(config: AppConfig) -> Result<()> {
    // Canal de entrada: un hilo parsea stdin y alimenta al motor
    let (tx_frame, rx_frame) = bounded::<DetectionFrame>(100);

    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    eprintln!("❌ Error leyendo stdin: {}", e);
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<DetectionFrame>(&line) {
                Ok(frame) => {
                    if tx_frame.send(frame).is_err() {
                        break;
                    }
                }
                Err(e) => eprintln!("⚠️  Frame inválido: {}", e),
            }
        }
    });

    // Canal de salida: todo viaja como Command, los de puntero llevan
    // el delta como parámetro
    let (tx_command, rx_command) = unbounded::<Command>();

    std::thread::spawn(move || {
        while let Ok(cmd) = rx_command.recv() {
            match cmd.cursor_delta {
                Some((dx, dy)) => println!("🖱️  Cursor: ({}, {})", dx, dy),
                None => println!("🎮 Comando: {}", cmd.id),
            }
        }
    });

    let mut engine = GestureEngine::new(config.engine.clone());
    let mut resolver = ContextResolver::new(
        Box::new(FileAppSource::new(APP_FOCUS_FILE)),
        config.engine.context.clone(),
        config.profiles,
    )?;
    let mut cursor_filter = CursorFilter::new(config.engine.cursor);
    let mut pointer_was_active = false;

    println!("✅ Motor listo, esperando frames...\n");

    while let Ok(frame) = rx_frame.recv() {
        let out = engine.process_frame(&frame);
        resolver.refresh(out.timestamp_ms);

        for cmd in map_output(&out, &resolver) {
            let _ = tx_command.send(cmd);
        }

        // Puntero: anclar al entrar en modo POINT para evitar saltos
        match out.pointer {
            Some((x, y)) => {
                if !pointer_was_active {
                    cursor_filter.reset();
                }
                pointer_was_active = true;
                let (dx, dy) = cursor_filter.update(x, y);
                if dx != 0 || dy != 0 {
                    let _ = tx_command.send(Command::pointer(dx, dy));
                }
            }
            None => pointer_was_active = false,
        }

        for err in &out.errors {
            eprintln!("⚠️  [{} ms] frame descartado: {}", out.timestamp_ms, err);
        }
    }

    println!("\n👋 Entrada agotada, saliendo");
    Ok(())
}

fn map_output(out: &FrameOutput, resolver: &ContextResolver) -> Vec<Command> {
    out.events
        .iter()
        .filter_map(|ev| {
            CommandMapper::resolve(ev, resolver.current_profile(), resolver.default_profile())
        })
        .collect()
}
