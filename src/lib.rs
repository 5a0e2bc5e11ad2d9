//! Motor de reconocimiento de gestos de mano: landmarks → features →
//! clasificación → estabilización → comandos según la aplicación activa.

pub mod command_mapper;
pub mod config;
pub mod context_resolver;
pub mod csv_loader;
pub mod cursor_filter;
pub mod feature_extractor;
pub mod gesture_stabilizer;
pub mod motion_tracker;
pub mod pipeline;
pub mod pose_classifier;
pub mod types;

#[cfg(test)]
pub mod test_util;
