use crate::context_resolver::ContextProfile;
use crate::gesture_stabilizer::GestureEvent;

/// Identificador del comando de puntero que lleva deltas como parámetro
pub const POINTER_COMMAND: &str = "mouse_cursor";

/// Comando abstracto hacia el integrador externo. `cursor_delta` solo viene
/// poblado en comandos de puntero.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub id: String,
    pub cursor_delta: Option<(i32, i32)>,
}

impl Command {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cursor_delta: None,
        }
    }

    /// Comando de puntero con el delta suavizado en píxeles
    pub fn pointer(dx: i32, dy: i32) -> Self {
        Self {
            id: POINTER_COMMAND.to_string(),
            cursor_delta: Some((dx, dy)),
        }
    }
}

/// Traduce eventos confirmados a comandos según el perfil activo.
///
/// El perfil de la aplicación manda; si no define la etiqueta, decide el
/// perfil por defecto. Sin entrada en ninguno de los dos, el gesto se
/// descarta en silencio.
pub struct CommandMapper;

impl CommandMapper {
    pub fn resolve(
        event: &GestureEvent,
        active: &ContextProfile,
        default: &ContextProfile,
    ) -> Option<Command> {
        let label = event.label.as_str();
        active
            .get(label)
            .or_else(|| default.get(label))
            .map(Command::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture_stabilizer::GestureLabel;
    use crate::motion_tracker::MotionLabel;
    use crate::pose_classifier::PoseLabel;
    use crate::types::Hand;

    fn event(label: GestureLabel) -> GestureEvent {
        GestureEvent {
            hand: Hand::Right,
            label,
            confidence: 0.9,
            timestamp_ms: 0,
        }
    }

    fn profile(pairs: &[(&str, &str)]) -> ContextProfile {
        ContextProfile {
            bindings: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn active_profile_beats_default() {
        let active = profile(&[("FIST", "save_file")]);
        let default = profile(&[("FIST", "volume_down")]);
        let cmd = CommandMapper::resolve(
            &event(GestureLabel::Pose(PoseLabel::Fist)),
            &active,
            &default,
        )
        .unwrap();
        assert_eq!(cmd.id, "save_file");
    }

    #[test]
    fn label_missing_in_active_falls_back() {
        let active = profile(&[("FIST", "save_file")]);
        let default = profile(&[("THUMBS_UP", "play_pause")]);
        let cmd = CommandMapper::resolve(
            &event(GestureLabel::Pose(PoseLabel::ThumbsUp)),
            &active,
            &default,
        )
        .unwrap();
        assert_eq!(cmd.id, "play_pause");
    }

    #[test]
    fn unmapped_label_is_dropped() {
        let active = profile(&[]);
        let default = profile(&[("FIST", "volume_down")]);
        let cmd = CommandMapper::resolve(
            &event(GestureLabel::Motion(MotionLabel::SwipeUp)),
            &active,
            &default,
        );
        assert!(cmd.is_none());
    }

    #[test]
    fn motion_labels_also_map() {
        let active = profile(&[("SWIPE_LEFT", "next_track")]);
        let default = profile(&[]);
        let cmd = CommandMapper::resolve(
            &event(GestureLabel::Motion(MotionLabel::SwipeLeft)),
            &active,
            &default,
        )
        .unwrap();
        assert_eq!(cmd.id, "next_track");
        assert!(cmd.cursor_delta.is_none());
    }

    #[test]
    fn pointer_command_carries_the_delta() {
        let cmd = Command::pointer(12, -4);
        assert_eq!(cmd.id, POINTER_COMMAND);
        assert_eq!(cmd.cursor_delta, Some((12, -4)));
    }
}
