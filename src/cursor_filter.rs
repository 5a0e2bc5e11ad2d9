use serde::Deserialize;

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// Desplazamiento normalizado mínimo por frame para mover el puntero
    pub deadzone: f32,
    pub gain_x: f32, // px por unidad normalizada
    pub gain_y: f32,
    pub max_speed: f32, // px por frame
    pub alpha: f32,
    pub axis_sign_x: f32,
    pub axis_sign_y: f32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            deadzone: 0.004,
            gain_x: 1400.0, // el encuadre completo recorre ~1.5 pantallas
            gain_y: 1400.0,
            max_speed: 80.0,
            alpha: 0.55,
            axis_sign_x: 1.0,
            axis_sign_y: 1.0,
        }
    }
}

/// Convierte la posición del índice en deltas de puntero suavizados.
///
/// Zona muerta sobre el desplazamiento normalizado, ganancia a píxeles,
/// recorte de velocidad y suavizado exponencial con el delta anterior.
pub struct CursorFilter {
    last_pos: Option<(f32, f32)>,
    prev_dx: f32,
    prev_dy: f32,
    config: CursorConfig,
}

impl CursorFilter {
    pub fn new(config: CursorConfig) -> Self {
        Self {
            last_pos: None,
            prev_dx: 0.0,
            prev_dy: 0.0,
            config,
        }
    }

    /// Olvida la posición previa; el siguiente frame ancla sin mover
    pub fn reset(&mut self) {
        self.last_pos = None;
        self.prev_dx = 0.0;
        self.prev_dy = 0.0;
    }

    /// `x`, `y` son coordenadas normalizadas (0..1) del punto de control.
    pub fn update(&mut self, x: f32, y: f32) -> (i32, i32) {
        let (last_x, last_y) = match self.last_pos {
            Some(pos) => pos,
            None => {
                self.last_pos = Some((x, y));
                return (0, 0);
            }
        };
        self.last_pos = Some((x, y));

        let mut vx = x - last_x;
        let mut vy = y - last_y;

        if vx.abs() < self.config.deadzone {
            vx = 0.0;
        }
        if vy.abs() < self.config.deadzone {
            vy = 0.0;
        }

        if vx == 0.0 && vy == 0.0 {
            self.prev_dx *= 1.0 - self.config.alpha;
            self.prev_dy *= 1.0 - self.config.alpha;
            return (self.prev_dx.round() as i32, self.prev_dy.round() as i32);
        }

        let mut dx = vx * self.config.axis_sign_x * self.config.gain_x;
        let mut dy = vy * self.config.axis_sign_y * self.config.gain_y;

        dx = dx.clamp(-self.config.max_speed, self.config.max_speed);
        dy = dy.clamp(-self.config.max_speed, self.config.max_speed);

        let filtered_dx = self.config.alpha * dx + (1.0 - self.config.alpha) * self.prev_dx;
        let filtered_dy = self.config.alpha * dy + (1.0 - self.config.alpha) * self.prev_dy;

        self.prev_dx = filtered_dx;
        self.prev_dy = filtered_dy;

        (filtered_dx.round() as i32, filtered_dy.round() as i32)
    }
}
