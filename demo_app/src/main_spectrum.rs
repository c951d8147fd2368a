//! Background colour spectrum demo
//!
//! Cycles the window clear colour through the hue wheel, one full turn every
//! ten seconds. Runs headless for a fixed number of frames unless a config
//! file passed as the first argument says otherwise.

use nora_engine::foundation::logging;
use nora_engine::prelude::*;

/// Hue turns per second
const HUE_SPEED: f32 = 0.1;

#[derive(Default)]
struct SpectrumApp {
    hue: f32,
}

impl Application for SpectrumApp {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        engine.window.set_title("Background Color Spectrum - Nora Engine Example");
        engine.window.set_size(800, 600);
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
        self.hue = (self.hue + HUE_SPEED * delta_time).rem_euclid(1.0);
        engine.window.background_color = Color::from_hsv(self.hue, 1.0, 1.0);

        if engine.frame_count() % 60 == 0 {
            let color = engine.window.background_color;
            log::info!(
                "frame {:>4}  hue {:.3}  rgb ({:.2}, {:.2}, {:.2})",
                engine.frame_count(),
                self.hue,
                color.r,
                color.g,
                color.b
            );
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        log::info!("Final background colour: {:?}", engine.window.background_color);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load_from_file(path)?,
        None => EngineConfig::default().with_fixed_frames(1.0 / 60.0, 600),
    };

    let mut app = SpectrumApp::default();
    Engine::run(config, &mut app)?;
    Ok(())
}
