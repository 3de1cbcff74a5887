/// The `egui` re-export for building native GUIs with the eframe framework.
use eframe::egui::{self, Color32, Pos2, Stroke};
/// Additional 2D geometric tools from eframe, e.g. `Vec2`.
use eframe::epaint::Vec2;
/// The `egui_plot` crate for plotting data in an egui-based app.
use egui_plot::{Line, Plot, PlotPoints};

mod config;
mod density;
mod emission;
mod engine;
mod histogram;
mod particle;
mod sampler;
mod stepper;

use config::{
    BARRIER_X, EMITTER_X, SCREEN_CENTER_Y, SCREEN_HEIGHT, SCREEN_X, SimulationConfig, WORLD_WIDTH,
};
use density::fringe_spacing;
use engine::Engine;
use histogram::{DEFAULT_NUM_BINS, Histogram};
use particle::Phase;

/// Visual height of each slit opening in the barrier. Rendering only; the
/// physics treats slits as points at their centers.
const SLIT_GAP: f32 = 14.0;

// ===================================================================================
// Main Application
// ===================================================================================

/// The primary application state:
/// - the configuration panel (sliders, observer toggle) feeding the engine a
///   fresh snapshot every frame
/// - the engine itself plus the histogram sink it reports landings to
/// - the "running" flag, which gates emission only: stopping lets particles
///   already in flight finish their journey
struct App {
    config: SimulationConfig,
    engine: Engine,
    histogram: Histogram,
    running: bool,
    /// Last seen (separation, wavelength, observer) triple; when it changes,
    /// the accumulated histogram no longer describes the current pattern and
    /// is reset.
    pattern_key: (f32, f32, bool),
}

impl App {
    fn new() -> Self {
        let config = SimulationConfig::default();
        let pattern_key = (
            config.slit_separation,
            config.wavelength,
            config.observer_active,
        );
        Self {
            config,
            engine: Engine::new(),
            histogram: Histogram::new(DEFAULT_NUM_BINS, SCREEN_HEIGHT / DEFAULT_NUM_BINS as f32),
            running: false,
            pattern_key,
        }
    }

    fn reset(&mut self) {
        self.engine.reset();
        self.histogram.reset();
    }

    /// Advance the engine by this frame's elapsed time and feed landings into
    /// the histogram sink.
    fn tick(&mut self, ctx: &egui::Context) {
        let dt = ctx.input(|i| i.stable_dt).min(0.1);
        match self.engine.advance_tick(dt, &self.config, self.running) {
            Ok(events) => {
                for event in events {
                    self.histogram.record(event.y);
                }
            }
            Err(err) => {
                // Unreachable through the sliders, but the engine contract is
                // to reject rather than run on a bad snapshot.
                log::error!("invalid configuration: {err}");
                self.running = false;
            }
        }
    }

    fn draw_apparatus(&self, painter: &egui::Painter, rect: egui::Rect, scale: f32) {
        let to_screen = |x: f32, y: f32| -> Pos2 { rect.min + Vec2::new(x, y) * scale };

        let barrier_stroke = Stroke::new(3.0, Color32::GRAY);
        let top_slit = particle::Slit::Top.center_y(self.config.slit_separation);
        let bottom_slit = particle::Slit::Bottom.center_y(self.config.slit_separation);

        // Barrier wall in three pieces, leaving the slit openings clear.
        painter.line_segment(
            [
                to_screen(BARRIER_X, 0.0),
                to_screen(BARRIER_X, top_slit - SLIT_GAP / 2.0),
            ],
            barrier_stroke,
        );
        painter.line_segment(
            [
                to_screen(BARRIER_X, top_slit + SLIT_GAP / 2.0),
                to_screen(BARRIER_X, bottom_slit - SLIT_GAP / 2.0),
            ],
            barrier_stroke,
        );
        painter.line_segment(
            [
                to_screen(BARRIER_X, bottom_slit + SLIT_GAP / 2.0),
                to_screen(BARRIER_X, SCREEN_HEIGHT),
            ],
            barrier_stroke,
        );

        // Detection screen.
        painter.line_segment(
            [to_screen(SCREEN_X, 0.0), to_screen(SCREEN_X, SCREEN_HEIGHT)],
            Stroke::new(3.0, Color32::DARK_GRAY),
        );

        // Emitter.
        painter.circle_filled(
            to_screen(EMITTER_X, SCREEN_CENTER_Y),
            4.0 * scale.max(0.5),
            Color32::LIGHT_BLUE,
        );

        if self.config.show_guides {
            let guide = Stroke::new(1.0, Color32::from_gray(70));
            // Optical axis.
            painter.line_segment(
                [
                    to_screen(EMITTER_X, SCREEN_CENTER_Y),
                    to_screen(SCREEN_X, SCREEN_CENTER_Y),
                ],
                guide,
            );
            // Expected pattern maxima, ticked on the screen: fringe centers in
            // interference mode, the slit images in observed mode.
            let marks: Vec<f32> = if self.config.observer_active {
                vec![top_slit, bottom_slit]
            } else {
                let spacing = fringe_spacing(self.config.slit_separation, self.config.wavelength);
                (-6..=6)
                    .map(|n| SCREEN_CENTER_Y + n as f32 * spacing)
                    .filter(|y| (0.0..=SCREEN_HEIGHT).contains(y))
                    .collect()
            };
            for y in marks {
                painter.line_segment(
                    [to_screen(SCREEN_X - 8.0, y), to_screen(SCREEN_X, y)],
                    guide,
                );
            }
        }

        // Live particles.
        for p in self.engine.particles() {
            let color = match p.phase {
                Phase::ToSlit => Color32::LIGHT_BLUE,
                Phase::ToScreen => Color32::GOLD,
            };
            painter.circle_filled(to_screen(p.x, p.y), (2.0 * scale).max(1.0), color);
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // --------------------------
        // Sidebar with configuration
        // --------------------------
        egui::SidePanel::left("config_panel").show(ctx, |ui| {
            ui.heading("Simulation Controls");

            ui.add(
                egui::Slider::new(&mut self.config.wavelength, 380.0..=780.0).text("Wavelength"),
            );
            ui.add(
                egui::Slider::new(&mut self.config.slit_separation, 20.0..=200.0)
                    .text("Slit Separation"),
            );
            ui.add(
                egui::Slider::new(&mut self.config.emission_rate, 1.0..=60.0)
                    .text("Emission Rate (1/s)"),
            );
            ui.checkbox(&mut self.config.observer_active, "Observer at slits");
            ui.checkbox(&mut self.config.show_guides, "Show guides");

            ui.separator();

            if self.running {
                if ui.button("Stop").clicked() {
                    self.running = false;
                }
            } else if ui.button("Start").clicked() {
                self.running = true;
            }
            if ui.button("Reset").clicked() {
                self.reset();
            }
        });

        // The accumulated pattern only makes sense for one configuration.
        let key = (
            self.config.slit_separation,
            self.config.wavelength,
            self.config.observer_active,
        );
        if key != self.pattern_key {
            self.pattern_key = key;
            self.histogram.reset();
        }

        // Advance even when stopped: the running flag gates emission, while
        // particles already in flight keep moving until they land.
        self.tick(ctx);

        // ------------------------------------
        // UI layout for top, right, central
        // ------------------------------------
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.heading("Double-Slit Particle Simulation");
            ui.label(format!(
                "Mode: {} | In flight: {} | Detections: {}",
                if self.config.observer_active {
                    "observed (classical)"
                } else {
                    "unobserved (interference)"
                },
                self.engine.particle_count(),
                self.histogram.total(),
            ));
        });

        egui::SidePanel::right("histogram_panel")
            .resizable(true)
            .show(ctx, |ui| {
                ui.label("Landing distribution");
                let plot = Plot::new("landing_histogram")
                    .width(220.0)
                    .height(420.0)
                    .allow_scroll(true)
                    .allow_drag(true);

                plot.show(ui, |plot_ui| {
                    let points: Vec<[f64; 2]> = self
                        .histogram
                        .counts()
                        .iter()
                        .enumerate()
                        .map(|(i, &count)| [self.histogram.bin_center(i) as f64, count as f64])
                        .collect();
                    plot_ui.line(Line::new(PlotPoints::from(points)));
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let painter = ui.painter();
            let rect = ui.max_rect();
            let scale = (rect.width() / WORLD_WIDTH).min(rect.height() / SCREEN_HEIGHT);
            self.draw_apparatus(painter, rect, scale);
        });

        // Keep animating (or remain static if stopped and drained).
        ctx.request_repaint();
    }
}

// ===================================================================================
// main
// ===================================================================================

fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions {
        ..Default::default()
    };

    eframe::run_native(
        "Double-Slit Particle Simulation",
        native_options,
        Box::new(|_cc| Ok(Box::new(App::new()))),
    )
}
