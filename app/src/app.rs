use std::ops::ControlFlow;

use eframe::{CreationContext, Frame};
use egui::{
    Color32, ColorImage, Context, Image, TextureHandle, TextureOptions, Ui, load::SizedTexture,
};
use turmite::{
    Outcome, Phase, Simulation, StopHandle,
    render::{self, Palette},
};

pub struct App {
    sim: Simulation,
    stop: StopHandle,
    palette: Palette,
    texture: Option<TextureHandle>,
    /// Steps per frame.
    speed: u64,
    paused: bool,
    /// The grid changed since the texture was last rebuilt.
    dirty: bool,
}

impl App {
    /// Called once before the first frame.
    pub fn new(_cc: &CreationContext<'_>, sim: Simulation, speed: u64) -> Self {
        Self {
            stop: sim.stop_handle(),
            palette: Palette::new(sim.turmite().rules().colors()),
            sim,
            texture: None,
            speed,
            paused: false,
            dirty: true,
        }
    }

    fn advance(&mut self, steps: u64) {
        let report = self.sim.run(Some(steps), |_| ControlFlow::Continue(()));
        if report.steps > 0 {
            self.dirty = true;
        }
        if report.outcome == Outcome::LimitReached && !self.paused {
            log::info!("halted after {} steps", report.total_steps);
            self.paused = true;
        }
    }

    fn controls(&mut self, ui: &mut Ui) {
        let turmite = self.sim.turmite();
        let ant = turmite.ant();
        let halted = turmite.phase() == Phase::Halted;
        ui.horizontal(|ui| {
            let label = if self.paused { "Resume" } else { "Pause" };
            if ui.add_enabled(!halted, egui::Button::new(label)).clicked() {
                self.paused = !self.paused;
            }
            if ui.add_enabled(self.paused && !halted, egui::Button::new("Step")).clicked() {
                self.advance(1);
            }
            let speed = egui::Slider::new(&mut self.speed, 1..=10_000).logarithmic(true);
            ui.add(speed.text("steps/frame"));
        });
        let turmite = self.sim.turmite();
        ui.label(format!(
            "{} grid | step {} | {} cells | ant at {} heading {} in state {}",
            turmite.topology(),
            turmite.steps(),
            turmite.grid().len(),
            ant.position,
            ant.heading,
            ant.state,
        ));
    }

    fn picture(&mut self, ctx: &Context, ui: &mut Ui) {
        let available = ui.available_size();
        let settings = render::Settings {
            width: available.x.max(1.) as usize,
            height: available.y.max(1.) as usize,
            ..render::Settings::default()
        };
        let stale = self
            .texture
            .as_ref()
            .is_none_or(|t| t.size() != [settings.width, settings.height]);
        if self.dirty || stale {
            let pixels = render::render(self.sim.turmite(), settings, &self.palette);
            let pixels: Vec<Color32> = pixels.into_iter().map(From::from).collect();
            let image = ColorImage::new([settings.width, settings.height], pixels);
            let options = TextureOptions::NEAREST;
            let texture = match self.texture.take() {
                Some(mut t) if t.size() == image.size => {
                    t.set(image, options);
                    t
                }
                _ => ctx.load_texture("turmite", image, options),
            };
            self.texture = Some(texture);
            self.dirty = false;
        }
        if let Some(texture) = &self.texture {
            let size = texture.size_vec2();
            ui.add(Image::new(SizedTexture::new(texture, size)).fit_to_exact_size(size));
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        if ctx.input(|i| i.viewport().close_requested()) {
            self.stop.stop();
            return;
        }
        if !self.paused {
            self.advance(self.speed);
            ctx.request_repaint();
        }
        egui::TopBottomPanel::top("controls").show(ctx, |ui| self.controls(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.picture(ctx, ui));
    }
}
