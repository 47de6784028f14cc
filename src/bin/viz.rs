use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};

use pid_cart_sim::dynamics::state::BodySnapshot;
use pid_cart_sim::dynamics::track;
use pid_cart_sim::params::{ParamUpdate, Params};
use pid_cart_sim::sim::Simulation;

const SCENE_HEIGHT: f32 = 160.0;
const HISTORY: usize = 4_000;

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let app = CartViz::new(Params::load_or_default());
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1000.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native("PID Cart Simulator", options, Box::new(|_| Ok(Box::new(app))))
}

struct CartViz {
    sim: Simulation,
    /// Edited by the tuning grid, pushed into the simulation with `configure`.
    tuning: Params,
    history: Vec<BodySnapshot>,
}

impl CartViz {
    fn new(params: Params) -> Self {
        let sim = Simulation::new(params.clone());
        let history = vec![sim.snapshot()];
        Self { sim, tuning: params, history }
    }

    fn restart(&mut self) {
        self.sim.restart();
        self.history.clear();
        self.history.push(self.sim.snapshot());
    }

    fn tuning_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Tuning");
        let p = &mut self.tuning;
        egui::Grid::new("tuning_grid").num_columns(2).show(ui, |ui| {
            tunable(ui, "kP", &mut p.pid.kp, 0.001);
            tunable(ui, "kI", &mut p.pid.ki, 0.00001);
            tunable(ui, "kD", &mut p.pid.kd, 0.00001);
            tunable(ui, "I thresh", &mut p.pid.integral_threshold, 0.5);
            tunable(ui, "Max vel", &mut p.body.max_vel, 0.5);
            tunable(ui, "Max acc", &mut p.body.max_acc, 0.1);
            tunable(ui, "Max jerk", &mut p.body.max_jerk, 0.1);
            tunable(ui, "Friction", &mut p.constants.friction, 0.000001);
            tunable(ui, "dt", &mut p.constants.dt, 0.001);
        });
        self.sim.configure(&ParamUpdate::tunables(&self.tuning));

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("Start").clicked() {
                self.sim.start();
            }
            if ui.button("Restart").clicked() {
                self.restart();
            }
        });
        ui.label(format!("State: {:?}", self.sim.run_state()));

        let s = self.sim.snapshot();
        ui.separator();
        ui.label(format!("tick {}   t = {:.1} s", s.tick, s.time));
        ui.label(format!("x = {:.2}", s.position));
        ui.label(format!("v = {:.3}", s.velocity));
        ui.label(format!("a = {:.3}", s.acceleration));
        ui.label(format!("error = {:.2}", s.error));
        ui.label(format!("accumulated = {:.2}", self.sim.pid().accumulated_error()));
        if self.sim.reached_goal() {
            ui.colored_label(egui::Color32::from_rgb(0, 160, 0), "At goal");
        }
    }

    fn paint_scene(&self, ui: &mut egui::Ui) {
        let params = self.sim.params();
        let scale = ui.available_width() / params.track.length as f32;
        let (response, painter) =
            ui.allocate_painter(egui::vec2(ui.available_width(), SCENE_HEIGHT * scale), egui::Sense::hover());
        let origin = response.rect.left_bottom();
        // scene coordinates have y up from the bottom edge
        let to_screen = |x: f64, y: f64| origin + egui::vec2(x as f32 * scale, -(y as f32) * scale);
        let rect = |b: &track::Aabb| {
            egui::Rect::from_two_pos(to_screen(b.min.x, b.max().y), to_screen(b.max().x, b.min.y))
        };

        painter.rect_filled(response.rect, egui::CornerRadius::ZERO, egui::Color32::from_gray(220));

        let ground = egui::Rect::from_two_pos(
            to_screen(0.0, params.track.surface),
            to_screen(params.track.length, params.track.surface - params.track.thickness),
        );
        painter.rect_filled(ground, egui::CornerRadius::ZERO, egui::Color32::BLACK);

        painter.rect_filled(
            rect(&track::goal_box(params)),
            egui::CornerRadius::ZERO,
            egui::Color32::from_rgb(0, 255, 0),
        );

        if self.sim.run_state().is_running() {
            painter.rect_filled(
                rect(&track::body_box(params, self.sim.body().position)),
                egui::CornerRadius::ZERO,
                egui::Color32::from_rgb(0, 0, 255),
            );
        }
    }

    fn paint_plot(&self, ui: &mut egui::Ui) {
        let velocity: PlotPoints = self.history.iter().map(|s| [s.time, s.velocity]).collect();
        let target: PlotPoints = self.history.iter().map(|s| [s.time, s.target]).collect();
        Plot::new("velocity")
            .height(ui.available_height())
            .x_axis_label("Time (s)")
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new("Velocity", velocity));
                plot_ui.line(Line::new("Target", target));
            });
    }
}

fn tunable(ui: &mut egui::Ui, label: &str, value: &mut f64, speed: f64) {
    ui.label(label);
    ui.add(egui::DragValue::new(value).speed(speed).max_decimals(6));
    ui.end_row();
}

impl eframe::App for CartViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // one tick per frame, only while running
        if let Some(snapshot) = self.sim.tick() {
            self.history.push(snapshot);
            if self.history.len() > HISTORY {
                let excess = self.history.len() - HISTORY;
                self.history.drain(..excess);
            }
        }

        egui::SidePanel::right("tuning").min_width(220.0).show(ctx, |ui| {
            self.tuning_panel(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.paint_scene(ui);
            ui.separator();
            self.paint_plot(ui);
        });

        if self.sim.run_state().is_running() {
            ctx.request_repaint();
        }
    }
}
