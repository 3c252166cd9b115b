#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;

use exif_viewer::config::Config;
use exif_viewer::permissions::{GateAction, GateOutcome, Permission};
use exif_viewer::picker::DialogPicker;
use exif_viewer::viewer::Viewer;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([560.0, 720.0])
        .with_min_inner_size([360.0, 400.0]);

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "exif-viewer",
        options,
        Box::new(|cc| Ok(Box::new(App::new(cc)))),
    )
}

// ── Main application state ──────────────────────────────────────────

struct App {
    viewer: Viewer,
    picker: DialogPicker,
    status: String,
}

impl App {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let config = Config::load(None).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {e:#}");
            Config::default()
        });

        let mut viewer = Viewer::new(config.platform_version());
        let status = match viewer.start() {
            Ok(GateAction::Proceed) => "Ready — pick a media file".to_string(),
            Ok(GateAction::Request(_)) => "Waiting for permissions...".to_string(),
            Err(e) => format!("Error: {e:#}"),
        };

        Self {
            viewer,
            picker: DialogPicker::new(config.picker_start_dir()),
            status,
        }
    }

    fn answer(&mut self, pending: &[Permission], granted: bool) {
        let answers: Vec<_> = pending.iter().map(|p| (*p, granted)).collect();
        self.status = match self.viewer.answer_permissions(&answers) {
            Ok(GateOutcome::Granted) => "Ready — pick a media file".into(),
            Ok(GateOutcome::Denied) => "Permissions denied".into(),
            Err(e) => format!("Error: {e:#}"),
        };
    }

    fn pick_file(&mut self) {
        match self.viewer.pick(&mut self.picker) {
            Ok(true) => self.status = "Metadata loaded".into(),
            Ok(false) => {}
            Err(e) => self.status = format!("Error: {e:#}"),
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── Permission prompt ───────────────────────────────────────
        let pending: Option<Vec<Permission>> =
            self.viewer.pending_permissions().map(<[_]>::to_vec);
        if let Some(pending) = pending {
            self.show_permission_prompt(ctx, &pending);
        }

        // ── Status bar ──────────────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.viewer.service_running() {
                        ui.colored_label(egui::Color32::from_rgb(50, 180, 50), "● Service running");
                    } else {
                        ui.colored_label(egui::Color32::GRAY, "○ Service stopped");
                    }
                });
            });
        });

        // ── Screen: button + metadata text ──────────────────────────
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(4.0);
            if ui
                .add_enabled(self.viewer.can_pick(), egui::Button::new("Pick Media File"))
                .clicked()
            {
                self.pick_file();
            }
            ui.add_space(8.0);
            ui.separator();

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let text = self.viewer.output().text();
                    if text.is_empty() {
                        ui.label(
                            egui::RichText::new("No file selected")
                                .color(egui::Color32::GRAY),
                        );
                    } else {
                        ui.label(egui::RichText::new(text).monospace().size(14.0));
                    }
                });
        });
    }
}

impl App {
    fn show_permission_prompt(&mut self, ctx: &egui::Context, pending: &[Permission]) {
        egui::Window::new("Permissions required")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("exif-viewer needs the following to read your media:");
                ui.add_space(4.0);
                for permission in pending {
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(permission.description()).strong());
                        ui.label(
                            egui::RichText::new(permission.id())
                                .small()
                                .color(egui::Color32::GRAY),
                        );
                    });
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Allow").clicked() {
                        self.answer(pending, true);
                    }
                    if ui.button("Deny").clicked() {
                        self.answer(pending, false);
                    }
                });
            });
    }
}
