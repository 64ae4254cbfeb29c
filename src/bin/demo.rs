//! Live view of all gamepad slots, driven by the gilrs backend.

use color_eyre::{eyre::eyre, Result};
use eframe::egui;
use egui_gamepads::{GamepadButton, Gamepads, GilrsBackend, Slot};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    setup()?;

    info!("Starting gamepad demo");
    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "Gamepads",
        native_options,
        Box::new(|cc| {
            let pads = Gamepads::new(
                cc.egui_ctx.clone(),
                Box::new(GilrsBackend::new()),
                None,
                (),
            )?;
            Ok(Box::new(DemoApp {
                pads,
                last_pressed: None,
            }) as Box<dyn eframe::App>)
        }),
    )
    .map_err(|e| eyre!("Failed to run demo: {}", e))?;

    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;

    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();
    Ok(())
}

struct DemoApp {
    pads: Gamepads,
    last_pressed: Option<(usize, GamepadButton)>,
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pads.update();

        if let Some((slot, button)) = self.pads.any_button_pressed(Slot::Any) {
            info!("Slot {} pressed {}", slot, button);
            self.last_pressed = Some((slot, button));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Gamepads");

            for index in 0..self.pads.count() {
                ui.separator();
                match self.pads.name(index) {
                    Some(name) => {
                        ui.label(format!("Slot {}: {}", index, name));
                        ui.horizontal(|ui| {
                            for button in GamepadButton::ALL {
                                let down = self.pads.is_button_down(Slot::Index(index), button);
                                ui.label(if down {
                                    format!("[{}]", button)
                                } else {
                                    format!(" {} ", button)
                                });
                            }
                        });
                    }
                    None => {
                        ui.label(format!("Slot {}: not connected", index));
                    }
                }
            }

            ui.separator();
            match self.last_pressed {
                Some((slot, button)) => {
                    ui.label(format!("Last press: slot {} {}", slot, button));
                }
                None => {
                    ui.label("Last press: none");
                }
            }
        });

        // Poll every frame even without UI interaction.
        ctx.request_repaint();
    }
}
