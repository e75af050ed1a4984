#![windows_subsystem = "windows"]
//! Crosshair Gallery - Main entry point

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod app;
mod constants;
mod settings;
mod theme;
mod types;
mod ui;
mod utils;

use app::App;
use constants::*;
use eframe::egui;
use std::path::PathBuf;
use tracing::info;
use types::{GalleryStatus, SaveStatus};
use ui::components::{format_badge, format_updated, truncate_name};

/// Initialize file logging. Returns a guard that must be held for the app lifetime.
fn init_logging(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "crosshair-gallery.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,crosshair_gallery=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    guard
}

fn main() -> eframe::Result<()> {
    let data_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Crosshair Gallery");

    std::fs::create_dir_all(&data_dir).ok();

    // Initialize logging - guard must live for entire app lifetime
    let _log_guard = init_logging(&data_dir);

    info!(version = APP_VERSION, "Crosshair Gallery starting");

    // Load saved window position/size
    let settings = settings::Settings::load(&data_dir);
    let win_pos = match (settings.window_x, settings.window_y) {
        (Some(x), Some(y)) => Some(egui::pos2(x, y)),
        _ => None,
    };
    let win_size = match (settings.window_w, settings.window_h) {
        (Some(w), Some(h)) => Some(egui::vec2(w, h)),
        _ => None,
    };

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(win_size.unwrap_or(egui::vec2(1000.0, 720.0)))
        .with_min_inner_size([640.0, 480.0])
        .with_title("Crosshair Gallery");

    // Window/taskbar icon rasterized from the inline logo
    if let Some((rgba, w, h)) = utils::rasterize_logo_square(64) {
        let icon = egui::IconData { rgba, width: w, height: h };
        viewport = viewport.with_icon(std::sync::Arc::new(icon));
    }

    let needs_center = win_pos.is_none();

    if let Some(pos) = win_pos {
        viewport = viewport.with_position(pos);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Crosshair Gallery",
        options,
        Box::new(move |cc| {
            let mut app = App::new(cc, settings, data_dir);
            app.needs_center = needs_center;
            Ok(Box::new(app))
        }),
    )
}

// ============================================================================
// MAIN UPDATE LOOP & UI RENDERING
// ============================================================================

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window position/size for saving on exit
        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                self.window_pos = Some(rect.min);
            }
            if let Some(rect) = i.viewport().inner_rect {
                self.window_size = Some(rect.size());
            }
        });

        // Kick off the initial manifest load on the first frame
        if !self.initial_load_started {
            self.initial_load_started = true;
            self.start_manifest_load(ctx);
        }

        // Center window on first launch
        if self.needs_center {
            self.needs_center = false;
            if let Some(cmd) = egui::ViewportCommand::center_on_screen(ctx) {
                ctx.send_viewport_cmd(cmd);
            }
        }

        // Drain background results into UI state
        self.poll_manifest_load(ctx);
        self.poll_save_status();

        self.render_header(ctx);
        self.render_footer(ctx);

        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::same(16)),
            )
            .show(ctx, |ui| match self.gallery_status.clone() {
                GalleryStatus::Loading => {
                    let category = &CATEGORIES[self.active_category];
                    centered_status(ui, None, &format!("Loading {}…", category.name), true);
                }
                GalleryStatus::Empty => {
                    let category = &CATEGORIES[self.active_category];
                    centered_status(
                        ui,
                        Some(egui_phosphor::regular::IMAGE),
                        &format!("No {} found in this pack.", category.name),
                        false,
                    );
                }
                GalleryStatus::Failed(message) => {
                    centered_status(ui, Some(egui_phosphor::regular::WARNING), &message, false);
                }
                GalleryStatus::Ready => {
                    self.render_gallery(ui, ctx);
                }
            });

        self.render_preview_overlay(ctx);
        self.render_settings_modal(ctx);
        self.render_toast(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.save_settings();
    }
}

// ============================================================================
// CHROME (header, footer, toast)
// ============================================================================

impl App {
    fn render_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header")
            .show_separator_line(false)
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::symmetric(16, 10)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    // Logo + wordmark
                    if self.logo_texture.is_none() {
                        if let Some((pixels, w, h)) = utils::rasterize_logo_square(48) {
                            self.logo_texture = Some(ctx.load_texture(
                                "logo",
                                egui::ColorImage::from_rgba_unmultiplied(
                                    [w as usize, h as usize],
                                    &pixels,
                                ),
                                egui::TextureOptions::LINEAR,
                            ));
                        }
                    }
                    if let Some(texture) = &self.logo_texture {
                        ui.image(egui::load::SizedTexture::new(
                            texture.id(),
                            egui::vec2(22.0, 22.0),
                        ));
                    }
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("CROSSHAIR GALLERY")
                                .size(12.0)
                                .color(theme::TEXT_DIM),
                        )
                        .selectable(false),
                    );

                    ui.add_space(theme::SPACING_XL);

                    // Category tabs - hidden for a single-category pack
                    let mut switch_to = None;
                    if CATEGORIES.len() > 1 {
                        for (i, category) in CATEGORIES.iter().enumerate() {
                            let selected = i == self.active_category;
                            let fill = if selected {
                                theme::TAB_SELECTED
                            } else {
                                theme::TAB_UNSELECTED
                            };
                            let (rect, response) = ui.allocate_exact_size(
                                egui::vec2(96.0, 28.0),
                                egui::Sense::click(),
                            );
                            if response.hovered() {
                                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                            }
                            if ui.is_rect_visible(rect) {
                                let (fill, draw_rect) = theme::button_visual(&response, fill, rect);
                                ui.painter().rect_filled(draw_rect, 4.0, fill);
                                let text_color = if selected {
                                    theme::TEXT_PRIMARY
                                } else {
                                    theme::TEXT_MUTED
                                };
                                ui.painter().text(
                                    draw_rect.center(),
                                    egui::Align2::CENTER_CENTER,
                                    category.label,
                                    egui::FontId::proportional(12.0),
                                    text_color,
                                );
                            }
                            if response.clicked() {
                                switch_to = Some(i);
                            }
                        }
                    }

                    // Settings gear on the far right
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let (rect, response) = ui
                            .allocate_exact_size(egui::vec2(26.0, 26.0), egui::Sense::click());
                        let color = if response.hovered() {
                            ui.painter().rect_filled(rect, 4.0, theme::BG_SURFACE);
                            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                            theme::TEXT_PRIMARY
                        } else {
                            theme::TEXT_DIM
                        };
                        ui.painter().text(
                            rect.center(),
                            egui::Align2::CENTER_CENTER,
                            egui_phosphor::regular::GEAR,
                            egui::FontId::proportional(16.0),
                            color,
                        );
                        if response.clicked() {
                            self.show_settings = true;
                        }
                    });

                    if let Some(i) = switch_to {
                        info!(from = self.active_category, to = i, "Tab switch");
                        self.switch_category(i, ctx);
                    }
                });
            });
    }

    fn render_footer(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("footer")
            .show_separator_line(false)
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::symmetric(16, 6)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(format!("v{}", APP_VERSION))
                                .size(10.0)
                                .color(theme::TEXT_DIM),
                        )
                        .selectable(false),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let mut parts = Vec::new();
                        if let Some(version) = &self.manifest_version {
                            parts.push(format!("pack v{}", version));
                        }
                        if let Some(date) =
                            self.manifest_updated.as_deref().and_then(format_updated)
                        {
                            parts.push(format!("updated {}", date));
                        }
                        if !parts.is_empty() {
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(parts.join(" · "))
                                        .size(10.0)
                                        .color(theme::TEXT_DIM),
                                )
                                .selectable(false),
                            );
                        }
                    });
                });
            });
    }

    /// Move a finished save into the toast.
    fn poll_save_status(&mut self) {
        let finished = {
            let mut s = self.save_state.lock().unwrap();
            match &s.status {
                SaveStatus::Done { filename } => {
                    let msg = format!("Saved {}", filename);
                    s.status = SaveStatus::Idle;
                    Some(msg)
                }
                SaveStatus::Failed { filename, error } => {
                    let msg = format!("Failed to save {}: {}", filename, error);
                    s.status = SaveStatus::Idle;
                    Some(msg)
                }
                _ => None,
            }
        };
        if let Some(msg) = finished {
            self.toast_message = Some(msg);
            self.toast_start = Some(std::time::Instant::now());
        }
    }

    fn render_toast(&mut self, ctx: &egui::Context) {
        let Some(message) = self.toast_message.clone() else {
            return;
        };
        let elapsed = self
            .toast_start
            .map(|t| t.elapsed().as_secs_f32())
            .unwrap_or(0.0);
        if elapsed > 3.0 {
            self.toast_message = None;
            self.toast_start = None;
            return;
        }

        egui::Area::new(egui::Id::new("save_toast"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -32.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(theme::BG_ELEVATED)
                    .stroke(egui::Stroke::new(1.0, theme::BORDER_DEFAULT))
                    .corner_radius(theme::RADIUS_MEDIUM)
                    .inner_margin(egui::Margin::symmetric(12, 8))
                    .show(ui, |ui| {
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(&message)
                                    .size(13.0)
                                    .color(theme::TEXT_SECONDARY),
                            )
                            .selectable(false),
                        );
                    });
            });
        ctx.request_repaint_after(std::time::Duration::from_millis(200));
    }
}

// ============================================================================
// GALLERY GRID
// ============================================================================

impl App {
    fn render_gallery(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let spacing = theme::SPACING_MD;
        let (base_w, base_h) = if self.large_thumbnails {
            theme::CARD_LARGE
        } else {
            theme::CARD_SMALL
        };
        let available = ui.available_width();
        let num_cols = ((available + spacing) / (base_w + spacing)).floor().max(2.0);
        let card_w = ((available - spacing * (num_cols - 1.0)) / num_cols).floor();
        let card_h = (base_h * (card_w / base_w)).floor();
        let caption_h = 24.0;

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing = egui::vec2(spacing, spacing);
                    let assets = self.assets.clone();
                    for asset in &assets {
                        let (rect, response) = ui.allocate_exact_size(
                            egui::vec2(card_w, card_h),
                            egui::Sense::click(),
                        );

                        if ui.is_rect_visible(rect) {
                            let texture = self.ensure_texture(ctx, asset);
                            let painter = ui.painter();

                            painter.rect_filled(rect, theme::RADIUS_DEFAULT, theme::BG_ELEVATED);

                            let image_rect = egui::Rect::from_min_max(
                                rect.min,
                                egui::pos2(rect.max.x, rect.max.y - caption_h),
                            );
                            if let Some(texture) = &texture {
                                let fitted = fit_rect(image_rect.shrink(10.0), texture.size());
                                painter.image(
                                    texture.id(),
                                    fitted,
                                    egui::Rect::from_min_max(
                                        egui::pos2(0.0, 0.0),
                                        egui::pos2(1.0, 1.0),
                                    ),
                                    egui::Color32::WHITE,
                                );
                            } else {
                                painter.text(
                                    image_rect.center(),
                                    egui::Align2::CENTER_CENTER,
                                    egui_phosphor::regular::IMAGE,
                                    egui::FontId::proportional(22.0),
                                    theme::TEXT_DIM,
                                );
                            }

                            // Caption strip: filename left, format badge right
                            painter.text(
                                egui::pos2(rect.left() + 8.0, rect.bottom() - caption_h / 2.0),
                                egui::Align2::LEFT_CENTER,
                                truncate_name(&asset.filename, (card_w / 9.0) as usize),
                                egui::FontId::proportional(11.0),
                                theme::TEXT_MUTED,
                            );
                            if let Some(badge) = format_badge(asset) {
                                painter.text(
                                    egui::pos2(
                                        rect.right() - 8.0,
                                        rect.bottom() - caption_h / 2.0,
                                    ),
                                    egui::Align2::RIGHT_CENTER,
                                    badge,
                                    egui::FontId::proportional(10.0),
                                    theme::ACCENT_MUTED,
                                );
                            }

                            if response.hovered() {
                                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                            }
                            let border = if response.hovered() {
                                theme::ACCENT_MUTED
                            } else {
                                theme::BORDER_SUBTLE
                            };
                            painter.rect_stroke(
                                rect,
                                theme::RADIUS_DEFAULT,
                                egui::Stroke::new(1.0, border),
                                egui::StrokeKind::Outside,
                            );
                        }

                        if response.clicked() {
                            self.preview.open(asset.clone());
                        }
                    }
                });
            });
    }
}

// ============================================================================
// PREVIEW OVERLAY
// ============================================================================

impl App {
    fn render_preview_overlay(&mut self, ctx: &egui::Context) {
        let Some(asset) = self.preview.current().cloned() else {
            return;
        };

        let mut close = false;
        // Close on Escape (settings modal handles its own)
        if !self.show_settings && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            close = true;
        }

        // Dim backdrop - blocks interaction with the gallery; a click
        // outside the content closes
        let screen = ctx.screen_rect();
        let backdrop = egui::Area::new(egui::Id::new("preview_backdrop"))
            .fixed_pos(screen.min)
            .order(egui::Order::Middle)
            .interactable(true)
            .show(ctx, |ui| {
                let response = ui.allocate_response(screen.size(), egui::Sense::click());
                ui.painter()
                    .rect_filled(screen, 0.0, egui::Color32::from_black_alpha(120));
                response
            });
        if backdrop.inner.clicked() {
            close = true;
        }

        let texture = self.ensure_texture(ctx, &asset);
        let save_status = self.save_state.lock().unwrap().status.clone();
        let mut download = false;

        let win_w = 560.0;
        let img_h = 440.0;
        let header_h = 36.0;
        let toolbar_h = 52.0;
        let default_h = header_h + img_h + toolbar_h;

        let window_frame = egui::Frame::new()
            .fill(theme::BG_ELEVATED)
            .stroke(egui::Stroke::new(1.0, theme::BORDER_DEFAULT))
            .corner_radius(6.0)
            .inner_margin(egui::Margin {
                left: 2,
                right: 2,
                top: 0,
                bottom: 2,
            });

        egui::Window::new("asset_preview")
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .frame(window_frame)
            .fixed_size([win_w, default_h])
            .default_pos([
                (screen.width() - win_w) / 2.0,
                (screen.height() - default_h) / 2.0,
            ])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                // Header bar: icon, filename title, close button
                let (header_rect, _) = ui.allocate_exact_size(
                    egui::vec2(ui.available_width(), header_h),
                    egui::Sense::hover(),
                );
                ui.painter().rect_filled(header_rect, 0.0, theme::BG_ELEVATED);

                let icon_x = header_rect.left() + 12.0;
                let center_y = header_rect.center().y;
                ui.painter().text(
                    egui::pos2(icon_x, center_y),
                    egui::Align2::LEFT_CENTER,
                    egui_phosphor::regular::CROSSHAIR,
                    egui::FontId::proportional(16.0),
                    theme::ACCENT,
                );
                ui.painter().text(
                    egui::pos2(icon_x + 24.0, center_y),
                    egui::Align2::LEFT_CENTER,
                    &asset.filename,
                    egui::FontId::proportional(14.0),
                    theme::TEXT_PRIMARY,
                );

                let close_rect = egui::Rect::from_center_size(
                    egui::pos2(header_rect.right() - 20.0, center_y),
                    egui::vec2(24.0, 24.0),
                );
                let close_response =
                    ui.interact(close_rect, ui.id().with("preview_close"), egui::Sense::click());
                let close_color = if close_response.hovered() {
                    ui.painter().rect_filled(close_rect, 4.0, theme::BG_SURFACE);
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                    theme::STATUS_ERROR
                } else {
                    theme::TEXT_DIM
                };
                ui.painter().text(
                    close_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    egui_phosphor::regular::X,
                    egui::FontId::proportional(16.0),
                    close_color,
                );
                if close_response.clicked() {
                    close = true;
                }

                // Image area
                let (image_rect, _) = ui.allocate_exact_size(
                    egui::vec2(ui.available_width(), img_h),
                    egui::Sense::hover(),
                );
                ui.painter().rect_filled(image_rect, 0.0, theme::BG_BASE);
                if let Some(texture) = &texture {
                    let fitted = fit_rect(image_rect.shrink(16.0), texture.size());
                    ui.painter().image(
                        texture.id(),
                        fitted,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                } else {
                    ui.put(image_rect, egui::Spinner::new().size(28.0));
                }

                // Toolbar: download button, centered
                let (toolbar_rect, _) = ui.allocate_exact_size(
                    egui::vec2(ui.available_width(), toolbar_h),
                    egui::Sense::hover(),
                );
                let saving = matches!(save_status, SaveStatus::Saving { .. });
                let btn_rect = egui::Rect::from_center_size(
                    toolbar_rect.center(),
                    egui::vec2(180.0, 32.0),
                );
                let btn_response =
                    ui.interact(btn_rect, ui.id().with("download_btn"), egui::Sense::click());

                let base_fill = if saving {
                    theme::BTN_DEFAULT
                } else {
                    theme::BTN_ACCENT
                };
                let (fill, draw_rect) = if saving {
                    (base_fill, btn_rect)
                } else {
                    theme::button_visual(&btn_response, base_fill, btn_rect)
                };
                ui.painter().rect_filled(draw_rect, 4.0, fill);
                let label = match &save_status {
                    SaveStatus::Saving { downloaded, total, .. } if *total > 0 => format!(
                        "Saving… {}%",
                        (*downloaded as f64 / *total as f64 * 100.0) as u32
                    ),
                    SaveStatus::Saving { .. } => "Saving…".to_string(),
                    _ => format!("{} Download", egui_phosphor::regular::DOWNLOAD_SIMPLE),
                };
                let text_color = if saving {
                    theme::TEXT_DIM
                } else {
                    theme::BTN_ACCENT_TEXT
                };
                ui.painter().text(
                    draw_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    label,
                    egui::FontId::proportional(14.0),
                    text_color,
                );
                if btn_response.hovered() {
                    ui.ctx().set_cursor_icon(if saving {
                        egui::CursorIcon::NotAllowed
                    } else {
                        egui::CursorIcon::PointingHand
                    });
                }
                if !saving && btn_response.clicked() {
                    download = true;
                }
            });

        if download {
            self.save_current(ctx);
        }
        if close {
            self.preview.close();
        }
    }
}

// ============================================================================
// SETTINGS MODAL
// ============================================================================

impl App {
    fn render_settings_modal(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }

        let modal_response = egui::Modal::new(egui::Id::new("settings_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(120))
            .frame(
                egui::Frame::new()
                    .fill(egui::Color32::from_rgb(0x1a, 0x1a, 0x1e))
                    .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(0x2a, 0x2a, 0x2e)))
                    .corner_radius(8.0)
                    .inner_margin(egui::Margin::same(20)),
            )
            .show(ctx, |ui| {
                ui.set_width(320.0);

                // Title bar with close button
                ui.horizontal(|ui| {
                    ui.add(
                        egui::Label::new(egui::RichText::new("Settings").size(16.0).strong())
                            .selectable(false),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let (rect, response) = ui
                            .allocate_exact_size(egui::vec2(24.0, 24.0), egui::Sense::click());
                        let close_color = if response.hovered() {
                            ui.painter().rect_filled(rect, 4.0, theme::BG_SURFACE);
                            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                            theme::STATUS_ERROR
                        } else {
                            theme::TEXT_DIM
                        };
                        ui.painter().text(
                            rect.center(),
                            egui::Align2::CENTER_CENTER,
                            egui_phosphor::regular::X,
                            egui::FontId::proportional(16.0),
                            close_color,
                        );
                        if response.clicked() {
                            self.show_settings = false;
                        }
                    });
                });
                ui.add_space(4.0);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                // — View —
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("View").size(13.0).color(theme::ACCENT),
                    )
                    .selectable(false),
                );
                ui.add_space(2.0);
                if theme::settings_checkbox(ui, self.large_thumbnails, "Large Thumbnails", true) {
                    self.large_thumbnails = !self.large_thumbnails;
                    self.save_settings();
                }

                ui.add_space(theme::SPACING_MD);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                // — Download Path —
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("Download Path")
                            .size(13.0)
                            .color(theme::ACCENT),
                    )
                    .selectable(false),
                );
                ui.add_space(2.0);

                let path_changed = ui
                    .horizontal(|ui| {
                        ui.spacing_mut().item_spacing.x = 4.0;
                        let browse_width = 28.0 + 4.0;
                        let frame_padding = 12.0 + 2.0;
                        let text_width =
                            (ui.available_width() - browse_width - frame_padding).max(40.0);
                        let te = egui::Frame::new()
                            .fill(theme::BG_INPUT)
                            .stroke(egui::Stroke::new(1.0, theme::BORDER_SUBTLE))
                            .corner_radius(4.0)
                            .inner_margin(egui::Margin::symmetric(6, 4))
                            .show(ui, |ui| {
                                ui.add(
                                    egui::TextEdit::singleline(&mut self.download_path_str)
                                        .frame(false)
                                        .desired_width(text_width)
                                        .font(egui::FontId::proportional(13.0)),
                                )
                            })
                            .inner;
                        // Browse button
                        let (rect, resp) = ui
                            .allocate_exact_size(egui::vec2(28.0, 28.0), egui::Sense::click());
                        if resp.hovered() {
                            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                            ui.painter().rect_filled(rect, 4.0, theme::BG_SURFACE);
                        }
                        ui.painter().text(
                            rect.center(),
                            egui::Align2::CENTER_CENTER,
                            egui_phosphor::regular::FOLDER_OPEN,
                            egui::FontId::proportional(16.0),
                            theme::TEXT_SECONDARY,
                        );
                        if resp.clicked() || te.double_clicked() {
                            std::fs::create_dir_all(&self.download_path).ok();
                            if let Some(path) = rfd::FileDialog::new()
                                .set_directory(&self.download_path)
                                .pick_folder()
                            {
                                self.download_path = path;
                                self.download_path_str =
                                    self.download_path.to_string_lossy().to_string();
                                self.save_settings();
                            }
                        }
                        te.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter))
                    })
                    .inner;

                if path_changed {
                    self.download_path = PathBuf::from(&self.download_path_str);
                    self.save_settings();
                }

                ui.add_space(4.0);
                // Open Folder button
                let (rect, response) =
                    ui.allocate_exact_size(egui::vec2(120.0, 26.0), egui::Sense::click());
                if response.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                let (fill, draw_rect) = theme::button_visual(&response, theme::BTN_DEFAULT, rect);
                ui.painter().rect_filled(draw_rect, 4.0, fill);
                ui.painter().text(
                    draw_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    format!("{}  Open Folder", egui_phosphor::regular::FOLDER_OPEN),
                    egui::FontId::proportional(12.0),
                    egui::Color32::WHITE,
                );
                if response.clicked() {
                    std::fs::create_dir_all(&self.download_path).ok();
                    let _ = open::that(&self.download_path);
                }

                ui.add_space(theme::SPACING_MD);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                // — Cache —
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("Cache").size(13.0).color(theme::ACCENT),
                    )
                    .selectable(false),
                );
                ui.add_space(2.0);
                let (rect, response) =
                    ui.allocate_exact_size(egui::vec2(120.0, 26.0), egui::Sense::click());
                if response.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                let (fill, draw_rect) = theme::button_visual(&response, theme::BTN_DANGER, rect);
                ui.painter().rect_filled(draw_rect, 4.0, fill);
                ui.painter().text(
                    draw_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    format!("{}  Clear Cache", egui_phosphor::regular::TRASH),
                    egui::FontId::proportional(12.0),
                    egui::Color32::WHITE,
                );
                if response.clicked() {
                    self.clear_thumbnail_cache(ui.ctx());
                }
            });

        if modal_response.should_close() {
            self.show_settings = false;
        }
    }
}

/// Largest rect of the texture's aspect ratio that fits in `container`,
/// centered.
fn fit_rect(container: egui::Rect, tex_size: [usize; 2]) -> egui::Rect {
    let (tw, th) = (tex_size[0] as f32, tex_size[1] as f32);
    if tw <= 0.0 || th <= 0.0 {
        return container;
    }
    let scale = (container.width() / tw).min(container.height() / th);
    egui::Rect::from_center_size(container.center(), egui::vec2(tw * scale, th * scale))
}

/// Single centered status message replacing the gallery content.
fn centered_status(ui: &mut egui::Ui, icon: Option<&str>, text: &str, spinner: bool) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.35);
        if spinner {
            ui.add(egui::Spinner::new().size(24.0));
            ui.add_space(theme::SPACING_MD);
        }
        if let Some(icon) = icon {
            ui.add(
                egui::Label::new(
                    egui::RichText::new(icon).size(28.0).color(theme::TEXT_DIM),
                )
                .selectable(false),
            );
            ui.add_space(theme::SPACING_MD);
        }
        ui.add(
            egui::Label::new(
                egui::RichText::new(text).size(14.0).color(theme::TEXT_MUTED),
            )
            .selectable(false),
        );
    });
}
