use std::time::Duration;

use rust_i18n::t;

use super::data::marker_at;
use super::View;
use crate::model::markers::Marker;

const MARKER_COLOR: egui::Color32 = egui::Color32::RED;
const MARKER_STROKE_WIDTH: f32 = 3.0;
const CONTROL_MARGIN: f32 = 10.0;

impl View {
    #[allow(clippy::too_many_lines)] // UI Code, am I right, hahah
    pub(super) fn ui_map(&mut self, ctx: &egui::Context, now: Duration, enabled: bool) {
        let mut reload_clicked = false;

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                ui.set_enabled(enabled);
                let (mut response, painter) = ui.allocate_painter(
                    ui.available_size_before_wrap(),
                    egui::Sense::click_and_drag(),
                );
                let rect = response.rect;

                //DRAG
                self.map.pan_by(response.drag_delta());

                // ZOOM
                if response.hovered() {
                    let scroll_delta = ctx.input(|input| input.raw_scroll_delta.y);
                    if let Some(pointer) = response.hover_pos() {
                        if scroll_delta > 0.0 {
                            self.map.zoom_around(1, pointer, rect);
                        } else if scroll_delta < 0.0 {
                            self.map.zoom_around(-1, pointer, rect);
                        }
                    }
                }

                // DRAW TILES
                painter.rect_filled(rect, 0.0, ui.visuals().extreme_bg_color);
                let mut drawn_tiles = Vec::new();
                for tile in self.map.visible_tiles(rect) {
                    let url = tile.url(&self.config.tile_url, &self.config.tile_subdomains);
                    egui::Image::new(url.clone()).paint_at(ui, self.map.tile_rect(tile, rect));
                    drawn_tiles.push(url);
                }
                for url in self.tiles.drawn(drawn_tiles) {
                    ctx.forget_image(&url);
                }

                // DRAW MARKERS
                let frame = self.pulse_frame(now);
                let fill = MARKER_COLOR.gamma_multiply(frame.fill_opacity.clamp(0.0, 1.0));
                let stroke = egui::Stroke::new(MARKER_STROKE_WIDTH, MARKER_COLOR);
                for marker in self.state.markers().iter() {
                    #[allow(clippy::cast_possible_truncation)]
                    let radius = (marker.radius as f32 + frame.radius_delta).max(0.0);
                    painter.circle(self.map.to_screen(marker.position, rect), radius, fill, stroke);
                }

                // POPUP WITH TOWN INFORMATION
                let hovered = response.hover_pos().and_then(|pointer| {
                    marker_at(
                        &self.map,
                        self.state.markers(),
                        pointer,
                        rect,
                        MARKER_STROKE_WIDTH / 2.0,
                    )
                });
                if let Some(marker) = hovered {
                    response = response.on_hover_ui_at_pointer(|ui| popup_ui(ui, marker));
                }

                // RELOAD BUTTON
                egui::Area::new(egui::Id::new("reload towns"))
                    .order(egui::Order::Foreground)
                    .fixed_pos(rect.right_top() + egui::vec2(-CONTROL_MARGIN, CONTROL_MARGIN))
                    .pivot(egui::Align2::RIGHT_TOP)
                    .show(ctx, |ui| {
                        ui.set_enabled(enabled);
                        if ui.button(t!("map.reload")).clicked() {
                            reload_clicked = true;
                        }
                    });

                // ATTRIBUTION
                egui::Area::new(egui::Id::new("tile attribution"))
                    .order(egui::Order::Foreground)
                    .fixed_pos(rect.right_bottom())
                    .pivot(egui::Align2::RIGHT_BOTTOM)
                    .interactable(false)
                    .show(ctx, |ui| {
                        egui::Frame::none()
                            .fill(ui.visuals().extreme_bg_color.gamma_multiply(0.8))
                            .inner_margin(egui::Margin::symmetric(4.0, 1.0))
                            .show(ui, |ui| ui.small(&self.config.attribution));
                    });

                response
            });

        if reload_clicked {
            self.reload();
        }
    }
}

fn popup_ui(ui: &mut egui::Ui, marker: &Marker) {
    ui.strong(&marker.name);
    ui.label(t!("popup.county", county = &marker.county));
    let population = marker
        .population
        .map_or_else(|| t!("popup.unknown"), |population| population.to_string());
    ui.label(t!("popup.population", population = population));
}
