use std::time::Duration;

use rust_i18n::t;

use super::View;
use crate::model::state::LoadingState;

impl View {
    pub(super) fn ui_toolbar(&mut self, ctx: &egui::Context, now: Duration, enabled: bool) {
        let mut debounced_count = None;

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.set_enabled(enabled);
            ui.horizontal(|ui| {
                ui.label(t!("controls.towns"));
                let slider = egui::Slider::new(&mut self.slider_value, self.config.town_count_range())
                    .show_value(false);
                if ui.add(slider).changed() {
                    debounced_count = self.slider_debounce.call(now, self.slider_value);
                }
                // only follows the slider once the debounce has fired
                ui.strong(self.shown_town_count.to_string());

                if self.state.loading() == LoadingState::Loading {
                    ui.separator();
                    ui.spinner();
                    ui.label(t!("controls.loading"));
                }
            });
        });

        if let Some(count) = debounced_count {
            self.apply_town_count(count);
        }
    }
}
