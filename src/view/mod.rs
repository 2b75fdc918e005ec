mod data;
mod map;
mod tiles;
mod toolbar;

use std::sync::mpsc;
use std::time::Duration;

use log::warn;
use rust_i18n::t;

use crate::animation::{MarkerAnimation, MarkerFrame};
use crate::config::Config;
use crate::debounce::Debouncer;
use crate::message::MessageToView;
use crate::model::source::HttpTownSource;
use crate::model::state::{AppState, CycleOutcome, Notification};
use crate::notify;
use crate::presenter::Presenter;
use crate::view::data::MapView;
use crate::view::tiles::{TileCache, TILE_CACHE_SIZE};

pub struct View {
    config: Config,
    state: AppState,
    presenter: Presenter,
    channel_presenter_rx: mpsc::Receiver<MessageToView>,

    map: MapView,
    tiles: TileCache,
    slider_value: u32,
    shown_town_count: u32,
    slider_debounce: Debouncer<u32>,
    pulse_started_at: Option<Duration>,

    /// Shown inside the app when the system dialog is not available.
    notice: Option<String>,
}

impl View {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let (tx, rx) = mpsc::channel::<MessageToView>();
        let presenter = Presenter::new(Box::new(HttpTownSource), tx, cc.egui_ctx.clone());
        let state = AppState::new(&config);

        let mut view = Self {
            map: MapView::new(config.center, config.zoom, config.max_zoom),
            tiles: TileCache::new(TILE_CACHE_SIZE),
            slider_value: state.town_count(),
            shown_town_count: state.town_count(),
            slider_debounce: Debouncer::trailing(config.slider_debounce()),
            pulse_started_at: None,
            notice: None,
            config,
            state,
            presenter,
            channel_presenter_rx: rx,
        };
        view.reload();
        view
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn new_and_start(config: Config) -> anyhow::Result<()> {
        let title = t!("app.title");
        let native_options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_title(title.clone())
                .with_inner_size([1024.0, 768.0]),
            ..Default::default()
        };
        eframe::run_native(
            &title,
            native_options,
            Box::new(|cc| Box::new(View::new(cc, config))),
        )
        .map_err(|err| anyhow::anyhow!("Failed to run the ui: {err}"))
    }

    #[cfg(target_arch = "wasm32")]
    pub async fn new_and_start(config: Config) -> anyhow::Result<()> {
        eframe::WebRunner::new()
            .start(
                "the_canvas_id",
                eframe::WebOptions::default(),
                Box::new(|cc| Box::new(View::new(cc, config))),
            )
            .await
            .map_err(|err| anyhow::anyhow!("Failed to start eframe: {err:?}"))?;
        crate::wasm_utils::remove_loading_text();
        Ok(())
    }

    /// Fetch the current number of towns and redraw once they arrive.
    fn reload(&mut self) {
        let ticket = self.state.begin_fetch();
        self.presenter.fetch_towns(ticket);
    }

    fn apply_town_count(&mut self, count: u32) {
        self.shown_town_count = self.state.set_town_count(count);
        self.reload();
    }

    fn process_messages(&mut self, now: Duration) {
        while let Ok(message) = self.channel_presenter_rx.try_recv() {
            let MessageToView::TownList(sequence, result) = message;
            if let CycleOutcome::Rendered(_) = self.state.complete_fetch(sequence, result) {
                self.pulse_started_at = Some(now);
            }
        }

        while let Some(notification) = self.state.take_notification() {
            match notification {
                Notification::TownsUnavailable => self.notify(t!("alert.towns_unavailable")),
            }
        }
    }

    fn notify(&mut self, text: String) {
        if let Err(err) = notify::alert(&t!("alert.title"), &text) {
            warn!("{err:?}, showing the message in the app instead");
            self.notice = Some(text);
        }
    }

    fn pulse_elapsed(&self, now: Duration) -> Option<Duration> {
        self.pulse_started_at
            .map(|started_at| now.saturating_sub(started_at))
    }

    fn pulse_frame(&self, now: Duration) -> MarkerFrame {
        let elapsed = self.pulse_elapsed(now).unwrap_or(Duration::MAX);
        self.config.pulse.frame(elapsed)
    }

    fn pulse_running(&self, now: Duration) -> bool {
        self.pulse_elapsed(now)
            .is_some_and(|elapsed| !self.config.pulse.is_finished(elapsed))
    }

    fn ui_notice(&mut self, ctx: &egui::Context) {
        let Some(text) = &self.notice else {
            return;
        };
        let mut acknowledged = false;
        egui::Window::new(t!("alert.title"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(text);
                if ui.button(t!("alert.ok")).clicked() {
                    acknowledged = true;
                }
            });
        if acknowledged {
            self.notice = None;
        }
    }
}

impl eframe::App for View {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Duration::from_secs_f64(ctx.input(|input| input.time));

        self.process_messages(now);
        if let Some(count) = self.slider_debounce.poll(now) {
            self.apply_town_count(count);
        }

        // the notice blocks everything else until it is acknowledged
        let enabled = self.notice.is_none();
        self.ui_toolbar(ctx, now, enabled);
        self.ui_map(ctx, now, enabled);
        self.ui_notice(ctx);

        if let Some(remaining) = self.slider_debounce.time_remaining(now) {
            ctx.request_repaint_after(remaining);
        }
        if self.pulse_running(now) {
            ctx.request_repaint();
        }
    }
}
