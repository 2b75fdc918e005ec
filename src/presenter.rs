use std::sync::mpsc;

use log::{debug, warn};

use crate::message::MessageToView;
use crate::model::source::TownSource;
use crate::model::state::FetchTicket;

/// Runs requests against the town source and reports back to the view.
pub struct Presenter {
    source: Box<dyn TownSource>,
    channel_tx: mpsc::Sender<MessageToView>,
    ctx: egui::Context,
}

impl Presenter {
    pub fn new(
        source: Box<dyn TownSource>,
        tx: mpsc::Sender<MessageToView>,
        ctx: egui::Context,
    ) -> Self {
        Self {
            source,
            channel_tx: tx,
            ctx,
        }
    }

    /// Fire and forget. The result shows up as a message on the view's
    /// channel and wakes the ui up.
    pub fn fetch_towns(&self, ticket: FetchTicket) {
        let FetchTicket { sequence, url } = ticket;
        let tx = self.channel_tx.clone();
        let ctx = self.ctx.clone();
        debug!("Fetching {url}");
        self.source.fetch(
            url,
            Box::new(move |result| {
                let message = MessageToView::TownList(sequence, result);
                debug!("{message}");
                if tx.send(message).is_err() {
                    warn!("The view is gone, dropping the response to request #{sequence}");
                }
                ctx.request_repaint();
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::config::Config;
    use crate::log_capture::{at_level, capture};
    use crate::model::source::{FetchError, FetchResult, OnFetched};
    use crate::model::state::{AppState, CycleOutcome, LoadingState, Notification};
    use crate::town::parse_towns;
    use log::Level;

    /// Holds on to requests until the test decides to answer them, in any order.
    #[derive(Clone, Default)]
    struct ManualSource {
        requests: Rc<RefCell<Vec<(String, OnFetched)>>>,
    }

    impl ManualSource {
        pub fn urls(&self) -> Vec<String> {
            self.requests.borrow().iter().map(|(url, _)| url.clone()).collect()
        }

        pub fn answer(&self, index: usize, result: FetchResult) {
            let (_url, on_done) = self.requests.borrow_mut().remove(index);
            on_done(result);
        }
    }

    impl TownSource for ManualSource {
        fn fetch(&self, url: String, on_done: OnFetched) {
            self.requests.borrow_mut().push((url, on_done));
        }
    }

    fn setup() -> (AppState, Presenter, ManualSource, mpsc::Receiver<MessageToView>) {
        let source = ManualSource::default();
        let (tx, rx) = mpsc::channel();
        let presenter = Presenter::new(Box::new(source.clone()), tx, egui::Context::default());
        let state = AppState::new(&Config {
            api_base_url: String::from("http://towns.test/"),
            ..Config::default()
        });
        (state, presenter, source, rx)
    }

    fn deliver(state: &mut AppState, rx: &mpsc::Receiver<MessageToView>) -> Vec<CycleOutcome> {
        rx.try_iter()
            .map(|MessageToView::TownList(sequence, result)| state.complete_fetch(sequence, result))
            .collect()
    }

    fn body(json: &str) -> FetchResult {
        Ok(parse_towns(json.as_bytes()).unwrap())
    }

    #[test]
    fn end_to_end_two_towns() {
        let (mut state, presenter, source, rx) = setup();
        state.set_town_count(2);
        presenter.fetch_towns(state.begin_fetch());
        assert_eq!(source.urls(), vec!["http://towns.test/2"]);

        source.answer(
            0,
            body(
                r#"[{"Town":"A","County":"X","Population":100,"lat":51,"lng":-1},
                    {"Town":"B","County":"Y","lat":0,"lng":0}]"#,
            ),
        );
        let (outcomes, records) = capture(|| deliver(&mut state, &rx));
        assert_eq!(outcomes.len(), 1);
        let CycleOutcome::Rendered(report) = &outcomes[0] else {
            panic!("expected a render, got {outcomes:?}");
        };
        assert_eq!(report.skipped, vec!["B"]);
        let warnings = at_level(&records, Level::Warn);
        assert_eq!(warnings.len(), 1, "{records:?}");
        assert!(warnings[0].contains('B'));
        assert_eq!(state.markers().len(), 1);
        assert_eq!(state.loading(), LoadingState::Idle);
    }

    #[test]
    fn reload_with_the_same_answer_does_not_duplicate() {
        let (mut state, presenter, source, rx) = setup();
        let answer = r#"[{"Town":"A","lat":51,"lng":-1},{"Town":"C","lat":52,"lng":-1}]"#;
        for _ in 0..2 {
            presenter.fetch_towns(state.begin_fetch());
            source.answer(0, body(answer));
            deliver(&mut state, &rx);
        }
        assert_eq!(state.markers().len(), 2);
    }

    #[test]
    fn answers_in_reverse_order_keep_the_latest() {
        let (mut state, presenter, source, rx) = setup();
        state.set_town_count(10);
        presenter.fetch_towns(state.begin_fetch());
        state.set_town_count(20);
        presenter.fetch_towns(state.begin_fetch());
        assert_eq!(source.urls(), vec!["http://towns.test/10", "http://towns.test/20"]);

        // the newer request resolves first
        source.answer(1, body(r#"[{"Town":"twenty","lat":51,"lng":-1}]"#));
        source.answer(0, body(r#"[{"Town":"ten","lat":51,"lng":-1}]"#));
        let outcomes = deliver(&mut state, &rx);
        assert!(matches!(outcomes[0], CycleOutcome::Rendered(_)));
        assert_eq!(outcomes[1], CycleOutcome::Stale);

        let names: Vec<&str> = state.markers().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["twenty"]);
    }

    #[test]
    fn failed_request_notifies_once_and_keeps_markers() {
        let (mut state, presenter, source, rx) = setup();
        presenter.fetch_towns(state.begin_fetch());
        source.answer(0, body(r#"[{"Town":"A","lat":51,"lng":-1}]"#));
        deliver(&mut state, &rx);

        presenter.fetch_towns(state.begin_fetch());
        source.answer(
            0,
            Err(FetchError::Transport {
                url: String::from("http://towns.test/50"),
                message: String::from("connection refused"),
            }),
        );
        let (outcomes, records) = capture(|| deliver(&mut state, &rx));
        assert_eq!(outcomes, vec![CycleOutcome::Failed]);
        assert_eq!(at_level(&records, Level::Error).len(), 1, "{records:?}");
        assert_eq!(state.markers().len(), 1);
        assert_eq!(state.loading(), LoadingState::Idle);
        assert_eq!(state.take_notification(), Some(Notification::TownsUnavailable));
        assert_eq!(state.take_notification(), None);
    }

    #[test]
    fn response_after_the_view_is_gone_is_ignored() {
        let (mut state, presenter, source, rx) = setup();
        presenter.fetch_towns(state.begin_fetch());
        drop(rx);
        source.answer(0, body("[]"));
    }
}
