use core::fmt;

use crate::model::source::FetchResult;

/// This is a file for the messages passed from the presenter to the view.
/// Responses arrive on whatever thread the http client uses, message passing
/// hands them over to the ui thread.

#[allow(clippy::module_name_repetitions)]
#[derive(Debug)]
pub enum MessageToView {
    /// The answer to request number `.0`.
    TownList(u64, FetchResult),
}

impl fmt::Display for MessageToView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageToView::TownList(sequence, Ok(towns)) => {
                write!(f, "MessageToView::TownList(#{sequence}, {} towns)", towns.len())
            }
            MessageToView::TownList(sequence, Err(err)) => {
                write!(f, "MessageToView::TownList(#{sequence}, {err})")
            }
        }
    }
}
