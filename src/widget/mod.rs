//! The video recorder widget: permission gate, recording controller and
//! view wired to a set of buttons.

mod notifier;
mod recorder;
pub mod view;

pub use notifier::{CollectingNotifier, Notifier, TracingNotifier};
pub use recorder::{VideoRecorder, ACCESS_DENIED_ALERT};
pub use view::{controls_for, render, Control, Playback, ViewInput, ViewModel};
