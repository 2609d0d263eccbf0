pub mod popup;

pub use popup::{popup_html, Popup, PopupManager};
