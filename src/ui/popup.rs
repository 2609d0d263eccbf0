use crate::prelude::HashMap;
use crate::{
    camera::{CameraChoreographer, CloseOutcome, FocusToken},
    core::geo::LatLng,
    data::feed::MarkerRecord,
    traits::MapEngine,
};

/// Popup markup for a marker: optional capture time, distance, city, the
/// media itself and the description
pub fn popup_html(record: &MarkerRecord) -> String {
    let distance = record.display_distance();
    let title_row = match &record.captured_at {
        Some(captured_at) => format!(
            r#"<div class="title-row"><div class="datetime">{captured_at}</div><div class="distance">{distance} km</div></div>"#
        ),
        None => format!(r#"<div class="title-row"><div class="distance">{distance} km</div></div>"#),
    };

    let media = if record.is_video() {
        format!(
            r#"<video autoplay muted loop playsinline src="{}"></video>"#,
            record.path
        )
    } else {
        format!(r#"<img src="{}" alt="Preview"/>"#, record.thumbnail_url())
    };

    format!(
        r#"<div class="popup-content">{title_row}<div class="city-name">{city}</div><div class="popup-image">{media}</div><div class="popup-text">{description}</div></div>"#,
        city = record.city,
        description = record.description,
    )
}

/// A marker popup and the focus session it opened
#[derive(Debug, Clone)]
pub struct Popup {
    pub id: String,
    pub position: LatLng,
    pub content: String,
    pub visible: bool,
    token: Option<FocusToken>,
}

impl Popup {
    pub fn new(id: String, position: LatLng, content: String) -> Self {
        Self {
            id,
            position,
            content,
            visible: false,
            token: None,
        }
    }

    pub fn for_marker(id: String, record: &MarkerRecord) -> Self {
        Self::new(id, record.coordinates, popup_html(record))
    }

    /// Shows the popup and focuses the camera on it. `height` is the
    /// rendered popup height in pixels.
    pub fn open<E: MapEngine>(
        &mut self,
        camera: &mut CameraChoreographer,
        engine: &mut E,
        height: f64,
    ) -> FocusToken {
        self.visible = true;
        let token = camera.on_popup_open(engine, self.position, height);
        self.token = Some(token);
        token
    }

    /// Hides the popup and lets the camera decide whether to fly back.
    /// Closing a popup that is not open does nothing.
    pub fn close<E: MapEngine>(
        &mut self,
        camera: &mut CameraChoreographer,
        engine: &mut E,
    ) -> CloseOutcome {
        self.visible = false;
        match self.token.take() {
            Some(token) => camera.on_popup_close(engine, token),
            None => CloseOutcome::Ignored,
        }
    }
}

/// Popups keyed by id, at most one open at a time
#[derive(Debug, Default)]
pub struct PopupManager {
    popups: HashMap<String, Popup>,
    open: Option<String>,
}

impl PopupManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_popup(&mut self, popup: Popup) {
        self.popups.insert(popup.id.clone(), popup);
    }

    pub fn get(&self, id: &str) -> Option<&Popup> {
        self.popups.get(id)
    }

    pub fn open_popup_id(&self) -> Option<&str> {
        self.open.as_deref()
    }

    /// Opens `id`, closing whichever popup was open first
    pub fn open<E: MapEngine>(
        &mut self,
        id: &str,
        camera: &mut CameraChoreographer,
        engine: &mut E,
        height: f64,
    ) -> Option<FocusToken> {
        if !self.popups.contains_key(id) {
            log::warn!("No popup with id {}", id);
            return None;
        }
        if self.open.as_deref() != Some(id) {
            self.close(camera, engine);
        }

        let popup = self.popups.get_mut(id)?;
        let token = popup.open(camera, engine, height);
        self.open = Some(id.to_string());
        Some(token)
    }

    /// Closes the open popup, if any
    pub fn close<E: MapEngine>(
        &mut self,
        camera: &mut CameraChoreographer,
        engine: &mut E,
    ) -> CloseOutcome {
        self.open
            .take()
            .and_then(|id| self.popups.get_mut(&id))
            .map(|popup| popup.close(camera, engine))
            .unwrap_or(CloseOutcome::Ignored)
    }

    pub fn len(&self) -> usize {
        self.popups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.popups.is_empty()
    }
}
