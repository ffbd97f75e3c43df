mod bootstrap;
mod diagnostics;
mod filters;
mod head;
mod mapbox;
mod popup_dom;

use std::rc::Rc;

use eia_shared::{Facet, InitOptions};
use wasm_bindgen::prelude::*;

use crate::bootstrap::HandleState;

/// A map started by [`init`]. Filter calls are ignored until the map has loaded.
#[wasm_bindgen]
pub struct MapHandle {
    state: Rc<HandleState>,
}

impl MapHandle {
    fn toggle(&self, facet: Facet, value: &str, active: bool) -> usize {
        let session = self.state.session.borrow();
        let Some(session) = session.as_ref() else {
            return 0;
        };
        session
            .context
            .borrow_mut()
            .toggle(facet, value, active)
            .visible
    }
}

#[wasm_bindgen]
impl MapHandle {
    #[wasm_bindgen(getter)]
    pub fn ready(&self) -> bool {
        self.state.is_ready()
    }

    /// Returns how many markers are visible afterwards.
    #[wasm_bindgen(js_name = toggleStandard)]
    pub fn toggle_standard(&self, value: &str, active: bool) -> usize {
        self.toggle(Facet::Standard, value, active)
    }

    #[wasm_bindgen(js_name = toggleTag)]
    pub fn toggle_tag(&self, value: &str, active: bool) -> usize {
        self.toggle(Facet::Tag, value, active)
    }

    #[wasm_bindgen(js_name = visibleSlugs)]
    pub fn visible_slugs(&self) -> Vec<String> {
        self.state
            .session
            .borrow()
            .as_ref()
            .map(|s| s.context.borrow().visible_slugs())
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = visibleCount)]
    pub fn visible_count(&self) -> usize {
        self.visible_slugs().len()
    }

    /// Stop waiting for Mapbox. No effect once the map is up.
    pub fn cancel(&self) {
        self.state.cancel.cancel();
    }
}

/// Page entry point. Takes `{ locations, accessToken, debug, containerId?,
/// pollIntervalMs?, waitTimeoutMs? }` and never throws.
#[wasm_bindgen]
pub fn init(options: JsValue) -> Option<MapHandle> {
    console_error_panic_hook::set_once();
    let options: InitOptions = match serde_wasm_bindgen::from_value(options) {
        Ok(options) => options,
        Err(e) => {
            web_sys::console::error_1(&format!("Invalid map options: {e}").into());
            return None;
        }
    };
    bootstrap::start(options).map(|state| MapHandle { state })
}
