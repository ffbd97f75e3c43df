use eia_shared::config::{
    MAP_CENTER, MAP_MAX_ZOOM, MAP_MIN_ZOOM, MAP_STYLE, MAP_ZOOM, MAPBOX_GLOBAL,
};
use eia_shared::{Location, MapSurface, PopupContent};
use js_sys::{Array, Object, Reflect};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Document;

use crate::diagnostics::Diagnostics;
use crate::head::js_err;
use crate::popup_dom;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl, js_name = Map)]
    #[derive(Debug, Clone)]
    pub type MapboxMap;

    #[wasm_bindgen(constructor, catch, js_namespace = mapboxgl, js_class = "Map")]
    fn new(options: &JsValue) -> Result<MapboxMap, JsValue>;

    #[wasm_bindgen(method)]
    pub fn on(this: &MapboxMap, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(js_namespace = mapboxgl, js_name = Marker)]
    #[derive(Debug, Clone)]
    pub type Marker;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "Marker")]
    fn new(options: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = setLngLat)]
    fn set_lng_lat(this: &Marker, lng_lat: &Array) -> Marker;

    #[wasm_bindgen(method, js_name = setPopup)]
    fn set_popup(this: &Marker, popup: &Popup) -> Marker;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Marker, map: &MapboxMap) -> Marker;

    #[wasm_bindgen(method)]
    fn remove(this: &Marker) -> Marker;

    #[wasm_bindgen(js_namespace = mapboxgl, js_name = Popup)]
    pub type Popup;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "Popup")]
    fn new(options: &JsValue) -> Popup;

    #[wasm_bindgen(method, js_name = setDOMContent)]
    fn set_dom_content(this: &Popup, node: &web_sys::Node) -> Popup;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapOptions<'a> {
    attribution_control: bool,
    compact: bool,
    container: &'a str,
    style: &'a str,
    center: [f64; 2],
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    cooperative_gestures: bool,
}

fn global() -> Option<JsValue> {
    let window = web_sys::window()?;
    Reflect::get(window.as_ref(), &JsValue::from_str(MAPBOX_GLOBAL))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

/// Whether the injected script has defined `window.mapboxgl` yet.
pub fn is_available() -> bool {
    global().is_some()
}

pub fn create_map(container_id: &str, access_token: &str) -> Result<MapboxMap, String> {
    let mapboxgl = global().ok_or_else(|| format!("{MAPBOX_GLOBAL} is not loaded"))?;
    Reflect::set(
        &mapboxgl,
        &JsValue::from_str("accessToken"),
        &JsValue::from_str(access_token),
    )
    .map_err(js_err)?;

    let options = MapOptions {
        attribution_control: false,
        compact: true,
        container: container_id,
        style: MAP_STYLE,
        center: MAP_CENTER,
        zoom: MAP_ZOOM,
        min_zoom: MAP_MIN_ZOOM,
        max_zoom: MAP_MAX_ZOOM,
        cooperative_gestures: true,
    };
    let options = serde_wasm_bindgen::to_value(&options).map_err(|e| e.to_string())?;
    MapboxMap::new(&options).map_err(js_err)
}

/// Markers live on one Mapbox map; detaching calls `remove()`, which keeps the
/// marker object reusable.
pub struct MapboxSurface {
    map: MapboxMap,
    document: Document,
    diagnostics: Diagnostics,
}

impl MapboxSurface {
    pub fn new(map: MapboxMap, document: Document, diagnostics: Diagnostics) -> Self {
        Self {
            map,
            document,
            diagnostics,
        }
    }

    fn marker_options(&self, standard: &str) -> JsValue {
        let options = Object::new();
        let Ok(pin) = self.document.create_element("div") else {
            return options.into();
        };
        pin.set_class_name(&popup_dom::marker_class(standard));
        if Reflect::set(&options, &JsValue::from_str("element"), &pin).is_err() {
            return Object::new().into();
        }
        options.into()
    }
}

impl MapSurface for MapboxSurface {
    type Marker = Marker;

    fn create_marker(&mut self, location: &Location, popup: &PopupContent) -> Marker {
        let [lng, lat] = location.lng_lat();
        let marker = Marker::new(&self.marker_options(&location.standard));
        marker.set_lng_lat(&Array::of2(&lng.into(), &lat.into()));

        match popup_dom::render(&self.document, popup) {
            Ok(content) => {
                let popup = Popup::new(&Object::new().into());
                popup.set_dom_content(&content);
                marker.set_popup(&popup);
            }
            Err(e) => self.diagnostics.warn(&format!(
                "Popup for {} could not be rendered: {}",
                location.slug,
                js_err(e)
            )),
        }
        marker
    }

    fn attach(&mut self, marker: &Marker) {
        marker.add_to(&self.map);
    }

    fn detach(&mut self, marker: &Marker) {
        marker.remove();
    }
}

impl MapboxMap {
    /// Run `f` once the style has loaded.
    pub fn on_load(&self, f: impl FnOnce() + 'static) {
        let handler = Closure::once_into_js(f);
        self.on("load", handler.unchecked_ref());
    }
}
