use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use eia_shared::config::{MAPBOX_CSS_URL, MAPBOX_GLOBAL, MAPBOX_JS_URL};
use eia_shared::{
    CancelToken, InitOptions, InjectOutcome, Location, MapConfig, MapContext, PendingWaits,
    ResourceKind, ResourceLoader,
};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use web_sys::Document;

use crate::diagnostics::Diagnostics;
use crate::filters::{self, FilterListeners};
use crate::head::DomHead;
use crate::mapbox::{self, MapboxMap, MapboxSurface};

/// Mapbox dependencies, stylesheet first so the map never renders unstyled.
const DEPENDENCIES: [(&str, ResourceKind); 2] = [
    (MAPBOX_CSS_URL, ResourceKind::Style),
    (MAPBOX_JS_URL, ResourceKind::Script),
];

// One document head per page, so injection and readiness bookkeeping is page-wide.
thread_local! {
    static LOADER: RefCell<ResourceLoader> = RefCell::new(ResourceLoader::new());
    static PENDING_WAITS: PendingWaits = PendingWaits::new();
    // Keeps each started map alive for the page's lifetime, keyed by container id.
    static LIVE_MAPS: RefCell<HashMap<String, Rc<HandleState>>> = RefCell::new(HashMap::new());
}

pub(crate) struct Session {
    pub context: Rc<RefCell<MapContext<MapboxSurface>>>,
    _listeners: FilterListeners,
}

/// Shared between the JS-facing handle and the async startup sequence.
#[derive(Default)]
pub(crate) struct HandleState {
    pub session: RefCell<Option<Session>>,
    pub cancel: CancelToken,
}

impl HandleState {
    pub fn is_ready(&self) -> bool {
        self.session.borrow().is_some()
    }
}

fn inject_dependencies(document: &Document, diagnostics: Diagnostics) {
    let mut head = DomHead::new(document.clone());
    LOADER.with(|loader| {
        let mut loader = loader.borrow_mut();
        for (url, kind) in DEPENDENCIES {
            diagnostics.debug(&format!("Injecting {kind}: {url}"));
            match loader.inject(&mut head, url, kind) {
                Ok(InjectOutcome::Injected) => {}
                Ok(InjectOutcome::AlreadyInjected) => {
                    diagnostics.warn(&format!("{kind} already loaded, skipping: {url}"))
                }
                Err(e) => diagnostics.error(&e.to_string()),
            }
        }
    });
}

/// Validate options, inject Mapbox and start the async part of startup.
/// Returns `None` without touching the page when a precondition fails.
pub(crate) fn start(options: InitOptions) -> Option<Rc<HandleState>> {
    let diagnostics = Diagnostics::new(options.debug);
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        diagnostics.error("No document to render the map into");
        return None;
    };

    let config = match options.preflight(|id| document.get_element_by_id(id).is_some()) {
        Ok(config) => config,
        Err(e) if e.is_silent() => {
            diagnostics.debug(&format!("Skipping map: {e}"));
            return None;
        }
        Err(e) => {
            diagnostics.error(&format!("Map not initialized: {e}"));
            return None;
        }
    };
    if let Some(existing) = LIVE_MAPS.with(|maps| maps.borrow().get(&config.container_id).cloned()) {
        diagnostics.warn(&format!(
            "Map #{} is already initialized; reusing it",
            config.container_id
        ));
        return Some(existing);
    }
    diagnostics.debug(&format!(
        "Initializing #{} with {} locations",
        config.container_id,
        config.locations.len()
    ));

    inject_dependencies(&document, diagnostics);

    let state = Rc::new(HandleState::default());
    LIVE_MAPS.with(|maps| {
        maps.borrow_mut()
            .insert(config.container_id.clone(), Rc::clone(&state));
    });
    spawn_local(run(config, document, diagnostics, Rc::clone(&state)));
    Some(state)
}

/// Let a later `init` retry a map whose startup failed.
fn forget(container_id: &str) {
    LIVE_MAPS.with(|maps| {
        maps.borrow_mut().remove(container_id);
    });
}

async fn run(config: MapConfig, document: Document, diagnostics: Diagnostics, state: Rc<HandleState>) {
    let waits = PENDING_WAITS.with(PendingWaits::clone);
    let mut warned = false;
    let waited = waits
        .wait_for(
            MAPBOX_GLOBAL,
            config.wait,
            &state.cancel,
            || {
                let ready = mapbox::is_available();
                if ready {
                    diagnostics.debug(&format!("{MAPBOX_GLOBAL} is available"));
                } else if !warned {
                    warned = true;
                    diagnostics.warn(&format!("{MAPBOX_GLOBAL} is not available yet, waiting..."));
                }
                ready
            },
            TimeoutFuture::new,
        )
        .await;

    match waited {
        Ok(rechecks) => diagnostics.debug(&format!("{MAPBOX_GLOBAL} ready after {rechecks} re-checks")),
        Err(e) => {
            diagnostics.error(&format!("Map not initialized: {e}"));
            forget(&config.container_id);
            return;
        }
    }

    let map = match mapbox::create_map(&config.container_id, &config.access_token) {
        Ok(map) => map,
        Err(e) => {
            diagnostics.error(&format!("Failed to create map: {e}"));
            forget(&config.container_id);
            return;
        }
    };

    let MapConfig { locations, .. } = config;
    let loaded = map.clone();
    map.on_load(move || populate(loaded, document, locations, diagnostics, state));
}

/// Build markers, wire checkboxes, then sync visibility. Runs once the map has loaded.
fn populate(
    map: MapboxMap,
    document: Document,
    locations: Vec<Location>,
    diagnostics: Diagnostics,
    state: Rc<HandleState>,
) {
    if state.is_ready() {
        diagnostics.warn("Map loaded again; markers are already built");
        return;
    }

    let surface = MapboxSurface::new(map, document.clone(), diagnostics);
    let (context, report) = match MapContext::build(surface, locations) {
        Ok(built) => built,
        Err(e) => {
            diagnostics.error(&format!("Failed to build markers: {e}"));
            return;
        }
    };
    for slug in &report.duplicates {
        diagnostics.warn(&format!("Duplicate location {slug:?}; keeping the first"));
    }
    diagnostics.debug(&format!("Built {} markers", report.built));

    let context = Rc::new(RefCell::new(context));
    let listeners = filters::wire(&document, &context, diagnostics);
    if listeners.is_empty() {
        diagnostics.debug("No filter checkboxes found; showing every location");
    } else {
        diagnostics.debug(&format!("Listening to {} filter checkboxes", listeners.len()));
    }

    let applied = context.borrow_mut().apply();
    diagnostics.debug(&format!("Initial filter pass: {} visible", applied.visible));

    *state.session.borrow_mut() = Some(Session {
        context,
        _listeners: listeners,
    });
}
