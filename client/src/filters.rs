use std::cell::RefCell;
use std::rc::Rc;

use eia_shared::config::{STANDARD_FILTERS_ID, TAG_FILTERS_ID};
use eia_shared::{ApplyReport, Facet, MapContext, MapSurface};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, HtmlInputElement};

use crate::diagnostics::Diagnostics;

pub const CHECKBOX_SELECTOR: &str = "input[type=checkbox]";

/// Checkbox group container id for each facet.
pub const FILTER_GROUPS: [(Facet, &str); 2] = [
    (Facet::Standard, STANDARD_FILTERS_ID),
    (Facet::Tag, TAG_FILTERS_ID),
];

pub fn facet_name(facet: Facet) -> &'static str {
    match facet {
        Facet::Standard => "standard",
        Facet::Tag => "tag",
    }
}

fn checkboxes(document: &Document, container_id: &str) -> Vec<HtmlInputElement> {
    let Some(container) = document.get_element_by_id(container_id) else {
        return Vec::new();
    };
    let Ok(nodes) = container.query_selector_all(CHECKBOX_SELECTOR) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<HtmlInputElement>().ok())
        .collect()
}

/// Apply one checkbox change and re-sync markers. Returns `None` when the map
/// is already mid-update, in which case the change is dropped.
pub fn apply_change<S: MapSurface>(
    context: &RefCell<MapContext<S>>,
    facet: Facet,
    value: &str,
    active: bool,
) -> Option<ApplyReport> {
    let mut ctx = context.try_borrow_mut().ok()?;
    Some(ctx.toggle(facet, value, active))
}

struct Listener {
    input: HtmlInputElement,
    handler: Closure<dyn Fn(Event)>,
}

/// Change listeners attached to the filter checkboxes. Dropping this detaches them.
#[derive(Default)]
pub struct FilterListeners {
    listeners: Vec<Listener>,
}

impl FilterListeners {
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl Drop for FilterListeners {
    fn drop(&mut self) {
        for listener in self.listeners.drain(..) {
            listener
                .input
                .remove_event_listener_with_callback(
                    "change",
                    listener.handler.as_ref().unchecked_ref(),
                )
                .ok();
        }
    }
}

/// Seed the filters from boxes already checked, then keep them in sync.
///
/// Each change event toggles its value and re-applies visibility before the
/// handler returns.
pub fn wire<S: MapSurface + 'static>(
    document: &Document,
    context: &Rc<RefCell<MapContext<S>>>,
    diagnostics: Diagnostics,
) -> FilterListeners {
    let mut wired = FilterListeners::default();

    for (facet, container_id) in FILTER_GROUPS {
        let inputs = checkboxes(document, container_id);
        if inputs.is_empty() {
            diagnostics.debug(&format!("No {} filters under #{container_id}", facet_name(facet)));
        }

        for input in inputs {
            if input.checked() {
                let value = input.value();
                context.borrow_mut().seed(facet, [value.as_str()]);
            }

            let ctx = Rc::clone(context);
            let target = input.clone();
            let handler = Closure::<dyn Fn(Event)>::new(move |_e: Event| {
                let value = target.value();
                let active = target.checked();
                let Some(report) = apply_change(&ctx, facet, &value, active) else {
                    diagnostics.warn(&format!(
                        "Ignored {} filter change for {value:?}: map is busy",
                        facet_name(facet)
                    ));
                    return;
                };
                diagnostics.debug(&format!(
                    "Filter {}={value} {}: {} visible (+{} / -{})",
                    facet_name(facet),
                    if active { "on" } else { "off" },
                    report.visible,
                    report.attached,
                    report.detached,
                ));
            });

            if input
                .add_event_listener_with_callback("change", handler.as_ref().unchecked_ref())
                .is_err()
            {
                diagnostics.warn(&format!(
                    "Could not listen to {} filter {:?}",
                    facet_name(facet),
                    input.value()
                ));
                continue;
            }
            wired.listeners.push(Listener { input, handler });
        }
    }

    wired
}
