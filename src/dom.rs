use crate::motion::FireOnce;
use js_sys::{Array, Reflect};
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, AddEventListenerOptions, Document, Element, EventTarget, HtmlElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Window,
};

pub fn document() -> Option<Document> {
    window()?.document()
}

/// Monotonic milliseconds since page load.
pub fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|performance| performance.now())
        .unwrap_or_else(js_sys::Date::now)
}

pub fn scroll_y() -> f64 {
    window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0)
}

pub fn query(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return Vec::new();
    };

    (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn set_style(element: &Element, property: &str, value: &str) {
    if let Some(element) = element.dyn_ref::<HtmlElement>() {
        let _ = element.style().set_property(property, value);
    }
}

pub fn toggle_class(element: &Element, class: &str, on: bool) {
    let _ = element.class_list().toggle_with_force(class, on);
}

/// Runs `f` once the document has finished parsing.
pub fn when_ready(f: impl FnOnce() + 'static) {
    let Some(document) = document() else {
        return;
    };

    let loading = Reflect::get(&document, &JsValue::from_str("readyState"))
        .ok()
        .and_then(|state| state.as_string())
        .is_some_and(|state| state == "loading");
    if !loading {
        f();
        return;
    }

    let options = AddEventListenerOptions::new();
    options.set_once(true);
    let callback = Closure::once_into_js(f);
    let _ = document.add_event_listener_with_callback_and_add_event_listener_options(
        "DOMContentLoaded",
        callback.unchecked_ref(),
        &options,
    );
}

pub fn set_timeout(delay_ms: u32, f: impl FnOnce() + 'static) {
    let Some(win) = window() else {
        return;
    };

    let callback = Closure::once_into_js(f);
    let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        delay_ms as i32,
    );
}

pub fn next_frame(f: impl FnOnce() + 'static) {
    let Some(win) = window() else {
        return;
    };

    let callback = Closure::once_into_js(move |_ts: f64| f());
    let _ = win.request_animation_frame(callback.unchecked_ref());
}

/// Attaches a page-lifetime listener.
pub fn listen<E: JsCast + 'static>(
    target: &EventTarget,
    event: &str,
    passive: bool,
    mut handler: impl FnMut(E) + 'static,
) {
    let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        if let Ok(event) = event.dyn_into::<E>() {
            handler(event);
        }
    });

    let options = AddEventListenerOptions::new();
    options.set_passive(passive);
    let _ = target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        callback.as_ref().unchecked_ref(),
        &options,
    );
    callback.forget();
}

pub fn supports_intersection_observer(win: &Window) -> bool {
    Reflect::has(win, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
}

#[derive(Clone, Copy)]
pub struct ObserveOptions {
    pub threshold: Option<f64>,
    pub root_margin: Option<&'static str>,
}

/// Observes `elements` and calls `on_first` for each one the first time it
/// intersects the viewport, then stops observing it. `prepare` runs on every
/// element only once the observer exists, so nothing is touched when it
/// cannot be created.
pub fn observe_once(
    elements: Vec<Element>,
    options: ObserveOptions,
    prepare: impl Fn(&Element),
    on_first: impl Fn(&Element) + 'static,
) -> bool {
    let Some(win) = window() else {
        return false;
    };
    if elements.is_empty() || !supports_intersection_observer(&win) {
        return false;
    }

    let pending = Rc::new(RefCell::new(FireOnce::new(elements.clone())));
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if !entry.is_intersecting() {
                    continue;
                }

                let target = entry.target();
                if pending.borrow_mut().take(&target).is_some() {
                    on_first(&target);
                }
                observer.unobserve(&target);
            }

            if pending.borrow().is_empty() {
                observer.disconnect();
            }
        },
    );

    let init = IntersectionObserverInit::new();
    if let Some(threshold) = options.threshold {
        init.set_threshold(&JsValue::from_f64(threshold));
    }
    if let Some(root_margin) = options.root_margin {
        init.set_root_margin(root_margin);
    }

    let Ok(observer) =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
    else {
        return false;
    };
    callback.forget();

    for element in &elements {
        prepare(element);
        observer.observe(element);
    }
    true
}
