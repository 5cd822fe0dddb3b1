//! Page effects wired once at startup. Each one silently skips itself when its
//! markup is missing.

use crate::{
    config::PageConfig,
    dom::{self, ObserveOptions},
    motion::{
        in_page_anchor, parallax_transform, parse_count_target, smooth_scroll_top, CounterAnimation,
        NavbarBlur, Rect,
        Ripple, COUNTER_TICK_MS, REVEAL_HIDDEN, REVEAL_ROOT_MARGIN, REVEAL_SHOWN,
        REVEAL_THRESHOLD, REVEAL_TRANSITION, REVEAL_WILL_CHANGE, RIPPLE_CSS,
    },
    throttle::throttle,
};
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element, Event, HtmlElement, MouseEvent, ScrollBehavior, ScrollToOptions};

/// Wires every effect the page has markup for and returns how many were attached.
/// Call it once per page; listeners are never removed.
pub fn install(document: &Document, config: &PageConfig) -> usize {
    [
        install_navbar(document, config),
        install_mobile_menu(document),
        install_smooth_scroll(document, config),
        install_reveal(document),
        install_parallax(document, config),
        install_ripple(document, config),
        install_counters(document, config),
        adapt_reduced_motion(document),
        install_lazy_images(document),
    ]
    .into_iter()
    .filter(|installed| *installed)
    .count()
}

fn install_navbar(document: &Document, config: &PageConfig) -> bool {
    let (Some(win), Some(navbar)) = (window(), dom::query(document, ".navbar")) else {
        return false;
    };

    let mut blur = NavbarBlur::new(config.navbar_threshold_px);
    let on_scroll = throttle(config.scroll_throttle_ms, dom::now_ms, move |_: Event| {
        if let Some(scrolled) = blur.update(dom::scroll_y()) {
            dom::toggle_class(&navbar, "scrolled", scrolled);
        }
    });
    dom::listen(&win, "scroll", true, on_scroll);
    true
}

fn install_mobile_menu(document: &Document) -> bool {
    let hamburger = dom::query(document, ".hamburger");
    let menu = dom::query(document, ".nav-menu");
    let links = dom::query_all(document, ".nav-link");

    if let Some(button) = hamburger.clone() {
        let menu = menu.clone();
        let toggled = button.clone();
        dom::listen(&button, "click", false, move |_: MouseEvent| {
            let _ = toggled.class_list().toggle("active");
            if let Some(menu) = &menu {
                let _ = menu.class_list().toggle("active");
            }
        });
    }

    for link in &links {
        let hamburger = hamburger.clone();
        let menu = menu.clone();
        dom::listen(link, "click", false, move |_: MouseEvent| {
            for element in [&hamburger, &menu].into_iter().flatten() {
                let _ = element.class_list().remove_1("active");
            }
        });
    }

    hamburger.is_some() || !links.is_empty()
}

fn install_smooth_scroll(document: &Document, config: &PageConfig) -> bool {
    let links = dom::query_all(document, ".nav-link");
    let header_offset = config.header_offset_px;

    for link in &links {
        let anchor = link.clone();
        dom::listen(link, "click", false, move |event: MouseEvent| {
            let Some(href) = anchor.get_attribute("href") else {
                return;
            };
            let Some(selector) = in_page_anchor(&href) else {
                return;
            };
            event.prevent_default();

            let Some(target) = dom::document().and_then(|d| dom::query(&d, selector)) else {
                return;
            };
            let (Some(win), Some(target)) = (window(), target.dyn_ref::<HtmlElement>()) else {
                return;
            };

            let options = ScrollToOptions::new();
            options.set_top(smooth_scroll_top(target.offset_top(), header_offset));
            options.set_behavior(ScrollBehavior::Smooth);
            win.scroll_to_with_scroll_to_options(&options);
        });
    }

    !links.is_empty()
}

fn install_reveal(document: &Document) -> bool {
    let elements = dom::query_all(document, "[data-aos]");
    let options = ObserveOptions {
        threshold: Some(REVEAL_THRESHOLD),
        root_margin: Some(REVEAL_ROOT_MARGIN),
    };

    // Hidden styles go on only after the observer exists, otherwise an
    // element could be hidden with nothing left to reveal it.
    let hide = |element: &Element| {
        dom::set_style(element, "opacity", REVEAL_HIDDEN.opacity);
        dom::set_style(element, "transform", REVEAL_HIDDEN.transform);
        dom::set_style(element, "transition", REVEAL_TRANSITION);
        dom::set_style(element, "will-change", REVEAL_WILL_CHANGE);
    };
    dom::observe_once(elements, options, hide, |element| {
        let element = element.clone();
        dom::next_frame(move || {
            dom::set_style(&element, "opacity", REVEAL_SHOWN.opacity);
            dom::set_style(&element, "transform", REVEAL_SHOWN.transform);
        });
    })
}

fn install_parallax(document: &Document, config: &PageConfig) -> bool {
    let orbs = dom::query_all(document, ".floating-orb");
    let Some(win) = window() else {
        return false;
    };
    if orbs.is_empty() {
        return false;
    }

    let on_scroll = throttle(config.parallax_throttle_ms, dom::now_ms, move |_: Event| {
        let scrolled = dom::scroll_y();
        for (index, orb) in orbs.iter().enumerate() {
            let orb = orb.clone();
            dom::next_frame(move || {
                dom::set_style(&orb, "transform", &parallax_transform(scrolled, index));
            });
        }
    });
    dom::listen(&win, "scroll", true, on_scroll);
    true
}

fn install_ripple(document: &Document, config: &PageConfig) -> bool {
    inject_ripple_styles(document);

    let Some(button) = dom::query(document, ".cta-button") else {
        return false;
    };

    let duration_ms = config.ripple_ms;
    let host = button.clone();
    dom::listen(&button, "click", false, move |event: MouseEvent| {
        let Some(document) = dom::document() else {
            return;
        };
        let Ok(span) = document.create_element("span") else {
            return;
        };

        let bounds = host.get_bounding_client_rect();
        let ripple = Ripple::at(
            Rect {
                left: bounds.left(),
                top: bounds.top(),
                width: bounds.width(),
                height: bounds.height(),
            },
            f64::from(event.client_x()),
            f64::from(event.client_y()),
        );

        let size = format!("{}px", ripple.size);
        dom::set_style(&span, "width", &size);
        dom::set_style(&span, "height", &size);
        dom::set_style(&span, "left", &format!("{}px", ripple.x));
        dom::set_style(&span, "top", &format!("{}px", ripple.y));
        let _ = span.class_list().add_1("ripple");

        if host.append_child(&span).is_ok() {
            dom::set_timeout(duration_ms, move || span.remove());
        }
    });
    true
}

fn inject_ripple_styles(document: &Document) {
    let Some(head) = document.head() else {
        return;
    };
    let Ok(style) = document.create_element("style") else {
        return;
    };

    style.set_text_content(Some(RIPPLE_CSS));
    let _ = head.append_child(&style);
}

fn install_counters(document: &Document, config: &PageConfig) -> bool {
    let elements = dom::query_all(document, "[data-count-to]");
    let duration_ms = config.counter_ms;
    let options = ObserveOptions {
        threshold: None,
        root_margin: None,
    };

    dom::observe_once(elements, options, |_| {}, move |element| {
        let target = element
            .get_attribute("data-count-to")
            .and_then(|value| parse_count_target(&value));
        if let Some(target) = target {
            run_counter(element.clone(), CounterAnimation::new(target, duration_ms));
        }
    })
}

fn run_counter(element: Element, mut counter: CounterAnimation) {
    dom::set_timeout(COUNTER_TICK_MS, move || {
        let tick = counter.tick();
        element.set_text_content(Some(tick.display.to_string().as_str()));
        if !tick.done {
            run_counter(element, counter);
        }
    });
}

fn prefers_reduced_motion() -> bool {
    window()
        .and_then(|w| {
            w.match_media("(prefers-reduced-motion: reduce)")
                .ok()
                .flatten()
        })
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

fn adapt_reduced_motion(document: &Document) -> bool {
    if !prefers_reduced_motion() {
        return false;
    }

    if let Some(root) = document.document_element() {
        dom::set_style(&root, "scroll-behavior", "auto");
    }
    for element in dom::query_all(document, "[style*=\"animation\"]") {
        dom::set_style(&element, "animation", "none");
    }
    true
}

fn install_lazy_images(document: &Document) -> bool {
    let images = dom::query_all(document, "img[data-src]");
    let options = ObserveOptions {
        threshold: None,
        root_margin: None,
    };

    dom::observe_once(images, options, |_| {}, |image| {
        if let Some(src) = image.get_attribute("data-src") {
            let _ = image.set_attribute("src", &src);
            let _ = image.remove_attribute("data-src");
        }
    })
}
