//! Geometry and bookkeeping behind the scroll and click effects.

pub const REVEAL_HIDDEN: RevealStyle = RevealStyle {
    opacity: "0",
    transform: "translateY(30px)",
};
pub const REVEAL_SHOWN: RevealStyle = RevealStyle {
    opacity: "1",
    transform: "translateY(0)",
};
pub const REVEAL_TRANSITION: &str = "opacity 0.6s ease, transform 0.6s ease";
pub const REVEAL_WILL_CHANGE: &str = "opacity, transform";
pub const REVEAL_THRESHOLD: f64 = 0.1;
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -100px 0px";

pub const PARALLAX_SPEED_STEP: f64 = 0.5;
pub const COUNTER_TICK_MS: u32 = 16;

pub const RIPPLE_CSS: &str = r#"
    .cta-button {
        position: relative;
        overflow: hidden;
    }

    .ripple {
        position: absolute;
        border-radius: 50%;
        background: rgba(255, 255, 255, 0.6);
        transform: scale(0);
        animation: ripple-animation 0.6s ease-out;
        pointer-events: none;
    }

    @keyframes ripple-animation {
        to {
            transform: scale(4);
            opacity: 0;
        }
    }
"#;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealStyle {
    pub opacity: &'static str,
    pub transform: &'static str,
}

/// Tracks whether the navbar carries its `scrolled` class.
#[derive(Clone, Copy, Debug)]
pub struct NavbarBlur {
    threshold: f64,
    scrolled: bool,
}

impl NavbarBlur {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: f64::from(threshold),
            scrolled: false,
        }
    }

    /// Returns the new class state only when it flips.
    pub fn update(&mut self, scroll_y: f64) -> Option<bool> {
        let scrolled = scroll_y > self.threshold;
        if scrolled == self.scrolled {
            return None;
        }
        self.scrolled = scrolled;
        Some(scrolled)
    }
}

/// `#section` links are handled in-page; anything else navigates normally.
pub fn in_page_anchor(href: &str) -> Option<&str> {
    href.starts_with('#').then_some(href)
}

pub fn smooth_scroll_top(offset_top: i32, header_offset: u32) -> f64 {
    f64::from(offset_top) - f64::from(header_offset)
}

pub fn parallax_offset(scroll_y: f64, index: usize) -> f64 {
    scroll_y * (index as f64 + 1.0) * PARALLAX_SPEED_STEP
}

pub fn parallax_transform(scroll_y: f64, index: usize) -> String {
    format!("translateY({}px)", parallax_offset(scroll_y, index))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ripple {
    pub size: f64,
    pub x: f64,
    pub y: f64,
}

impl Ripple {
    /// A circle covering the target, centred on the click point.
    pub fn at(target: Rect, client_x: f64, client_y: f64) -> Self {
        let size = target.width.max(target.height);
        Self {
            size,
            x: client_x - target.left - size / 2.0,
            y: client_y - target.top - size / 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CounterTick {
    pub display: f64,
    pub done: bool,
}

/// Counts from zero towards `target` in fixed ticks spread over a duration.
/// Negative and fractional targets are allowed; in-between values are
/// truncated towards zero and the last tick shows `target` exactly.
#[derive(Clone, Copy, Debug)]
pub struct CounterAnimation {
    target: f64,
    increment: f64,
    current: f64,
}

impl CounterAnimation {
    pub fn new(target: f64, duration_ms: u32) -> Self {
        let ticks = (f64::from(duration_ms) / f64::from(COUNTER_TICK_MS)).max(1.0);
        Self {
            target,
            increment: target / ticks,
            current: 0.0,
        }
    }

    pub fn tick(&mut self) -> CounterTick {
        self.current += self.increment;
        let reached = if self.target >= 0.0 {
            self.current >= self.target
        } else {
            self.current <= self.target
        };
        if reached {
            return CounterTick {
                display: self.target,
                done: true,
            };
        }
        CounterTick {
            // `+ 0.0` turns -0 into 0
            display: self.current.trunc() + 0.0,
            done: false,
        }
    }
}

/// Reads a `data-count-to` value. Anything that is not a finite number is ignored.
pub fn parse_count_target(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Items waiting for their first qualifying trigger. Each is handed out once.
#[derive(Clone, Debug)]
pub struct FireOnce<T> {
    pending: Vec<T>,
}

impl<T: PartialEq> FireOnce<T> {
    pub fn new(pending: Vec<T>) -> Self {
        Self { pending }
    }

    pub fn take(&mut self, item: &T) -> Option<T> {
        let index = self.pending.iter().position(|candidate| candidate == item)?;
        Some(self.pending.swap_remove(index))
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
