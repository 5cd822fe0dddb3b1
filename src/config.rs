use crate::logging::LogLevel;

const DEFAULT_NAVBAR_THRESHOLD_PX: u32 = 50;
const DEFAULT_HEADER_OFFSET_PX: u32 = 80;
const DEFAULT_SCROLL_THROTTLE_MS: u32 = 50;
const DEFAULT_PARALLAX_THROTTLE_MS: u32 = 16;
const DEFAULT_RIPPLE_MS: u32 = 600;
const DEFAULT_COUNTER_MS: u32 = 2_000;
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

const NAVBAR_THRESHOLD_PX_BOUNDS: (u32, u32) = (0, 2_000);
const HEADER_OFFSET_PX_BOUNDS: (u32, u32) = (0, 1_000);
const SCROLL_THROTTLE_MS_BOUNDS: (u32, u32) = (1, 1_000);
const PARALLAX_THROTTLE_MS_BOUNDS: (u32, u32) = (1, 1_000);
const RIPPLE_MS_BOUNDS: (u32, u32) = (50, 5_000);
const COUNTER_MS_BOUNDS: (u32, u32) = (16, 60_000);

/// Page tunables, read from `data-*` attributes on the document root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageConfig {
    pub navbar_threshold_px: u32,
    pub header_offset_px: u32,
    pub scroll_throttle_ms: u32,
    pub parallax_throttle_ms: u32,
    pub ripple_ms: u32,
    pub counter_ms: u32,
    pub log_level: LogLevel,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            navbar_threshold_px: DEFAULT_NAVBAR_THRESHOLD_PX,
            header_offset_px: DEFAULT_HEADER_OFFSET_PX,
            scroll_throttle_ms: DEFAULT_SCROLL_THROTTLE_MS,
            parallax_throttle_ms: DEFAULT_PARALLAX_THROTTLE_MS,
            ripple_ms: DEFAULT_RIPPLE_MS,
            counter_ms: DEFAULT_COUNTER_MS,
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

impl PageConfig {
    /// `attribute` maps an attribute name such as `data-ripple-ms` to its raw value.
    pub fn from_attributes(attribute: impl Fn(&str) -> Option<String>) -> Self {
        let u32_attr = |name: &str, default: u32, bounds: (u32, u32)| {
            parse_u32_with_bounds(attribute(name).as_deref(), default, bounds)
        };

        Self {
            navbar_threshold_px: u32_attr(
                "data-navbar-threshold",
                DEFAULT_NAVBAR_THRESHOLD_PX,
                NAVBAR_THRESHOLD_PX_BOUNDS,
            ),
            header_offset_px: u32_attr(
                "data-header-offset",
                DEFAULT_HEADER_OFFSET_PX,
                HEADER_OFFSET_PX_BOUNDS,
            ),
            scroll_throttle_ms: u32_attr(
                "data-scroll-throttle-ms",
                DEFAULT_SCROLL_THROTTLE_MS,
                SCROLL_THROTTLE_MS_BOUNDS,
            ),
            parallax_throttle_ms: u32_attr(
                "data-parallax-throttle-ms",
                DEFAULT_PARALLAX_THROTTLE_MS,
                PARALLAX_THROTTLE_MS_BOUNDS,
            ),
            ripple_ms: u32_attr("data-ripple-ms", DEFAULT_RIPPLE_MS, RIPPLE_MS_BOUNDS),
            counter_ms: u32_attr("data-counter-ms", DEFAULT_COUNTER_MS, COUNTER_MS_BOUNDS),
            log_level: attribute("data-log-level")
                .as_deref()
                .and_then(LogLevel::from_str)
                .unwrap_or(DEFAULT_LOG_LEVEL),
        }
    }
}

fn parse_u32_with_bounds(raw: Option<&str>, default: u32, bounds: (u32, u32)) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}
