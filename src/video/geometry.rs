//! Window geometry and filter upscale factors.

use crate::config::VideoSettings;

/// Base render width before scaling.
pub const BASE_WIDTH: u32 = 296;
/// Base render height before scaling.
pub const BASE_HEIGHT: u32 = 224;

/// Post-processing filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoFilter {
    /// No filter.
    #[default]
    None,
    /// HQ2X.
    Hq2x,
    /// HQ4X.
    Hq4x,
    /// NTSC composite emulation.
    Ntsc,
}

impl VideoFilter {
    /// Look up a filter by its configured name.
    ///
    /// Names are matched exactly. Anything unrecognized means no filter.
    pub fn from_name(name: &str) -> Self {
        match name {
            "HQ2X" => VideoFilter::Hq2x,
            "HQ4X" => VideoFilter::Hq4x,
            "NTSC" => VideoFilter::Ntsc,
            _ => VideoFilter::None,
        }
    }

    /// Internal render target scale the video driver should reserve.
    ///
    /// Every factor includes ×2 for hi-res content.
    pub fn upscale(&self) -> u32 {
        match self {
            VideoFilter::None => 2,
            VideoFilter::Hq2x => 4,
            VideoFilter::Hq4x | VideoFilter::Ntsc => 8,
        }
    }
}

/// Window or mode size requested from the video driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderGeometry {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl RenderGeometry {
    /// Fullscreen dimensions, or the base resolution scaled and rounded.
    pub fn compute(settings: &VideoSettings) -> Self {
        if settings.fullscreen {
            return Self {
                width: settings.fullscreen_x,
                height: settings.fullscreen_y,
            };
        }

        let scale = |base: u32, factor: f32| (base as f32 * factor).round().max(0.0) as u32;
        Self {
            width: scale(BASE_WIDTH, settings.xscale),
            height: scale(BASE_HEIGHT, settings.yscale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_upscale() {
        assert_eq!(VideoFilter::from_name("").upscale(), 2);
        assert_eq!(VideoFilter::from_name("HQ2X").upscale(), 4);
        assert_eq!(VideoFilter::from_name("HQ4X").upscale(), 8);
        assert_eq!(VideoFilter::from_name("NTSC").upscale(), 8);
    }

    #[test]
    fn test_unknown_filter_is_none() {
        for name in ["hq2x", "HQ3X", "ntsc", " NTSC", "scanlines"] {
            assert_eq!(VideoFilter::from_name(name), VideoFilter::None, "{}", name);
            assert_eq!(VideoFilter::from_name(name).upscale(), 2);
        }
    }

    #[test]
    fn test_windowed_geometry() {
        let settings = VideoSettings {
            xscale: 2.0,
            yscale: 2.0,
            ..VideoSettings::default()
        };
        let geometry = RenderGeometry::compute(&settings);
        assert_eq!(geometry, RenderGeometry { width: 592, height: 448 });
    }

    #[test]
    fn test_fractional_scale_rounds() {
        let settings = VideoSettings {
            xscale: 1.5,
            yscale: 2.5,
            ..VideoSettings::default()
        };
        let geometry = RenderGeometry::compute(&settings);
        assert_eq!(geometry, RenderGeometry { width: 444, height: 560 });
    }

    #[test]
    fn test_fullscreen_geometry() {
        let settings = VideoSettings {
            fullscreen: true,
            fullscreen_x: 1920,
            fullscreen_y: 1080,
            xscale: 2.0,
            ..VideoSettings::default()
        };
        let geometry = RenderGeometry::compute(&settings);
        assert_eq!(geometry, RenderGeometry { width: 1920, height: 1080 });
    }
}
