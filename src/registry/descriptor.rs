//! Backend descriptors.

use std::fmt;
use std::sync::Arc;

/// Device class a backend belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    /// Audio output.
    Audio,
    /// Video output.
    Video,
    /// Controller input.
    Input,
}

impl DeviceClass {
    /// All device classes, in initialization order.
    pub const ALL: [DeviceClass; 3] = [DeviceClass::Video, DeviceClass::Input, DeviceClass::Audio];

    /// Lowercase name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Audio => "audio",
            DeviceClass::Video => "video",
            DeviceClass::Input => "input",
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional capabilities a driver advertises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// The driver can report whether its device accepts float samples.
    pub float_samples: bool,
    /// The device supports non-blocking writes.
    pub nonblocking: bool,
    /// The video device may provide its own input device.
    pub bundled_input: bool,
}

/// A registered backend.
///
/// Immutable once registered. `D` is the driver trait object for the
/// descriptor's device class, e.g. `dyn AudioDriver`.
pub struct BackendDescriptor<D: ?Sized> {
    ident: String,
    capabilities: Capabilities,
    driver: Arc<D>,
}

impl<D: ?Sized> BackendDescriptor<D> {
    /// Create a descriptor.
    pub fn new(ident: impl Into<String>, capabilities: Capabilities, driver: Arc<D>) -> Self {
        Self {
            ident: ident.into(),
            capabilities,
            driver,
        }
    }

    /// Identifier used as the match key.
    pub fn ident(&self) -> &str {
        &self.ident
    }

    /// Capabilities advertised at registration.
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Driver used to construct devices.
    pub fn driver(&self) -> &Arc<D> {
        &self.driver
    }

    /// Case-insensitive exact match against the identifier.
    pub fn matches(&self, name: &str) -> bool {
        self.ident.eq_ignore_ascii_case(name)
    }
}

impl<D: ?Sized> Clone for BackendDescriptor<D> {
    fn clone(&self) -> Self {
        Self {
            ident: self.ident.clone(),
            capabilities: self.capabilities,
            driver: Arc::clone(&self.driver),
        }
    }
}

impl<D: ?Sized> fmt::Debug for BackendDescriptor<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendDescriptor")
            .field("ident", &self.ident)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_ignores_case() {
        let desc = BackendDescriptor::new("ALSA", Capabilities::default(), Arc::new(()));
        assert!(desc.matches("alsa"));
        assert!(desc.matches("Alsa"));
        assert!(!desc.matches("als"));
        assert!(!desc.matches("alsa "));
    }

    #[test]
    fn test_device_class_display() {
        assert_eq!(DeviceClass::Audio.to_string(), "audio");
        assert_eq!(DeviceClass::Video.to_string(), "video");
        assert_eq!(DeviceClass::Input.to_string(), "input");
    }
}
