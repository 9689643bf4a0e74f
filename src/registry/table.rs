//! Backend tables and the registry that groups them per device class.

use super::descriptor::{BackendDescriptor, Capabilities, DeviceClass};
use crate::backend::{AudioDriver, InputDriver, VideoDriver};
use crate::backends::{FileAudioDriver, NullAudioDriver, NullInputDriver, NullVideoDriver};
use std::sync::Arc;
use thiserror::Error;

/// A configured driver name is not among the registered backends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("couldn't find any {class} driver named \"{name}\"")]
pub struct BackendNotFound {
    /// Device class that was searched.
    pub class: DeviceClass,
    /// Name that was requested.
    pub name: String,
    /// Every registered identifier of that class, in registration order.
    pub available: Vec<String>,
}

impl BackendNotFound {
    /// Human-readable list of the available drivers, one per line.
    pub fn listing(&self) -> String {
        let mut out = format!("Available {} drivers are:\n", self.class);
        for ident in &self.available {
            out.push('\t');
            out.push_str(ident);
            out.push('\n');
        }
        out
    }
}

/// Ordered list of descriptors for a single device class.
pub struct BackendTable<D: ?Sized> {
    class: DeviceClass,
    entries: Vec<BackendDescriptor<D>>,
}

impl<D: ?Sized> BackendTable<D> {
    /// Create an empty table.
    pub fn new(class: DeviceClass) -> Self {
        Self {
            class,
            entries: Vec::new(),
        }
    }

    /// Device class of this table.
    pub fn class(&self) -> DeviceClass {
        self.class
    }

    /// Append a descriptor. If two descriptors share an identifier the
    /// first one registered wins.
    pub fn register(&mut self, descriptor: BackendDescriptor<D>) {
        self.entries.push(descriptor);
    }

    /// Look up a descriptor by name.
    pub fn resolve(&self, name: &str) -> Result<&BackendDescriptor<D>, BackendNotFound> {
        self.entries
            .iter()
            .find(|desc| desc.matches(name))
            .ok_or_else(|| BackendNotFound {
                class: self.class,
                name: name.to_string(),
                available: self.identifiers(),
            })
    }

    /// Registered identifiers, in registration order.
    pub fn identifiers(&self) -> Vec<String> {
        self.entries.iter().map(|d| d.ident().to_string()).collect()
    }

    /// Iterate over registered descriptors.
    pub fn iter(&self) -> impl Iterator<Item = &BackendDescriptor<D>> {
        self.entries.iter()
    }

    /// Number of registered descriptors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A descriptor returned by [`BackendRegistry::resolve`].
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    /// Audio descriptor.
    Audio(&'a BackendDescriptor<dyn AudioDriver>),
    /// Video descriptor.
    Video(&'a BackendDescriptor<dyn VideoDriver>),
    /// Input descriptor.
    Input(&'a BackendDescriptor<dyn InputDriver>),
}

impl Resolved<'_> {
    /// Identifier of the resolved descriptor.
    pub fn ident(&self) -> &str {
        match self {
            Resolved::Audio(d) => d.ident(),
            Resolved::Video(d) => d.ident(),
            Resolved::Input(d) => d.ident(),
        }
    }

    /// Capabilities of the resolved descriptor.
    pub fn capabilities(&self) -> Capabilities {
        match self {
            Resolved::Audio(d) => d.capabilities(),
            Resolved::Video(d) => d.capabilities(),
            Resolved::Input(d) => d.capabilities(),
        }
    }

    /// Device class of the resolved descriptor.
    pub fn class(&self) -> DeviceClass {
        match self {
            Resolved::Audio(_) => DeviceClass::Audio,
            Resolved::Video(_) => DeviceClass::Video,
            Resolved::Input(_) => DeviceClass::Input,
        }
    }
}

/// Registry of available backends for every device class.
///
/// The registry provides a central place to:
/// - Register compiled-in (or fake) drivers
/// - Resolve a configured driver name
/// - List identifiers for diagnostics
pub struct BackendRegistry {
    audio: BackendTable<dyn AudioDriver>,
    video: BackendTable<dyn VideoDriver>,
    input: BackendTable<dyn InputDriver>,
}

impl BackendRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            audio: BackendTable::new(DeviceClass::Audio),
            video: BackendTable::new(DeviceClass::Video),
            input: BackendTable::new(DeviceClass::Input),
        }
    }

    /// Registry of every backend compiled into this build.
    ///
    /// Which audio backends are present depends on Cargo features; the
    /// lookup logic is the same either way.
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        #[cfg(feature = "alsa")]
        registry.register_audio(crate::backends::AlsaAudioDriver::new());

        registry
            .register_audio(FileAudioDriver::new())
            .register_audio(NullAudioDriver::new())
            .register_video(NullVideoDriver::new())
            .register_input(NullInputDriver::new());

        registry
    }

    /// Register an audio driver.
    pub fn register_audio<D: AudioDriver + 'static>(&mut self, driver: D) -> &mut Self {
        let ident = driver.ident().to_string();
        let capabilities = driver.capabilities();
        let desc =
            BackendDescriptor::new(ident, capabilities, Arc::new(driver) as Arc<dyn AudioDriver>);
        self.audio.register(desc);
        self
    }

    /// Register a video driver.
    pub fn register_video<D: VideoDriver + 'static>(&mut self, driver: D) -> &mut Self {
        let ident = driver.ident().to_string();
        let capabilities = driver.capabilities();
        let desc =
            BackendDescriptor::new(ident, capabilities, Arc::new(driver) as Arc<dyn VideoDriver>);
        self.video.register(desc);
        self
    }

    /// Register an input driver.
    pub fn register_input<D: InputDriver + 'static>(&mut self, driver: D) -> &mut Self {
        let ident = driver.ident().to_string();
        let desc = BackendDescriptor::new(
            ident,
            Capabilities::default(),
            Arc::new(driver) as Arc<dyn InputDriver>,
        );
        self.input.register(desc);
        self
    }

    /// Resolve a configured name within a device class.
    pub fn resolve(&self, class: DeviceClass, name: &str) -> Result<Resolved<'_>, BackendNotFound> {
        Ok(match class {
            DeviceClass::Audio => Resolved::Audio(self.audio.resolve(name)?),
            DeviceClass::Video => Resolved::Video(self.video.resolve(name)?),
            DeviceClass::Input => Resolved::Input(self.input.resolve(name)?),
        })
    }

    /// Resolve an audio driver.
    pub fn resolve_audio(
        &self,
        name: &str,
    ) -> Result<&BackendDescriptor<dyn AudioDriver>, BackendNotFound> {
        self.audio.resolve(name)
    }

    /// Resolve a video driver.
    pub fn resolve_video(
        &self,
        name: &str,
    ) -> Result<&BackendDescriptor<dyn VideoDriver>, BackendNotFound> {
        self.video.resolve(name)
    }

    /// Resolve an input driver.
    pub fn resolve_input(
        &self,
        name: &str,
    ) -> Result<&BackendDescriptor<dyn InputDriver>, BackendNotFound> {
        self.input.resolve(name)
    }

    /// Registered identifiers of one class, in registration order.
    pub fn identifiers(&self, class: DeviceClass) -> Vec<String> {
        match class {
            DeviceClass::Audio => self.audio.identifiers(),
            DeviceClass::Video => self.video.identifiers(),
            DeviceClass::Input => self.input.identifiers(),
        }
    }

    /// Audio backend table.
    pub fn audio(&self) -> &BackendTable<dyn AudioDriver> {
        &self.audio
    }

    /// Video backend table.
    pub fn video(&self) -> &BackendTable<dyn VideoDriver> {
        &self.video
    }

    /// Input backend table.
    pub fn input(&self) -> &BackendTable<dyn InputDriver> {
        &self.input
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("audio", &self.audio.identifiers())
            .field("video", &self.video.identifiers())
            .field("input", &self.input.identifiers())
            .finish()
    }
}
