//! Audio pipeline initialization and teardown.
//!
//! Audio is best effort. A missing driver, a device that fails to open, or a
//! resampler that cannot be built leaves the pipeline inactive and the host
//! runs silent. Two conditions are always fatal: an output rate the buffers
//! cannot hold after resampling, and a failed buffer allocation.

use crate::audio::buffers::{AudioBuffers, CHANNELS};
use crate::audio::convert::SampleFormat;
use crate::audio::resampler::{Resampler, ResamplerFactory, new_resampler};
use crate::backend::{AudioDevice, AudioDriver, AudioParams};
use crate::config::AudioSettings;
use crate::error::{Error, Result};
use crate::registry::{BackendDescriptor, BackendRegistry, DeviceClass};

/// Frames per iteration when audio paces emulation.
pub const BLOCK_CHUNK_SIZE: usize = 64;

/// Frames per iteration when running unsynced. Larger, so fast-forward does
/// not turn into line noise.
pub const NONBLOCK_CHUNK_SIZE: usize = 2048;

/// Upper bound (exclusive) on output rate / input rate.
pub const MAX_RATIO: u32 = 16;

/// Check that `output_rate` can be reached from `input_rate` within
/// [`MAX_RATIO`].
pub fn validate_rate_ratio(input_rate: u32, output_rate: u32) -> Result<()> {
    if u64::from(output_rate) < u64::from(input_rate) * u64::from(MAX_RATIO) {
        Ok(())
    } else {
        Err(Error::RateRatio {
            input_rate,
            output_rate,
            max_ratio: MAX_RATIO,
        })
    }
}

/// Mutable access to the active audio stages at once.
pub struct AudioStages<'a> {
    /// Output device.
    pub device: &'a mut dyn AudioDevice,
    /// Rate converter.
    pub resampler: &'a mut dyn Resampler,
    /// Sample buffers.
    pub buffers: &'a mut AudioBuffers,
}

/// Owns the audio device, the resampler and the sample buffers.
pub struct AudioPipeline {
    /// Audio was enabled at the last init.
    enabled: bool,
    /// Audio can be used by the host.
    active: bool,
    driver: Option<BackendDescriptor<dyn AudioDriver>>,
    device: Option<Box<dyn AudioDevice>>,
    resampler: Option<Box<dyn Resampler>>,
    buffers: Option<AudioBuffers>,
    block_chunk_size: usize,
    nonblock_chunk_size: usize,
    chunk_size: usize,
    /// Blocking and non-blocking chunk sizes applied at init.
    chunk_limits: (usize, usize),
    use_float: bool,
    input_rate: u32,
    output_rate: u32,
    resampler_factory: ResamplerFactory,
}

impl AudioPipeline {
    /// Create an uninitialized pipeline using the built-in resampler.
    pub fn new() -> Self {
        Self::with_resampler_factory(new_resampler)
    }

    /// Create an uninitialized pipeline that builds its resampler with
    /// `factory`.
    pub fn with_resampler_factory(factory: ResamplerFactory) -> Self {
        Self {
            enabled: false,
            active: false,
            driver: None,
            device: None,
            resampler: None,
            buffers: None,
            block_chunk_size: BLOCK_CHUNK_SIZE,
            nonblock_chunk_size: NONBLOCK_CHUNK_SIZE,
            chunk_size: BLOCK_CHUNK_SIZE,
            chunk_limits: (BLOCK_CHUNK_SIZE, NONBLOCK_CHUNK_SIZE),
            use_float: false,
            input_rate: 0,
            output_rate: 0,
            resampler_factory: factory,
        }
    }

    /// Select the audio driver and set up the pipeline.
    ///
    /// Driver, device and resampler failures leave the pipeline inactive and
    /// return `Ok`. The rate ratio and buffer allocation are fatal. On a
    /// fatal error whatever was constructed stays owned by the pipeline
    /// until [`uninit`](Self::uninit).
    pub fn init(&mut self, registry: &BackendRegistry, settings: &AudioSettings) -> Result<()> {
        if self.enabled {
            self.uninit();
        }

        if !settings.enable {
            self.active = false;
            self.chunk_size = self.block_chunk_size;
            tracing::debug!("Audio disabled");
            return Ok(());
        }

        self.enabled = true;
        self.active = true;
        self.use_float = false;
        self.input_rate = settings.in_rate;
        self.output_rate = settings.out_rate;

        match registry.resolve_audio(&settings.driver) {
            Ok(descriptor) => {
                tracing::info!(driver = descriptor.ident(), "Selected audio driver");
                self.driver = Some(descriptor.clone());
            }
            Err(e) => {
                tracing::warn!(
                    available = ?e.available,
                    "{}, audio disabled",
                    e
                );
                self.active = false;
            }
        }

        (self.block_chunk_size, self.nonblock_chunk_size) = self.chunk_limits;

        if let Some(descriptor) = &self.driver {
            let params = AudioParams {
                device: Some(settings.device.as_str()).filter(|d| !d.is_empty()),
                rate: settings.out_rate,
                latency_ms: settings.latency,
            };
            match descriptor.driver().init(&params) {
                Ok(device) => {
                    tracing::info!(
                        driver = descriptor.ident(),
                        rate = settings.out_rate,
                        latency = settings.latency,
                        "Opened audio device"
                    );
                    self.device = Some(device);
                }
                Err(source) => {
                    let e = Error::backend_init(DeviceClass::Audio, descriptor.ident(), source);
                    tracing::warn!("{}, audio disabled", e);
                    self.active = false;
                }
            }
        }

        if self.active {
            if let (Some(descriptor), Some(device)) = (&self.driver, &self.device) {
                self.use_float = descriptor.capabilities().float_samples && device.use_float();
            }
        }

        match self.device.as_mut() {
            Some(device) if self.active && !settings.sync => {
                if let Some(descriptor) = &self.driver {
                    if !descriptor.capabilities().nonblocking {
                        tracing::warn!(
                            driver = descriptor.ident(),
                            "Audio driver does not advertise non-blocking writes"
                        );
                    }
                }
                device.set_nonblock_state(true);
                self.chunk_size = self.nonblock_chunk_size;
            }
            _ => self.chunk_size = self.block_chunk_size,
        }

        if self.active {
            match (self.resampler_factory)(settings.src_quality, CHANNELS) {
                Ok(resampler) => self.resampler = Some(resampler),
                Err(e) => {
                    tracing::warn!("Failed to create resampler: {}, audio disabled", e);
                    self.active = false;
                }
            }
        }

        validate_rate_ratio(settings.in_rate, settings.out_rate)?;

        if self.active {
            let max_frames = self.block_chunk_size.max(self.nonblock_chunk_size);
            self.buffers = Some(AudioBuffers::allocate(max_frames, MAX_RATIO as usize)?);
        }

        tracing::debug!(
            active = self.active,
            chunk_size = self.chunk_size,
            use_float = self.use_float,
            "Audio pipeline initialized"
        );

        Ok(())
    }

    /// Release the device, the resampler and the buffers.
    ///
    /// Safe after any init outcome, and a no-op when called again.
    pub fn uninit(&mut self) {
        self.active = false;
        if !self.enabled {
            return;
        }

        if let (Some(mut device), Some(_)) = (self.device.take(), &self.driver) {
            device.shutdown();
        }
        self.resampler = None;
        self.buffers = None;
        self.driver = None;
        self.use_float = false;
        self.chunk_size = self.block_chunk_size;
        self.enabled = false;

        tracing::debug!("Audio pipeline released");
    }

    /// Whether audio can be used.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Frames per iteration selected at init.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Frames per iteration in blocking mode.
    pub fn block_chunk_size(&self) -> usize {
        self.block_chunk_size
    }

    /// Frames per iteration in non-blocking mode.
    pub fn nonblock_chunk_size(&self) -> usize {
        self.nonblock_chunk_size
    }

    /// Whether the device takes float samples directly.
    pub fn use_float(&self) -> bool {
        self.use_float
    }

    /// Sample format to hand to the device.
    pub fn output_format(&self) -> SampleFormat {
        if self.use_float {
            SampleFormat::F32
        } else {
            SampleFormat::S16
        }
    }

    /// Identifier of the selected driver.
    pub fn driver_ident(&self) -> Option<&str> {
        self.driver.as_ref().map(|d| d.ident())
    }

    /// Resampling ratio (output rate / input rate).
    pub fn ratio(&self) -> f64 {
        if self.input_rate == 0 {
            return 1.0;
        }
        f64::from(self.output_rate) / f64::from(self.input_rate)
    }

    /// The audio device.
    pub fn device_mut(&mut self) -> Option<&mut (dyn AudioDevice + 'static)> {
        self.device.as_deref_mut()
    }

    /// The resampler.
    pub fn resampler_mut(&mut self) -> Option<&mut (dyn Resampler + 'static)> {
        self.resampler.as_deref_mut()
    }

    /// The sample buffers.
    pub fn buffers(&self) -> Option<&AudioBuffers> {
        self.buffers.as_ref()
    }

    /// The sample buffers, mutably.
    pub fn buffers_mut(&mut self) -> Option<&mut AudioBuffers> {
        self.buffers.as_mut()
    }

    /// Borrow every stage at once. `None` unless audio is active.
    pub fn stages_mut(&mut self) -> Option<AudioStages<'_>> {
        if !self.active {
            return None;
        }
        match (&mut self.device, &mut self.resampler, &mut self.buffers) {
            (Some(device), Some(resampler), Some(buffers)) => Some(AudioStages {
                device: &mut **device,
                resampler: &mut **resampler,
                buffers,
            }),
            _ => None,
        }
    }
}

impl Default for AudioPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AudioPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioPipeline")
            .field("enabled", &self.enabled)
            .field("active", &self.active)
            .field("driver", &self.driver_ident())
            .field("chunk_size", &self.chunk_size)
            .field("use_float", &self.use_float)
            .field("buffers", &self.buffers)
            .finish()
    }
}
