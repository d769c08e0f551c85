use std::collections::BTreeMap;

/// Caller-facing runtime knobs passed to `build_net`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub use_gpu: bool,
    pub device_id: u32,
    pub seed: u64,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            use_gpu: false,
            device_id: 0,
            seed: 42,
        }
    }
}

/// Named numeric backend parameters (learning rate, momentum, ...).
///
/// Forwarded to the engine untouched; iteration order is by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendParams {
    params: BTreeMap<String, f32>,
}

impl BackendParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, returning the previous value if any.
    pub fn set(&mut self, name: impl Into<String>, value: f32) -> Option<f32> {
        self.params.insert(name.into(), value)
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: f32) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.params.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.params.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Device a session should be placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cpu { id: u32 },
    Gpu { id: u32 },
}

/// Options handed to [`Engine::create_session`](crate::Engine::create_session).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub device: Device,
    pub seed: u64,
    pub params: BackendParams,
}

impl SessionOptions {
    pub fn new(opts: &RuntimeOptions, params: &BackendParams) -> Self {
        let device = if opts.use_gpu {
            Device::Gpu { id: opts.device_id }
        } else {
            Device::Cpu { id: opts.device_id }
        };
        Self {
            device,
            seed: opts.seed,
            params: params.clone(),
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::new(&RuntimeOptions::default(), &BackendParams::default())
    }
}
