use crate::models::control::ElementId;
use crate::models::error::{MixerError, MixerStage, NativeError};
use crate::traits::native_mixer::{MixerBackend, NativeMixer};

/// A loaded mixer context for one card.
///
/// A session only exists once every open stage succeeded, so element
/// access before `load` is unrepresentable. The native handle is released
/// exactly once: by `close()` or, failing that, on drop.
pub struct MixerSession<H: NativeMixer> {
    handle: H,
    device: String,
    card_index: Option<u32>,
    closed: bool,
}

impl<H: NativeMixer> MixerSession<H> {
    /// Open, attach to `hw:<card_index>`, register simple elements, load.
    pub fn open<B>(backend: &B, card_index: u32) -> Result<Self, MixerError>
    where
        B: MixerBackend<Handle = H>,
    {
        let mut session = Self::open_device(backend, &format!("hw:{}", card_index))?;
        session.card_index = Some(card_index);
        Ok(session)
    }

    /// Same as `open`, for a named mixer device such as `"default"`.
    pub fn open_device<B>(backend: &B, device: &str) -> Result<Self, MixerError>
    where
        B: MixerBackend<Handle = H>,
    {
        let mut handle = backend.open().map_err(|e| failed(MixerStage::Open, e))?;

        run_stage(&mut handle, MixerStage::Attach, |h| h.attach(device))?;
        run_stage(&mut handle, MixerStage::RegisterSimple, |h| h.register_simple())?;
        run_stage(&mut handle, MixerStage::Load, |h| h.load())?;

        log::debug!("Mixer session open on {}", device);
        Ok(Self {
            handle,
            device: device.to_string(),
            card_index: None,
            closed: false,
        })
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn card_index(&self) -> Option<u32> {
        self.card_index
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// One fresh walk of the element list. Nothing is cached between walks.
    pub fn elements(&self) -> Vec<ElementId> {
        if self.closed {
            return Vec::new();
        }
        self.handle.elements()
    }

    pub(crate) fn native(&self) -> Result<&H, MixerError> {
        if self.closed {
            return Err(closed_error());
        }
        Ok(&self.handle)
    }

    pub(crate) fn native_mut(&mut self) -> Result<&mut H, MixerError> {
        if self.closed {
            return Err(closed_error());
        }
        Ok(&mut self.handle)
    }

    /// Release the native handle. Safe to call repeatedly.
    pub fn close(&mut self) {
        if !self.closed {
            self.handle.close();
            self.closed = true;
            log::debug!("Mixer session on {} closed", self.device);
        }
    }
}

impl<H: NativeMixer> Drop for MixerSession<H> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Run one open stage; on failure release the handle before reporting.
fn run_stage<H: NativeMixer>(
    handle: &mut H,
    stage: MixerStage,
    f: impl FnOnce(&mut H) -> Result<(), NativeError>,
) -> Result<(), MixerError> {
    f(handle).map_err(|e| {
        handle.close();
        let err = failed(stage, e);
        log::warn!("{}", err);
        err
    })
}

fn failed(stage: MixerStage, e: NativeError) -> MixerError {
    MixerError::MixerOpenFailed {
        stage,
        code: e.code,
    }
}

fn closed_error() -> MixerError {
    MixerError::ConfigurationFailed("mixer session is closed".into())
}
