//! Editor Module
//!
//! [`MirrorAnimationModule`] is the entry point an editor action talks to. It
//! owns the settings and forwards mirror requests to a [`MirrorResampler`].
//! Startup and shutdown only log; the module holds no process-wide state.

use crate::animation::AnimationClip;
use crate::assets::AssetStore;
use crate::errors::Result;
use crate::mirror::{MirrorOutput, MirrorResampler, MirrorTable, TableMirror};
use crate::settings::MirrorSettings;

pub struct MirrorAnimationModule {
    resampler: MirrorResampler<TableMirror>,
    started: bool,
}

impl MirrorAnimationModule {
    #[must_use]
    pub fn new(settings: MirrorSettings) -> Self {
        Self {
            resampler: MirrorResampler::new(settings),
            started: false,
        }
    }

    pub fn startup_module(&mut self) {
        if !self.started {
            log::info!(
                "Mirror animation module started (suffix '{}')",
                self.resampler.settings().name_suffix
            );
            self.started = true;
        }
    }

    pub fn shutdown_module(&mut self) {
        if self.started {
            log::info!("Mirror animation module shut down");
            self.started = false;
        }
    }

    #[inline]
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &MirrorSettings {
        self.resampler.settings()
    }

    pub fn make_mirror_animation<S: AssetStore + ?Sized>(
        &self,
        source: Option<&AnimationClip>,
        table: Option<&MirrorTable>,
        store: &mut S,
    ) -> Result<MirrorOutput> {
        self.resampler.make_mirror_animation(source, table, store)
    }
}

impl Default for MirrorAnimationModule {
    fn default() -> Self {
        Self::new(MirrorSettings::default())
    }
}
