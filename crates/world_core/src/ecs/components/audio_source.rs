//! Audio source component
//!
//! Playback parameters for a positional sound emitter. Playback itself is
//! modelled as a flag; the component starts and stops it with the
//! simulation.

use crate::ecs::{Component, ComponentBase, ComponentType, EntityId, TickContext, TypedComponent};
use crate::foundation::math::Vec3;
use crate::persistence::{PersistenceError, PersistenceSink, PersistenceSource};

/// Positional sound emitter
#[derive(Debug)]
pub struct AudioSource {
    base: ComponentBase,
    clip: String,
    mute: bool,
    play_on_start: bool,
    looping: bool,
    volume: f32,
    pitch: f32,
    pan: f32,
    playing: bool,
    position: Vec3,
}

impl TypedComponent for AudioSource {
    const TYPE: ComponentType = ComponentType::AudioSource;

    fn new(entity: EntityId) -> Self {
        let mut source = Self {
            base: ComponentBase::new(entity),
            clip: String::new(),
            mute: false,
            play_on_start: true,
            looping: false,
            volume: 1.0,
            pitch: 1.0,
            pan: 0.0,
            playing: false,
            position: Vec3::zeros(),
        };
        source.base.set_type(Self::TYPE);

        let base = &mut source.base;
        base.register_attribute("clip", |s: &Self| s.clip.clone(), |s: &mut Self, v| s.clip = v);
        base.register_attribute("mute", |s: &Self| s.mute, |s: &mut Self, v| s.mute = v);
        base.register_attribute("play_on_start", |s: &Self| s.play_on_start, |s: &mut Self, v| s.play_on_start = v);
        base.register_attribute("looping", |s: &Self| s.looping, |s: &mut Self, v| s.looping = v);
        base.register_attribute("volume", |s: &Self| s.volume, |s: &mut Self, v| s.set_volume(v));
        base.register_attribute("pitch", |s: &Self| s.pitch, |s: &mut Self, v| s.set_pitch(v));
        base.register_attribute("pan", |s: &Self| s.pan, |s: &mut Self, v| s.set_pan(v));

        source
    }
}

impl AudioSource {
    /// Path of the audio clip
    pub fn clip(&self) -> &str {
        &self.clip
    }

    /// Set the clip path
    pub fn set_clip(&mut self, clip: impl Into<String>) {
        self.clip = clip.into();
    }

    /// Whether the source is muted
    pub fn is_muted(&self) -> bool {
        self.mute
    }

    /// Mute or unmute
    pub fn set_mute(&mut self, mute: bool) {
        self.mute = mute;
    }

    /// Whether playback begins with the simulation
    pub fn play_on_start(&self) -> bool {
        self.play_on_start
    }

    /// Toggle automatic playback on simulation start
    pub fn set_play_on_start(&mut self, play_on_start: bool) {
        self.play_on_start = play_on_start;
    }

    /// Whether playback loops
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Toggle looping
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Volume in `[0, 1]`
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Set volume, clamped to `[0, 1]`
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Pitch multiplier in `[0, 3]`
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Set pitch, clamped to `[0, 3]`
    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(0.0, 3.0);
    }

    /// Stereo pan in `[-1, 1]`
    pub fn pan(&self) -> f32 {
        self.pan
    }

    /// Set stereo pan, clamped to `[-1, 1]`
    pub fn set_pan(&mut self, pan: f32) {
        self.pan = pan.clamp(-1.0, 1.0);
    }

    /// Whether the clip is playing
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Start playback; returns `false` when there is no clip
    pub fn play(&mut self) -> bool {
        if self.clip.is_empty() {
            log::debug!("AudioSource has no clip to play");
            return false;
        }
        self.playing = true;
        true
    }

    /// Stop playback
    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Emitter position as of the last tick
    pub fn position(&self) -> Vec3 {
        self.position
    }
}

impl Component for AudioSource {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn on_start(&mut self) {
        if self.play_on_start {
            self.play();
        }
    }

    fn on_stop(&mut self) {
        self.stop();
    }

    fn on_remove(&mut self) {
        self.stop();
    }

    fn on_tick(&mut self, ctx: &mut TickContext<'_>) {
        if let Some(transform) = self.transform(ctx.entity()) {
            self.position = transform.position();
        }
    }

    fn serialize(&self, sink: &mut dyn PersistenceSink) -> Result<(), PersistenceError> {
        self.serialize_attributes(sink)
    }

    fn deserialize(&mut self, source: &mut dyn PersistenceSource) -> Result<(), PersistenceError> {
        self.deserialize_attributes(source)
    }
}
