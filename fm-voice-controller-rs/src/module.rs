//! Host lifecycle and the voice controller.
//!
//! [`HostModule`] is the callback surface a host runtime drives.
//! [`VoiceController`] implements it on top of a [`ParamGateway`] and a
//! [`Screen`], both supplied by the host-integration layer.

use fm_voice::voice_state::{ControllerState, ParamGateway};
use fm_voice_display_rs::{render_display, DisplayState, Screen};

use crate::config::ControllerConfig;
use crate::dispatch::{dispatch, CcAction};
use crate::input::{classify, InputEvent, MessageKind};
use crate::scheduler::RedrawScheduler;

/// Callbacks a host runtime invokes on a UI module.
///
/// The host calls exactly one of these at a time and each runs to
/// completion; implementations never block.
pub trait HostModule {
    /// One-time setup when the module is activated.
    fn init(&mut self);

    /// Periodic, host-paced update.
    fn tick(&mut self);

    /// A message from the device's own control surface.
    ///
    /// Returns `true` if the message was consumed. On `false` the host may
    /// apply its global gestures (e.g. a shift-combo exit).
    fn on_input_internal(&mut self, raw: &[u8]) -> bool;

    /// A message from an external source. The host forwards these to the
    /// DSP itself; the default does nothing.
    fn on_input_external(&mut self, _raw: &[u8]) {}
}

/// Preset browser and octave control for one FM synth voice.
///
/// Owns the [`ControllerState`] exclusively. All host interaction goes
/// through the gateway `G` and the screen `S`.
///
/// # Example
///
/// ```
/// use fm_voice::voice_state::{MemoryGateway, ParamKey};
/// use fm_voice_controller::{ControllerConfig, HostModule, VoiceController};
/// # use fm_voice_display_rs::{Color, Screen};
/// # struct NullScreen;
/// # impl Screen for NullScreen {
/// #     type Error = core::convert::Infallible;
/// #     fn clear_screen(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// #     fn print_text(&mut self, _: i32, _: i32, _: &str, _: Color) -> Result<(), Self::Error> { Ok(()) }
/// #     fn fill_rect(&mut self, _: i32, _: i32, _: u32, _: u32, _: Color) -> Result<(), Self::Error> { Ok(()) }
/// # }
///
/// let mut gateway = MemoryGateway::new();
/// gateway.insert(ParamKey::PresetCount, "16");
///
/// let mut ui = VoiceController::new(gateway, NullScreen, ControllerConfig::dx7());
/// ui.init();
/// assert!(ui.on_input_internal(&[0xB0, 63, 127])); // right arrow
/// assert_eq!(ui.state().current_preset(), 1);
/// ```
pub struct VoiceController<G, S> {
    gateway: G,
    screen: S,
    config: ControllerConfig,
    state: ControllerState,
    scheduler: RedrawScheduler,
}

impl<G, S> VoiceController<G, S>
where
    G: ParamGateway,
    S: Screen,
{
    /// Build a controller. Nothing is read from the host until
    /// [`init()`](HostModule::init).
    pub fn new(gateway: G, screen: S, config: ControllerConfig) -> Self {
        Self {
            gateway,
            screen,
            state: ControllerState::new(&config.defaults),
            scheduler: RedrawScheduler::new(config.redraw_interval),
            config,
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn scheduler(&self) -> &RedrawScheduler {
        &self.scheduler
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    /// Apply one dispatched CC action. Returns whether it was consumed.
    pub fn apply(&mut self, action: CcAction) -> bool {
        match action {
            CcAction::PresetNext => self.state.next_preset(&mut self.gateway),
            CcAction::PresetPrev => self.state.previous_preset(&mut self.gateway),
            CcAction::OctaveUp => self.state.adjust_octave(&mut self.gateway, 1),
            CcAction::OctaveDown => self.state.adjust_octave(&mut self.gateway, -1),
            CcAction::Absorbed | CcAction::Unhandled => {}
        }
        action.is_handled()
    }

    /// Paint the current state. The dirty flag is cleared only on success.
    fn repaint(&mut self) {
        let snapshot = DisplayState::capture(&self.state);
        match render_display(&mut self.screen, &snapshot, &self.config.display) {
            Ok(()) => {
                self.state.clear_redraw();
                self.scheduler.repainted();
            }
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::error!("Render failed");
            }
        }
    }
}

impl<G, S> HostModule for VoiceController<G, S>
where
    G: ParamGateway,
    S: Screen,
{
    fn init(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::info!("{} UI initializing", self.config.display.title);

        self.state = ControllerState::load(&self.gateway, &self.config.defaults);
        self.scheduler = RedrawScheduler::new(self.config.redraw_interval);
        self.state.mark_redraw();

        #[cfg(feature = "defmt")]
        defmt::info!(
            "{} UI ready: {} presets",
            self.config.display.title,
            self.state.preset_count()
        );
    }

    fn tick(&mut self) {
        self.state.sync_voice_count(&self.gateway);

        if self.scheduler.tick(self.state.needs_redraw()) {
            self.repaint();
        }
    }

    fn on_input_internal(&mut self, raw: &[u8]) -> bool {
        match classify(raw) {
            InputEvent::Channel(msg) if msg.kind == MessageKind::ControlChange => {
                let action = dispatch(&self.config.controls, msg.data1, msg.data2);
                self.apply(action)
            }
            InputEvent::Channel(msg) if msg.kind.is_note() => {
                self.state.mark_activity();
                false
            }
            InputEvent::Channel(_) | InputEvent::Touch | InputEvent::Ignored => false,
        }
    }
}
