//! fm-voice-host
//!
//! Registers the FM synth voice controller with a host runtime through a C
//! ABI. This is the only crate that knows how the host is reached: it wires
//! the host's function table into the library crates and keeps the single
//! controller instance between callbacks.
//!
//! 1. The host calls [`fm_voice_init`] with its [`HostApi`] when the module
//!    is activated. The controller reads its state from the DSP engine.
//! 2. Control-surface messages arrive through [`fm_voice_on_midi_internal`];
//!    the return value tells the host whether to apply its global gestures.
//! 3. The host calls [`fm_voice_tick`] at its frame rate; the controller
//!    repaints through the host's drawing primitives when due.
//! 4. [`fm_voice_deinit`] drops the controller when the module is unloaded.
//!
//! The host never calls two of these at once. Calls made before
//! initialisation, or re-entrantly from inside a host callback, are
//! dropped.

use core::cell::RefCell;
use core::slice;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use fm_voice_controller::{ControllerConfig, HostModule, VoiceController};

pub mod host_api;

pub use host_api::{HostApi, HostGateway, HostScreen};

/// Concrete controller type driven by the host.
type HostController = VoiceController<HostGateway, HostScreen>;

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

/// The module's controller, present between init and deinit.
static CONTROLLER: Mutex<CriticalSectionRawMutex, RefCell<Option<HostController>>> =
    Mutex::new(RefCell::new(None));

/// Run `f` on the live controller. `None` if not initialised or if the
/// controller is already in use further up the stack.
fn with_controller<R>(f: impl FnOnce(&mut HostController) -> R) -> Option<R> {
    CONTROLLER.lock(|slot| {
        let mut slot = slot.try_borrow_mut().ok()?;
        slot.as_mut().map(f)
    })
}

/// Swap the stored controller. Returns `false` if it is in use.
fn replace_controller(controller: Option<HostController>) -> bool {
    CONTROLLER.lock(|slot| match slot.try_borrow_mut() {
        Ok(mut slot) => {
            *slot = controller;
            true
        }
        Err(_) => false,
    })
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Activate the module.
///
/// Copies `api`, loads the controller state from the host and schedules a
/// first repaint. Calling it again re-initialises from scratch.
///
/// Returns `false` if `api` is null or a callback is still running.
///
/// # Safety
///
/// `api` must be null or point to a valid [`HostApi`]. Every non-null
/// function in it must stay callable until [`fm_voice_deinit`].
#[no_mangle]
pub unsafe extern "C" fn fm_voice_init(api: *const HostApi) -> bool {
    let Some(api) = api.as_ref().copied() else {
        return false;
    };

    let mut controller = VoiceController::new(
        HostGateway::new(api),
        HostScreen::new(api),
        ControllerConfig::dx7(),
    );
    controller.init();

    replace_controller(Some(controller))
}

/// Periodic host tick.
#[no_mangle]
pub extern "C" fn fm_voice_tick() {
    with_controller(|controller| controller.tick());
}

/// A message from the device's own controls.
///
/// Returns `true` if the controller consumed it.
///
/// # Safety
///
/// `data` must be null or valid for reads of `len` bytes.
#[no_mangle]
pub unsafe extern "C" fn fm_voice_on_midi_internal(data: *const u8, len: usize) -> bool {
    if data.is_null() {
        return false;
    }
    let raw = slice::from_raw_parts(data, len);
    with_controller(|controller| controller.on_input_internal(raw)).unwrap_or(false)
}

/// A message from an external source. The host routes these to the DSP
/// itself; the controller takes no action.
///
/// # Safety
///
/// `data` must be null or valid for reads of `len` bytes.
#[no_mangle]
pub unsafe extern "C" fn fm_voice_on_midi_external(data: *const u8, len: usize) {
    if data.is_null() {
        return;
    }
    let raw = slice::from_raw_parts(data, len);
    with_controller(|controller| controller.on_input_external(raw));
}

/// Drop the controller. Later callbacks are no-ops until the next init.
#[no_mangle]
pub extern "C" fn fm_voice_deinit() {
    replace_controller(None);
}

// ---------------------------------------------------------------------------
// Test host
// ---------------------------------------------------------------------------

/// A fake host runtime backed by process-wide tables.
#[cfg(test)]
pub(crate) mod test_host {
    use std::ffi::{c_char, c_int, CStr};
    use std::string::String;
    use std::sync::{Mutex, MutexGuard};
    use std::vec::Vec;

    use super::HostApi;

    static SERIAL: Mutex<()> = Mutex::new(());
    static PARAMS: Mutex<Vec<(String, String)>> = Mutex::new(Vec::new());
    static WRITES: Mutex<Vec<(String, String)>> = Mutex::new(Vec::new());
    static DRAWN: Mutex<Vec<String>> = Mutex::new(Vec::new());

    fn lock<T>(m: &'static Mutex<T>) -> MutexGuard<'static, T> {
        m.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Serialise the calling test against other users of the fake host and
    /// start from empty tables.
    pub fn reset() -> MutexGuard<'static, ()> {
        let guard = lock(&SERIAL);
        lock(&PARAMS).clear();
        lock(&WRITES).clear();
        lock(&DRAWN).clear();
        guard
    }

    /// Set a DSP-side value.
    pub fn put(key: &str, value: &str) {
        let mut params = lock(&PARAMS);
        params.retain(|(k, _)| k != key);
        params.push((key.into(), value.into()));
    }

    /// Values written by the module, in order.
    pub fn writes() -> Vec<(String, String)> {
        lock(&WRITES).clone()
    }

    /// Drawing calls made by the module, in order.
    pub fn drawn() -> Vec<String> {
        lock(&DRAWN).clone()
    }

    pub fn api() -> HostApi {
        HostApi {
            get_param: Some(get_param),
            set_param: Some(set_param),
            clear_screen: Some(clear_screen),
            print: Some(print),
            fill_rect: Some(fill_rect),
        }
    }

    unsafe fn text(ptr: *const c_char) -> String {
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }

    unsafe extern "C" fn get_param(key: *const c_char, buf: *mut c_char, buf_len: c_int) -> c_int {
        let key = text(key);
        let params = lock(&PARAMS);
        let Some((_, value)) = params.iter().find(|(k, _)| *k == key) else {
            return -1;
        };
        let n = value.len().min(buf_len as usize - 1);
        std::ptr::copy_nonoverlapping(value.as_ptr(), buf.cast::<u8>(), n);
        *buf.add(n) = 0;
        n as c_int
    }

    unsafe extern "C" fn set_param(key: *const c_char, value: *const c_char) {
        let (key, value) = (text(key), text(value));
        lock(&WRITES).push((key.clone(), value.clone()));
        // Commands are not stored as values by the DSP.
        if key != "panic" && key != "all_notes_off" {
            put(&key, &value);
        }
    }

    unsafe extern "C" fn clear_screen() {
        lock(&DRAWN).push("clear".into());
    }

    unsafe extern "C" fn print(x: c_int, y: c_int, s: *const c_char, _color: c_int) {
        let line = format!("text {},{} {}", x, y, text(s));
        lock(&DRAWN).push(line);
    }

    unsafe extern "C" fn fill_rect(x: c_int, y: c_int, w: c_int, h: c_int, _color: c_int) {
        lock(&DRAWN).push(format!("rect {},{} {}x{}", x, y, w, h));
    }
}
