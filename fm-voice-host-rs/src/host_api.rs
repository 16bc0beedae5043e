//! Host function table and the gateway/screen built on it.
//!
//! The host hands the module a [`HostApi`] at activation. Every entry is
//! nullable; a missing entry degrades to "no value" for reads and a no-op
//! for writes and drawing.

use core::convert::Infallible;
use core::ffi::{c_char, c_int, CStr};

use fm_voice::voice_state::{truncate_into, ParamGateway, ParamKey, ParamText, PARAM_TEXT_LEN};
use fm_voice_display_rs::{Color, Screen};
use heapless::Vec;

/// Room for a full parameter value plus its NUL terminator.
const VALUE_BUF_LEN: usize = PARAM_TEXT_LEN + 1;

/// Room for one line of screen text plus its NUL terminator.
const TEXT_BUF_LEN: usize = 64;

/// Copies the value of `key` into `buf` (at most `buf_len` bytes, NUL
/// included). Returns the value length, or a negative number on a miss.
pub type GetParamFn =
    unsafe extern "C" fn(key: *const c_char, buf: *mut c_char, buf_len: c_int) -> c_int;

/// Sets `key` to the NUL-terminated `value`.
pub type SetParamFn = unsafe extern "C" fn(key: *const c_char, value: *const c_char);

pub type ClearScreenFn = unsafe extern "C" fn();

pub type PrintFn = unsafe extern "C" fn(x: c_int, y: c_int, text: *const c_char, color: c_int);

pub type FillRectFn =
    unsafe extern "C" fn(x: c_int, y: c_int, w: c_int, h: c_int, color: c_int);

/// Function table the host passes to [`fm_voice_init`](crate::fm_voice_init).
#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct HostApi {
    pub get_param: Option<GetParamFn>,
    pub set_param: Option<SetParamFn>,
    pub clear_screen: Option<ClearScreenFn>,
    pub print: Option<PrintFn>,
    pub fill_rect: Option<FillRectFn>,
}

/// Host-side name of `key` as a C string.
pub fn key_cstr(key: ParamKey) -> &'static CStr {
    match key {
        ParamKey::Preset => c"preset",
        ParamKey::PresetCount => c"preset_count",
        ParamKey::PatchName => c"patch_name",
        ParamKey::Algorithm => c"algorithm",
        ParamKey::OctaveTranspose => c"octave_transpose",
        ParamKey::Polyphony => c"polyphony",
        ParamKey::AllNotesOff => c"all_notes_off",
        ParamKey::Panic => c"panic",
    }
}

/// Run `f` on a NUL-terminated copy of `text`.
///
/// Returns `None` without calling `f` if `text` does not fit in `N - 1`
/// bytes or contains an interior NUL.
fn with_c_str<const N: usize, R>(text: &str, f: impl FnOnce(&CStr) -> R) -> Option<R> {
    let mut buf: Vec<u8, N> = Vec::new();
    buf.extend_from_slice(text.as_bytes()).ok()?;
    buf.push(0).ok()?;
    let c_text = CStr::from_bytes_with_nul(&buf).ok()?;
    Some(f(c_text))
}

/// Longest prefix of `bytes` that is valid UTF-8.
///
/// A host that cuts a long value to fit the buffer may split a multi-byte
/// character; everything before the split is kept.
fn valid_prefix(bytes: &[u8]) -> &str {
    match core::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
    }
}

// ── Parameter gateway ────────────────────────────────────────────────────

/// [`ParamGateway`] backed by the host's `get_param` / `set_param`.
pub struct HostGateway {
    api: HostApi,
}

impl HostGateway {
    pub fn new(api: HostApi) -> Self {
        Self { api }
    }
}

impl ParamGateway for HostGateway {
    fn get(&self, key: ParamKey) -> Option<ParamText> {
        let get_param = self.api.get_param?;
        let mut buf = [0u8; VALUE_BUF_LEN];

        // SAFETY: the key is a static C string and `buf` is writable for
        // `VALUE_BUF_LEN` bytes, which is the length passed to the host.
        let len = unsafe {
            get_param(
                key_cstr(key).as_ptr(),
                buf.as_mut_ptr().cast::<c_char>(),
                VALUE_BUF_LEN as c_int,
            )
        };
        if len < 0 {
            return None;
        }

        // Hosts that fill the buffer without terminating it are cut short.
        buf[VALUE_BUF_LEN - 1] = 0;
        let bytes = CStr::from_bytes_until_nul(&buf).ok()?.to_bytes();
        Some(truncate_into(valid_prefix(bytes)))
    }

    fn set(&mut self, key: ParamKey, value: &str) {
        let Some(set_param) = self.api.set_param else {
            return;
        };

        let sent = with_c_str::<VALUE_BUF_LEN, _>(value, |c_value| {
            // SAFETY: both pointers are valid NUL-terminated strings for
            // the duration of the call.
            unsafe { set_param(key_cstr(key).as_ptr(), c_value.as_ptr()) }
        });

        if sent.is_none() {
            #[cfg(feature = "defmt")]
            defmt::warn!("dropped unencodable value for {}", key.as_str());
        }
    }
}

// ── Screen ───────────────────────────────────────────────────────────────

/// [`Screen`] backed by the host's drawing primitives.
pub struct HostScreen {
    api: HostApi,
}

impl HostScreen {
    pub fn new(api: HostApi) -> Self {
        Self { api }
    }
}

impl Screen for HostScreen {
    type Error = Infallible;

    fn clear_screen(&mut self) -> Result<(), Infallible> {
        if let Some(clear_screen) = self.api.clear_screen {
            // SAFETY: takes no arguments.
            unsafe { clear_screen() };
        }
        Ok(())
    }

    fn print_text(&mut self, x: i32, y: i32, text: &str, color: Color) -> Result<(), Infallible> {
        if let Some(print) = self.api.print {
            with_c_str::<TEXT_BUF_LEN, _>(text, |c_text| {
                // SAFETY: `c_text` is NUL-terminated and outlives the call.
                unsafe { print(x, y, c_text.as_ptr(), color.as_host()) }
            });
        }
        Ok(())
    }

    fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Color,
    ) -> Result<(), Infallible> {
        if let Some(fill_rect) = self.api.fill_rect {
            let w = c_int::try_from(width).unwrap_or(c_int::MAX);
            let h = c_int::try_from(height).unwrap_or(c_int::MAX);
            // SAFETY: plain integer arguments.
            unsafe { fill_rect(x, y, w, h, color.as_host()) };
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_host;

    #[test]
    fn key_cstr_matches_names() {
        for key in ParamKey::ALL {
            assert_eq!(key_cstr(key).to_str().unwrap(), key.as_str());
        }
    }

    #[test]
    fn empty_api_degrades_quietly() {
        let mut gateway = HostGateway::new(HostApi::default());
        assert!(gateway.get(ParamKey::Preset).is_none());
        gateway.set(ParamKey::Panic, "1");

        let mut screen = HostScreen::new(HostApi::default());
        assert!(screen.clear_screen().is_ok());
        assert!(screen.print_text(0, 0, "x", Color::On).is_ok());
        assert!(screen.fill_rect(0, 0, 1, 1, Color::On).is_ok());
    }

    #[test]
    fn gateway_reads_and_writes_through_host() {
        let _guard = test_host::reset();
        test_host::put("patch_name", "BRASS   1");

        let mut gateway = HostGateway::new(test_host::api());
        assert_eq!(gateway.get(ParamKey::PatchName).unwrap().as_str(), "BRASS   1");
        assert!(gateway.get(ParamKey::Algorithm).is_none());

        gateway.set(ParamKey::Preset, "12");
        assert_eq!(test_host::writes(), [("preset".to_string(), "12".to_string())]);
    }

    #[test]
    fn gateway_truncates_oversized_host_values() {
        let _guard = test_host::reset();
        let long = "N".repeat(200);
        test_host::put("patch_name", &long);

        let gateway = HostGateway::new(test_host::api());
        let value = gateway.get(ParamKey::PatchName).unwrap();
        assert_eq!(value.len(), PARAM_TEXT_LEN);
    }

    #[test]
    fn valid_prefix_drops_a_split_character() {
        assert_eq!(valid_prefix(b"BRASS"), "BRASS");
        assert_eq!(valid_prefix("aé".as_bytes()), "aé");
        assert_eq!(valid_prefix(&"aé".as_bytes()[..2]), "a");
        assert_eq!(valid_prefix(&[0xFF, b'x']), "");
    }

    #[test]
    fn gateway_keeps_name_cut_inside_a_character() {
        let _guard = test_host::reset();
        // 1 + 40 * 2 bytes; the host copies 64 and splits the 32nd "é".
        let long = format!("a{}", "é".repeat(40));
        test_host::put("patch_name", &long);

        let gateway = HostGateway::new(test_host::api());
        let value = gateway.get(ParamKey::PatchName).unwrap();
        assert_eq!(value.as_str(), format!("a{}", "é".repeat(31)));
    }

    #[test]
    fn split_character_name_reaches_the_screen() {
        let _guard = test_host::reset();
        test_host::put("patch_name", &format!("a{}", "é".repeat(40)));

        let api = test_host::api();
        assert!(unsafe { crate::fm_voice_init(&api) });
        let right = [0xB0, 63, 127];
        assert!(unsafe { crate::fm_voice_on_midi_internal(right.as_ptr(), right.len()) });
        crate::fm_voice_tick();

        let expected = format!("text 2,18 02: a{}", "é".repeat(15));
        assert!(test_host::drawn().contains(&expected), "{:?}", test_host::drawn());
        crate::fm_voice_deinit();
    }

    #[test]
    fn screen_forwards_primitives() {
        let _guard = test_host::reset();
        let mut screen = HostScreen::new(test_host::api());
        screen.clear_screen().unwrap();
        screen.print_text(2, 18, "01: Init", Color::On).unwrap();
        screen.fill_rect(0, 12, 128, 1, Color::On).unwrap();

        assert_eq!(
            test_host::drawn(),
            ["clear", "text 2,18 01: Init", "rect 0,12 128x1"]
        );
    }

    #[test]
    fn text_with_interior_nul_is_skipped() {
        let _guard = test_host::reset();
        let mut screen = HostScreen::new(test_host::api());
        screen.print_text(0, 0, "a\0b", Color::On).unwrap();
        assert!(test_host::drawn().is_empty());
    }
}
