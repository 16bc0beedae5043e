//! Screen primitives and the `embedded-graphics` adapter.
//!
//! [`Screen`] mirrors the three drawing calls a host runtime offers a
//! module. [`GraphicsScreen`] implements it on top of any monochrome
//! [`DrawTarget`], e.g. an SSD1306 frame buffer or a simulator window.

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};

/// Pixel colour on a monochrome screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    /// Background (host colour 0).
    #[default]
    Off,
    /// Foreground (host colour 1).
    On,
}

impl Color {
    /// Numeric colour as passed to host drawing calls.
    pub fn as_host(self) -> i32 {
        match self {
            Color::Off => 0,
            Color::On => 1,
        }
    }
}

impl From<Color> for BinaryColor {
    fn from(color: Color) -> Self {
        match color {
            Color::Off => BinaryColor::Off,
            Color::On => BinaryColor::On,
        }
    }
}

/// Drawing primitives on a 128×64 logical canvas.
///
/// Coordinates are pixels from the top-left corner; text is positioned by
/// its top-left corner. Host-provided primitives are usually infallible and
/// use [`core::convert::Infallible`] as their error type.
pub trait Screen {
    /// Error reported by the underlying drawing surface.
    type Error;

    /// Clear the whole canvas to the background colour.
    fn clear_screen(&mut self) -> Result<(), Self::Error>;

    /// Draw `text` with its top-left corner at `(x, y)`.
    fn print_text(&mut self, x: i32, y: i32, text: &str, color: Color) -> Result<(), Self::Error>;

    /// Fill a `width` × `height` rectangle with its top-left corner at `(x, y)`.
    fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Color,
    ) -> Result<(), Self::Error>;
}

/// [`Screen`] implementation for any `embedded-graphics` monochrome target.
///
/// Text uses the 6×10 ASCII mono font.
///
/// # Example
///
/// ```
/// use embedded_graphics::{mock_display::MockDisplay, pixelcolor::BinaryColor, prelude::*};
/// use fm_voice_display_rs::{Color, GraphicsScreen, Screen};
///
/// let mut screen = GraphicsScreen::new(MockDisplay::<BinaryColor>::new());
/// screen.fill_rect(0, 0, 2, 1, Color::On).unwrap();
/// assert_eq!(screen.target().get_pixel(Point::new(1, 0)), Some(BinaryColor::On));
/// ```
pub struct GraphicsScreen<D> {
    target: D,
}

impl<D> GraphicsScreen<D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    /// Wrap a draw target. No drawing happens until a primitive is called.
    pub fn new(target: D) -> Self {
        Self { target }
    }

    /// Borrow the wrapped target.
    pub fn target(&self) -> &D {
        &self.target
    }
}

impl<D> Screen for GraphicsScreen<D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    type Error = D::Error;

    fn clear_screen(&mut self) -> Result<(), Self::Error> {
        self.target.clear(BinaryColor::Off)
    }

    fn print_text(&mut self, x: i32, y: i32, text: &str, color: Color) -> Result<(), Self::Error> {
        let style = MonoTextStyle::new(&FONT_6X10, color.into());
        Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(&mut self.target)?;
        Ok(())
    }

    fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Color,
    ) -> Result<(), Self::Error> {
        Rectangle::new(Point::new(x, y), Size::new(width, height))
            .into_styled(PrimitiveStyle::with_fill(color.into()))
            .draw(&mut self.target)
    }
}
