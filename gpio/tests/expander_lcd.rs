use crowlcd_gpio::bus::MemoryBus;
use crowlcd_gpio::delay::{NoDelay, RecordingDelay};
use crowlcd_gpio::expander::{MCP23008_GPIO, MCP23008_IODIR};
use crowlcd_gpio::lcd::hd44780::{ENABLE_PULSE_WIDTH_US, SETTLE_DELAY_US};
use crowlcd_gpio::lcd::{ExpanderLcd, LcdDisplay, LcdState};
use crowlcd_gpio::GpioError;
use std::time::Duration;

const RS: u8 = 1 << 1;
const EN: u8 = 1 << 2;
const BACKLIGHT: u8 = 1 << 7;

/// One byte as seen by the controller: (RS, value).
type Sent = (bool, u8);

/// Replays port writes the way the controller latches them: a nibble from D4..D7 on every
/// enable pulse, two nibbles per byte.
fn decode(images: &[u8]) -> Vec<Sent> {
    let mut nibbles = Vec::new();
    let mut previous = 0u8;
    for &image in images {
        if image & EN != 0 && previous & EN == 0 {
            nibbles.push((image & RS != 0, (image >> 3) & 0x0F));
        }
        previous = image;
    }
    assert_eq!(nibbles.len() % 2, 0, "odd number of nibbles latched");
    nibbles
        .chunks(2)
        .map(|pair| {
            assert_eq!(pair[0].0, pair[1].0, "RS changed within a byte");
            (pair[0].0, pair[0].1 << 4 | pair[1].1)
        })
        .collect()
}

fn port(lcd: &ExpanderLcd<MemoryBus, NoDelay>) -> Vec<u8> {
    lcd.driver().expander().bus().values_of(MCP23008_GPIO)
}

fn sent(lcd: &ExpanderLcd<MemoryBus, NoDelay>) -> Vec<Sent> {
    decode(&port(lcd))
}

fn reset_bus(lcd: &mut ExpanderLcd<MemoryBus, NoDelay>) {
    lcd.driver_mut().expander_mut().bus_mut().clear();
}

fn ready_lcd() -> ExpanderLcd<MemoryBus, NoDelay> {
    let mut lcd = LcdDisplay::with_bus(MemoryBus::new(), NoDelay).unwrap();
    lcd.initialize().unwrap();
    reset_bus(&mut lcd);
    lcd
}

fn cmd(byte: u8) -> Sent {
    (false, byte)
}

fn data(s: &str) -> Vec<Sent> {
    s.bytes().map(|b| (true, b)).collect()
}

#[test]
fn construction_only_configures_the_expander() {
    let lcd = LcdDisplay::with_bus(MemoryBus::new(), NoDelay).unwrap();
    assert_eq!(lcd.state(), LcdState::Uninitialized);
    assert_eq!(
        lcd.driver().expander().bus().writes(),
        &[(MCP23008_IODIR, 0x00)]
    );
}

#[test]
fn initialize_sends_reset_settings_and_clear() {
    let mut lcd = LcdDisplay::with_bus(MemoryBus::new(), RecordingDelay::new()).unwrap();
    lcd.initialize().unwrap();

    let images = lcd.driver().expander().bus().values_of(MCP23008_GPIO);
    assert_eq!(images[0], BACKLIGHT);
    assert_eq!(
        decode(&images),
        vec![
            cmd(0x33),
            cmd(0x32),
            cmd(0x0C),
            cmd(0x28),
            cmd(0x06),
            cmd(0x01),
            cmd(0x02),
        ]
    );

    let settle = Duration::from_micros(SETTLE_DELAY_US.into());
    let pulse = Duration::from_micros(ENABLE_PULSE_WIDTH_US.into());
    let delays = lcd.driver().expander().delay().delays();
    assert_eq!(delays.iter().filter(|&&d| d == settle).count(), 2);
    assert_eq!(delays.iter().filter(|&&d| d == pulse).count(), 7 * 2);
}

#[test]
fn each_byte_is_rs_then_high_nibble_then_low_nibble() {
    let mut lcd = ready_lcd();
    lcd.write_text("A").unwrap();
    let images = port(&lcd);

    // set-address command 0x80 first, then 'A' = 0x41
    let a = &images[7..];
    assert_eq!(
        a,
        &[
            BACKLIGHT | RS,
            BACKLIGHT | RS | 0x4 << 3,
            BACKLIGHT | RS | 0x4 << 3 | EN,
            BACKLIGHT | RS | 0x4 << 3,
            BACKLIGHT | RS | 0x1 << 3,
            BACKLIGHT | RS | 0x1 << 3 | EN,
            BACKLIGHT | RS | 0x1 << 3,
        ]
    );
}

#[test]
fn lines_resolve_to_distinct_addresses() {
    let mut lcd = ready_lcd();
    lcd.set_cursor_to_line(1).unwrap();
    lcd.set_cursor_to_line(2).unwrap();
    assert_eq!(sent(&lcd), vec![cmd(0x80), cmd(0xC0)]);
}

#[test]
fn invalid_rows_fail_without_bus_traffic() {
    let mut lcd = ready_lcd();
    for row in [0, 3] {
        let err = lcd.set_cursor_to_line(row).unwrap_err();
        assert!(matches!(err, GpioError::Configuration(_)));
        assert!(!err.is_transport());
    }
    assert!(lcd.write_line("too far", 3).is_err());
    assert!(port(&lcd).is_empty());
}

#[test]
fn clear_line_blanks_sixteen_cells() {
    let mut lcd = ready_lcd();
    lcd.write_text("garbage\ngarbage").unwrap();
    reset_bus(&mut lcd);

    lcd.clear_line(1).unwrap();
    let mut expected = vec![cmd(0x80)];
    expected.extend(data(&" ".repeat(16)));
    assert_eq!(sent(&lcd), expected);
}

#[test]
fn long_text_wraps_once_after_sixteenth_character() {
    let mut lcd = ready_lcd();
    lcd.write_text("ABCDEFGHIJKLMNOPQR").unwrap();

    let mut expected = vec![cmd(0x80)];
    expected.extend(data("ABCDEFGHIJKLMNOP"));
    expected.push(cmd(0xC0));
    expected.extend(data("QR"));
    assert_eq!(sent(&lcd), expected);
}

#[test]
fn line_break_switches_to_second_row() {
    let mut lcd = ready_lcd();
    lcd.write_text("AB\nCD").unwrap();

    let mut expected = vec![cmd(0x80)];
    expected.extend(data("AB"));
    expected.push(cmd(0xC0));
    expected.extend(data("CD"));
    assert_eq!(sent(&lcd), expected);
}

#[test]
fn second_line_break_starts_the_row_again() {
    let mut lcd = ready_lcd();
    lcd.write_text("AB\nCD\nEF").unwrap();

    let mut expected = vec![cmd(0x80)];
    expected.extend(data("AB"));
    expected.push(cmd(0xC0));
    expected.extend(data("CD"));
    expected.push(cmd(0xC0));
    expected.extend(data("EF"));
    assert_eq!(sent(&lcd), expected);
}

#[test]
fn write_line_replaces_a_row() {
    let mut lcd = ready_lcd();
    lcd.write_line("Hello", 2).unwrap();

    let mut expected = vec![cmd(0x02), cmd(0xC0)];
    expected.extend(data(&" ".repeat(16)));
    expected.push(cmd(0xC0));
    expected.extend(data("Hello"));
    assert_eq!(sent(&lcd), expected);
}

#[test]
fn glyph_upload_masks_slot_and_writes_eight_rows() {
    let mut lcd = ready_lcd();
    lcd.create_own_character(9, &[0x04, 0x0E, 0x1F]).unwrap();

    let sent = sent(&lcd);
    assert_eq!(sent[0], cmd(0x48));
    assert_eq!(
        &sent[1..],
        &[
            (true, 0x04),
            (true, 0x0E),
            (true, 0x1F),
            (true, 0),
            (true, 0),
            (true, 0),
            (true, 0),
            (true, 0),
        ]
    );
}

#[test]
fn backlight_works_before_initialize_with_one_write() {
    let mut lcd = LcdDisplay::with_bus(MemoryBus::new(), NoDelay).unwrap();
    lcd.set_display_backlight(true).unwrap();
    assert_eq!(port(&lcd), vec![BACKLIGHT]);

    lcd.set_display_backlight(false).unwrap();
    assert_eq!(port(&lcd), vec![BACKLIGHT, 0x00]);
    assert_eq!(lcd.state(), LcdState::Uninitialized);
}

#[test]
fn clearing_twice_gives_the_same_traffic() {
    let mut lcd = ready_lcd();
    lcd.clear_display().unwrap();
    let first = port(&lcd);
    reset_bus(&mut lcd);

    lcd.clear_display().unwrap();
    assert_eq!(port(&lcd), first);
    assert_eq!(decode(&first), vec![cmd(0x01), cmd(0x02)]);
}

#[test]
fn transport_errors_surface_and_caller_can_resync() {
    let mut lcd = ready_lcd();
    {
        let bus = lcd.driver_mut().expander_mut().bus_mut();
        *bus = std::mem::take(bus).fail_from(0);
    }

    let err = lcd.write_text("lost").unwrap_err();
    assert!(err.is_transport());
    assert_eq!(lcd.state(), LcdState::Ready);

    lcd.driver_mut().expander_mut().bus_mut().recover();
    lcd.write_line("back", 1).unwrap();

    let mut expected = vec![cmd(0x02), cmd(0x80)];
    expected.extend(data(&" ".repeat(16)));
    expected.push(cmd(0x80));
    expected.extend(data("back"));
    assert_eq!(sent(&lcd), expected);
}
