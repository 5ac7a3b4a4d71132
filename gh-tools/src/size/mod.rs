//! Human readable byte sizes.
//!
//! Parses strings such as `500mb`, `18 Tib` or `5 EiB` into byte counts and
//! formats byte counts back into `1.0 kB` / `1.0 KiB` style strings.

mod error;

pub use error::SizeError;

pub const BYTE: u64 = 1;

pub const KIBYTE: u64 = BYTE << 10;
pub const MIBYTE: u64 = BYTE << 20;
pub const GIBYTE: u64 = BYTE << 30;
pub const TIBYTE: u64 = BYTE << 40;
pub const PIBYTE: u64 = BYTE << 50;
pub const EIBYTE: u64 = BYTE << 60;

pub const KBYTE: u64 = BYTE * 1000;
pub const MBYTE: u64 = KBYTE * 1000;
pub const GBYTE: u64 = MBYTE * 1000;
pub const TBYTE: u64 = GBYTE * 1000;
pub const PBYTE: u64 = TBYTE * 1000;
pub const EBYTE: u64 = PBYTE * 1000;

const DECIMAL_UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];
const BINARY_UNITS: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// Formats a byte count using decimal (power of 1000) units.
///
/// ```
/// assert_eq!(gh_tools::size::format_bytes(1999), "2.0 kB");
/// ```
#[must_use]
pub fn format_bytes(value: u64) -> String {
    format(value, KBYTE, &DECIMAL_UNITS)
}

/// Formats a byte count using binary (power of 1024) units.
#[must_use]
pub fn format_ibytes(value: u64) -> String {
    format(value, KIBYTE, &BINARY_UNITS)
}

fn format(value: u64, base: u64, units: &[&str]) -> String {
    if value < base {
        return format!("{value} {}", units[0]);
    }

    let mut div = base;
    let mut exp = 0;
    let mut rest = value / base;
    while rest >= base {
        div *= base;
        exp += 1;
        rest /= base;
    }

    format!("{:.1} {}", value as f64 / div as f64, units[exp + 1])
}

/// Parses a human readable size into a number of bytes.
///
/// The input is an optional run of decimal digits followed by an optional
/// unit. A missing number counts as one, so `"kb"` is 1000 bytes. An empty
/// input is zero.
///
/// # Errors
///
/// Returns [`SizeError::Syntax`] for unknown units, signs, or values that
/// overflow a `u64`.
pub fn parse(input: &str) -> Result<u64, SizeError> {
    if input.is_empty() {
        return Ok(0);
    }

    let digits = input.bytes().take_while(u8::is_ascii_digit).count();
    let (number, unit) = input.split_at(digits);

    let number = if number.is_empty() {
        1
    } else {
        number.parse::<u64>().map_err(|_| SizeError::Syntax)?
    };

    let unit = unit_multiplier(&unit.trim().to_lowercase()).ok_or(SizeError::Syntax)?;

    number.checked_mul(unit).ok_or(SizeError::Syntax)
}

fn unit_multiplier(unit: &str) -> Option<u64> {
    let multiplier = match unit {
        "" | "b" => BYTE,
        "k" | "kb" => KBYTE,
        "m" | "mb" => MBYTE,
        "g" | "gb" => GBYTE,
        "t" | "tb" => TBYTE,
        "p" | "pb" => PBYTE,
        "e" | "eb" => EBYTE,
        "ki" | "kib" => KIBYTE,
        "mi" | "mib" => MIBYTE,
        "gi" | "gib" => GIBYTE,
        "ti" | "tib" => TIBYTE,
        "pi" | "pib" => PIBYTE,
        "ei" | "eib" => EIBYTE,
        _ => return None,
    };
    Some(multiplier)
}
