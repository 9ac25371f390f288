//! Split configuration: the criterion, its threshold and their validation.
//!
//! [`SplitMode`] is the typed configuration; the `parse_*` helpers map the
//! string surface an embedding application exposes (a "split unit" plus a
//! threshold value) onto it.

use std::time::Duration;

use crate::errors::ConfigError;

/// Criterion deciding where a capture is cut into chunks.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SplitMode {
    /// New chunk every `n` packets.
    PacketCount(u64),
    /// New chunk when a packet would push the chunk body over `budget`
    /// bytes. The triggering packet opens the next chunk; a packet never
    /// spans two chunks.
    ChunkSize(u64),
    /// New chunk when a packet's timestamp leaves the current window.
    /// Windows are fixed-width and anchored at the first packet of the whole
    /// capture.
    TimeWindow(Duration),
}

impl SplitMode {
    /// Checks the threshold. Called before any reading begins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            SplitMode::PacketCount(0) => Err(ConfigError::ZeroPacketCount),
            SplitMode::ChunkSize(0) => Err(ConfigError::ZeroChunkSize),
            SplitMode::TimeWindow(width) if width.is_zero() => Err(ConfigError::ZeroTimeWindow(width)),
            _ => Ok(()),
        }
    }
}

/// Parses a split unit name and its threshold into a validated [`SplitMode`].
///
/// Units: `count`/`packets`, `size`/`bytes`, `time`/`duration`.
pub fn parse_split_mode(unit: &str, threshold: &str) -> Result<SplitMode, ConfigError> {
    let mode = match unit.trim().to_ascii_lowercase().as_str() {
        "count" | "packets" => SplitMode::PacketCount(parse_count(threshold)?),
        "size" | "bytes" => SplitMode::ChunkSize(parse_size(threshold)?),
        "time" | "duration" => SplitMode::TimeWindow(parse_duration(threshold)?),
        _ => return Err(ConfigError::UnknownSplitUnit(unit.to_string())),
    };

    mode.validate()?;
    Ok(mode)
}

/// Parses a packet count threshold.
pub fn parse_count(value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidThreshold { unit: "count", value: value.to_string() })
}

/// Parses a byte size threshold, with an optional `B`/`KB`/`MB`/`GB` suffix
/// (powers of 1024).
pub fn parse_size(value: &str) -> Result<u64, ConfigError> {
    let invalid = || ConfigError::InvalidThreshold { unit: "size", value: value.to_string() };

    let trimmed = value.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, suffix) = trimmed.split_at(split);

    let number: u64 = digits.parse().map_err(|_| invalid())?;
    let multiplier: u64 = match suffix.trim().to_ascii_uppercase().as_str() {
        "" | "B" => 1,
        "KB" => 1024,
        "MB" => 1024 * 1024,
        "GB" => 1024 * 1024 * 1024,
        _ => return Err(invalid()),
    };

    number.checked_mul(multiplier).ok_or_else(invalid)
}

/// Parses a duration threshold, with an optional `ms`/`s`/`m`/`h` suffix.
/// A bare number is seconds.
pub fn parse_duration(value: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidThreshold { unit: "time", value: value.to_string() };

    let trimmed = value.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, suffix) = trimmed.split_at(split);

    let number: u64 = digits.parse().map_err(|_| invalid())?;
    let duration = match suffix.trim().to_ascii_lowercase().as_str() {
        "ms" => Duration::from_millis(number),
        "" | "s" => Duration::from_secs(number),
        "m" => Duration::from_secs(number.checked_mul(60).ok_or_else(invalid)?),
        "h" => Duration::from_secs(number.checked_mul(3600).ok_or_else(invalid)?),
        _ => return Err(invalid()),
    };

    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_units_and_thresholds() {
        assert_eq!(parse_split_mode("count", "1000").unwrap(), SplitMode::PacketCount(1000));
        assert_eq!(parse_split_mode("Size", "10 MB").unwrap(), SplitMode::ChunkSize(10 * 1024 * 1024));
        assert_eq!(parse_split_mode("size", "512").unwrap(), SplitMode::ChunkSize(512));
        assert_eq!(
            parse_split_mode("time", "250ms").unwrap(),
            SplitMode::TimeWindow(Duration::from_millis(250))
        );
        assert_eq!(
            parse_split_mode("duration", "5m").unwrap(),
            SplitMode::TimeWindow(Duration::from_secs(300))
        );
    }

    #[test]
    fn rejects_unknown_unit() {
        let err = parse_split_mode("flows", "10").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSplitUnit(_)));
    }

    #[test]
    fn rejects_zero_thresholds() {
        assert!(matches!(parse_split_mode("count", "0"), Err(ConfigError::ZeroPacketCount)));
        assert!(matches!(parse_split_mode("size", "0"), Err(ConfigError::ZeroChunkSize)));
        assert!(matches!(parse_split_mode("time", "0s"), Err(ConfigError::ZeroTimeWindow(_))));

        assert!(SplitMode::PacketCount(1).validate().is_ok());
    }

    #[test]
    fn rejects_garbage_thresholds() {
        assert!(matches!(parse_count("ten"), Err(ConfigError::InvalidThreshold { unit: "count", .. })));
        assert!(matches!(parse_size("10 XB"), Err(ConfigError::InvalidThreshold { unit: "size", .. })));
        assert!(matches!(parse_duration("-5s"), Err(ConfigError::InvalidThreshold { unit: "time", .. })));
    }
}
