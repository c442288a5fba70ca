//! Duration conversions between edit-time and wire representations.
//!
//! The backend stores durations as whole seconds. Edit forms accept either
//! whole minutes ("15") or a clock string ("0:15:00"); list and detail
//! views render whole minutes. Whole-minute values survive every round
//! trip unchanged.

/// Parse a colon-delimited clock string ("H:MM:SS") into whole seconds.
pub fn parse_clock(s: &str) -> Option<u32> {
  let parts: Vec<&str> = s.split(':').collect();
  if parts.len() != 3 {
    return None;
  }
  let hours: u32 = parts[0].trim().parse().ok()?;
  let minutes: u32 = parts[1].trim().parse().ok()?;
  let seconds: u32 = parts[2].trim().parse().ok()?;
  Some(hours * 3600 + minutes * 60 + seconds)
}

/// Format whole seconds as a clock string ("H:MM:SS").
pub fn format_clock(seconds: u32) -> String {
  format!(
    "{}:{:02}:{:02}",
    seconds / 3600,
    (seconds % 3600) / 60,
    seconds % 60
  )
}

/// Convert an edit-time duration value to wire seconds.
///
/// Accepts a clock string ("0:15:00") or a bare whole-minute count ("15").
/// Blank or unparsable input maps to None, which is sent as null.
pub fn edit_value_to_seconds(value: &str) -> Option<u32> {
  let value = value.trim();
  if value.is_empty() {
    return None;
  }
  if value.contains(':') {
    return parse_clock(value);
  }
  value.parse::<u32>().ok().map(minutes_to_seconds)
}

pub fn minutes_to_seconds(minutes: u32) -> u32 {
  minutes * 60
}

/// Whole minutes for display. Values produced by the minute-based edit
/// path divide evenly; anything else truncates leftover seconds.
pub fn seconds_to_minutes(seconds: u32) -> u32 {
  seconds / 60
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_clock() {
    assert_eq!(parse_clock("0:15:00"), Some(900));
    assert_eq!(parse_clock("1:30:05"), Some(5405));
    assert_eq!(parse_clock("0:00:00"), Some(0));
    assert_eq!(parse_clock("15:00"), None);
    assert_eq!(parse_clock("a:b:c"), None);
  }

  #[test]
  fn test_format_clock() {
    assert_eq!(format_clock(900), "0:15:00");
    assert_eq!(format_clock(5405), "1:30:05");
    assert_eq!(format_clock(0), "0:00:00");
  }

  #[test]
  fn test_clock_round_trip() {
    for seconds in [0, 59, 900, 3600, 5405, 86399] {
      assert_eq!(parse_clock(&format_clock(seconds)), Some(seconds));
    }
  }

  #[test]
  fn test_whole_minutes_are_lossless() {
    for minutes in [0, 1, 15, 90, 600] {
      assert_eq!(seconds_to_minutes(minutes_to_seconds(minutes)), minutes);
    }
  }

  #[test]
  fn test_edit_value_to_seconds() {
    assert_eq!(edit_value_to_seconds("15"), Some(900));
    assert_eq!(edit_value_to_seconds("0:15:00"), Some(900));
    assert_eq!(edit_value_to_seconds(" 45 "), Some(2700));
    assert_eq!(edit_value_to_seconds(""), None);
    assert_eq!(edit_value_to_seconds("soon"), None);
  }
}
