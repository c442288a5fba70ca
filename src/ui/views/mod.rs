pub mod countries;
pub mod ingredients;
pub mod people;
pub mod recipes;

/// Truncate a string for a fixed-width column.
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate() {
    assert_eq!(truncate("Pierogi", 10), "Pierogi");
    assert_eq!(truncate("Transylvanian goulash", 10), "Transyl...");
  }

  #[test]
  fn test_truncate_is_char_safe() {
    assert_eq!(truncate("Пельмені по-домашньому", 10), "Пельмен...");
  }
}
