/// Webhook payloads carry empty strings where a value is absent.
pub trait OptionStrExt {
    fn non_empty(&self) -> Option<&str>;
}

impl OptionStrExt for Option<String> {
    fn non_empty(&self) -> Option<&str> {
        self.as_deref().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_empty_strings_are_absent() {
        assert_eq!(None::<String>.non_empty(), None);
        assert_eq!(Some(String::new()).non_empty(), None);
        assert_eq!(Some("  ".to_string()).non_empty(), Some("  "));
        assert_eq!(Some("x".to_string()).non_empty(), Some("x"));
    }
}
