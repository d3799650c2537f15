pub mod temperature {
    pub const SUFFIX: &str = "°C";

    /// Whole degrees print without a trailing `.0`.
    pub fn celsius(temp_c: f64) -> String {
        if temp_c.fract() == 0.0 {
            format!("{temp_c:.0}{SUFFIX}")
        } else {
            format!("{temp_c:.1}{SUFFIX}")
        }
    }

    #[test]
    fn test_celsius() {
        assert_eq!(celsius(18.0), "18°C");
        assert_eq!(celsius(-3.0), "-3°C");
        assert_eq!(celsius(22.4), "22.4°C");
    }
}

pub mod humidity {
    pub fn percent(humidity: u32) -> String {
        format!("{humidity}%")
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(60), "60%");
        assert_eq!(percent(0), "0%");
    }
}

/// Parsing of the optional numeric form fields.
///
/// Blank text means "not supplied"; anything else must parse.
pub mod input {
    pub fn optional_number<T: std::str::FromStr>(text: &str) -> Result<Option<T>, T::Err> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        text.parse().map(Some)
    }

    pub fn optional_text(text: &str) -> Option<String> {
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    #[test]
    fn test_optional_number() {
        assert_eq!(optional_number::<f64>("  "), Ok(None));
        assert_eq!(optional_number::<f64>(" 18.5 "), Ok(Some(18.5)));
        assert_eq!(optional_number::<u32>("60"), Ok(Some(60)));
        assert!(optional_number::<u32>("sixty").is_err());
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(" "), None);
        assert_eq!(optional_text(" Light rain "), Some("Light rain".to_string()));
    }
}
