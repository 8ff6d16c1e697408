/// Default key expression prefix for all HueSight data.
pub const KEY_PREFIX: &str = "huesight";

/// Builder for HueSight key expressions.
///
/// Record keys follow the pattern:
/// `<prefix>/<source>/<measurement>/<device>`
#[derive(Debug, Clone)]
pub struct KeyExprBuilder {
    prefix: String,
}

impl Default for KeyExprBuilder {
    fn default() -> Self {
        Self::new(KEY_PREFIX)
    }
}

impl KeyExprBuilder {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Build the key for one record.
    ///
    /// `source` and `device` are free-form names and get sanitized.
    ///
    /// # Example
    /// ```
    /// use huesight_common::keyexpr::KeyExprBuilder;
    ///
    /// let builder = KeyExprBuilder::new("huesight/hue");
    /// let key = builder.build("192.168.1.2", "huebridge_light", "Lamp 1");
    /// assert_eq!(key, "huesight/hue/192.168.1.2/huebridge_light/Lamp_1");
    /// ```
    pub fn build(&self, source: &str, measurement: &str, device: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.prefix,
            sanitize_segment(source),
            measurement,
            sanitize_segment(device)
        )
    }

    /// Key for bridge status messages.
    pub fn status_key(&self) -> String {
        format!("{}/@/status", self.prefix)
    }

    /// Key for bridge error reports.
    pub fn errors_key(&self) -> String {
        format!("{}/@/errors", self.prefix)
    }
}

/// Make a free-form name usable as a single key expression chunk.
///
/// Separators, wildcard characters and whitespace become `_`; an empty name
/// becomes `_`.
pub fn sanitize_segment(name: &str) -> String {
    if name.is_empty() {
        return "_".to_string();
    }
    name.chars()
        .map(|c| match c {
            '/' | '*' | '$' | '#' | '?' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_builder() {
        let builder = KeyExprBuilder::default();

        assert_eq!(
            builder.build("bridge", "huebridge_motion", "Motion sensor"),
            "huesight/bridge/huebridge_motion/Motion_sensor"
        );
        assert_eq!(builder.status_key(), "huesight/@/status");
        assert_eq!(builder.errors_key(), "huesight/@/errors");
    }

    #[test]
    fn test_sanitize_segment() {
        assert_eq!(sanitize_segment("Lamp 1"), "Lamp_1");
        assert_eq!(sanitize_segment("a/b*c"), "a_b_c");
        assert_eq!(sanitize_segment("<undefined>"), "<undefined>");
        assert_eq!(sanitize_segment(""), "_");
    }
}
