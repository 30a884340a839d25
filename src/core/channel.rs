use std::fmt::{Display, Formatter};

/// Single measurement stream: a metering point and an OBIS code.
#[must_use]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Channel {
    pub metering_point: String,
    pub obis_code: String,
}

impl Channel {
    pub fn new(metering_point: impl Into<String>, obis_code: impl Into<String>) -> Self {
        Self { metering_point: metering_point.into(), obis_code: obis_code.into() }
    }

    /// Build the statistic ID for the series of this channel, for example:
    /// `sensor.lu0000010637000000000000070232342_1_1_1_29_0_pwr_15min`.
    #[must_use]
    pub fn statistic_id(&self, suffix: &str) -> String {
        let slug = slugify(&format!("{}_{}_{suffix}", self.metering_point, self.obis_code));
        format!("sensor.{slug}")
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.metering_point, self.obis_code)
    }
}

/// Lowercase the text and collapse every run of non-alphanumeric characters into `_`.
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for char_ in text.chars() {
        if char_.is_ascii_alphanumeric() {
            slug.push(char_.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}
