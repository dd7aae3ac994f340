use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::validation::{has_min_chars, is_valid_url, is_valid_year, parse_absolute_url};

use super::section::{FieldError, SectionContext, SectionKind, SectionModel};

/// Campaign month the invoice bills for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// 1-based month number.
    pub fn number(self) -> u32 {
        Month::ALL
            .iter()
            .position(|month| *month == self)
            .map(|index| index as u32 + 1)
            .unwrap_or(1)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Month {
    type Err = String;

    /// Accepts the full name, a three-letter prefix, or the month number.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if let Ok(number) = trimmed.parse::<usize>() {
            if (1..=12).contains(&number) {
                return Ok(Month::ALL[number - 1]);
            }
        }
        let lowered = trimmed.to_ascii_lowercase();
        Month::ALL
            .iter()
            .copied()
            .find(|month| {
                let name = month.name().to_ascii_lowercase();
                name == lowered || (lowered.len() == 3 && name.starts_with(&lowered))
            })
            .ok_or_else(|| format!("Unknown month `{}`", trimmed))
    }
}

/// Brand engagement the invoice is raised against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignInfo {
    pub poc_name: String,
    pub profile_link: String,
    pub brand_name: String,
    pub product_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<Month>,
    pub year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl CampaignInfo {
    /// Fills `username` from the last path segment of `profile_link`.
    ///
    /// Links that do not parse, or that carry no path segment, leave the
    /// current value untouched.
    pub fn derive_username(&mut self) {
        if let Some(segment) = last_path_segment(&self.profile_link) {
            self.username = Some(segment);
        }
    }
}

fn last_path_segment(link: &str) -> Option<String> {
    let url = parse_absolute_url(link.trim())?;
    url.path_segments()?
        .rfind(|segment| !segment.is_empty())
        .map(str::to_string)
}

impl SectionModel for CampaignInfo {
    const KIND: SectionKind = SectionKind::Campaign;
    const FIELDS: &'static [&'static str] = &[
        "pocName",
        "profileLink",
        "brandName",
        "productName",
        "description",
        "month",
        "year",
    ];

    fn field_errors(&self, _ctx: &SectionContext<'_>) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if !has_min_chars(&self.poc_name, 2) {
            errors.push(FieldError::new("pocName", "POC name is required"));
        }
        if !is_valid_url(self.profile_link.trim()) {
            errors.push(FieldError::new("profileLink", "Please enter a valid URL"));
        }
        if !has_min_chars(&self.brand_name, 2) {
            errors.push(FieldError::new("brandName", "Brand name is required"));
        }
        if !has_min_chars(&self.product_name, 2) {
            errors.push(FieldError::new("productName", "Product name is required"));
        }
        if self.month.is_none() {
            errors.push(FieldError::new("month", "Campaign month is required"));
        }
        if !is_valid_year(self.year.trim()) {
            errors.push(FieldError::new("year", "Enter a four-digit year"));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign() -> CampaignInfo {
        CampaignInfo {
            poc_name: "Meera".into(),
            profile_link: "https://instagram.com/asha.creates".into(),
            brand_name: "Glow Co".into(),
            product_name: "Sunscreen".into(),
            description: None,
            month: Some(Month::March),
            year: "2025".into(),
            username: None,
        }
    }

    #[test]
    fn valid_campaign_passes_without_description() {
        assert!(campaign().validate(&SectionContext::default()).is_ok());
    }

    #[test]
    fn invalid_link_and_missing_month_are_reported() {
        let mut info = campaign();
        info.profile_link = "instagram.com/asha".into();
        info.month = None;
        let errors = info.validate(&SectionContext::default()).unwrap_err();
        assert!(errors.for_field("profileLink").is_some());
        assert!(errors.for_field("month").is_some());
        assert_eq!(errors.errors.len(), 2);
    }

    #[test]
    fn username_comes_from_last_path_segment() {
        let mut info = campaign();
        info.profile_link = "https://www.instagram.com/asha.creates/?hl=en".into();
        info.derive_username();
        assert_eq!(info.username.as_deref(), Some("asha.creates"));
    }

    #[test]
    fn username_is_derived_from_links_with_userinfo() {
        let mut info = campaign();
        info.profile_link = "https://asha@instagram.com/asha.creates".into();
        assert!(info.validate(&SectionContext::default()).is_ok());
        info.derive_username();
        assert_eq!(info.username.as_deref(), Some("asha.creates"));
    }

    #[test]
    fn username_derivation_is_silent_on_bad_links() {
        let mut info = campaign();
        info.username = Some("kept".into());
        info.profile_link = "not a link".into();
        info.derive_username();
        assert_eq!(info.username.as_deref(), Some("kept"));

        info.profile_link = "https://instagram.com".into();
        info.derive_username();
        assert_eq!(info.username.as_deref(), Some("kept"));
    }

    #[test]
    fn month_parses_names_prefixes_and_numbers() {
        assert_eq!("march".parse::<Month>(), Ok(Month::March));
        assert_eq!("Sep".parse::<Month>(), Ok(Month::September));
        assert_eq!("12".parse::<Month>(), Ok(Month::December));
        assert!("13".parse::<Month>().is_err());
        assert_eq!(Month::October.number(), 10);
    }
}
