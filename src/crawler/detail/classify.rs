//! Disclosure-only (no monetary reward) classification
//!
//! A program is reward-free when
//! 1. its overview type is explicitly a disclosure-only type, or
//! 2. its page text confirms it, which is checked whenever the overview
//!    maximum reward is null or zero, whatever the overview type says.
//!
//! A confirmed classification is authoritative: the numeric minimum and
//! maximum are overridden to zero.

use crate::extract::{parse_selector, ExtractionError};
use crate::model::Overview;
use scraper::{ElementRef, Html};

/// A page section introduced by a labelled header element
///
/// The body is the first following sibling `div` carrying the content
/// class; other siblings in between are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRule {
    /// Header elements, e.g. `div.detail-header`
    pub header: String,

    /// Text the header must contain
    pub label: String,

    /// Class of the `div` holding the section body
    pub content_class: String,
}

impl SectionRule {
    /// Returns the first header whose text contains the label
    pub fn find_header<'a>(
        &self,
        document: &'a Html,
    ) -> Result<Option<ElementRef<'a>>, ExtractionError> {
        let selector = parse_selector(&self.header)?;
        let header = document
            .select(&selector)
            .find(|header| header.text().collect::<String>().contains(&self.label));
        Ok(header)
    }

    /// Returns the section body following `header`
    pub fn content_after<'a>(&self, header: ElementRef<'a>) -> Option<ElementRef<'a>> {
        header
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|sibling| {
                sibling.value().name() == "div"
                    && sibling
                        .value()
                        .classes()
                        .any(|class| class == self.content_class)
            })
    }

    /// Returns the body of the labelled section, if the page has one
    pub fn content<'a>(
        &self,
        document: &'a Html,
    ) -> Result<Option<ElementRef<'a>>, ExtractionError> {
        Ok(self
            .find_header(document)?
            .and_then(|header| self.content_after(header)))
    }
}

/// Page text check confirming a disclosure-only program
#[derive(Debug, Clone, PartialEq)]
pub struct DisclosureCheck {
    /// Notice elements whose text is searched for the marker
    pub selectors: Vec<String>,

    /// Section whose body is searched for the marker
    pub section: Option<SectionRule>,

    /// Lowercase marker text
    pub marker: String,
}

impl DisclosureCheck {
    /// Returns true if a notice or the labelled section contains the marker
    pub fn matches(&self, html: &str) -> bool {
        let document = Html::parse_document(html);

        let in_notice = self.selectors.iter().any(|selector| {
            let Ok(parsed) = parse_selector(selector) else {
                tracing::warn!("Ignoring invalid disclosure selector '{}'", selector);
                return false;
            };
            document
                .select(&parsed)
                .any(|element| self.contains_marker(&element))
        });
        if in_notice {
            return true;
        }

        let Some(section) = &self.section else {
            return false;
        };
        match section.content(&document) {
            Ok(Some(content)) => self.contains_marker(&content),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("Ignoring disclosure section rule: {}", e);
                false
            }
        }
    }

    fn contains_marker(&self, element: &ElementRef<'_>) -> bool {
        element
            .text()
            .collect::<String>()
            .to_lowercase()
            .contains(&self.marker)
    }
}

/// Overview labels and page check used to classify a program
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationRule {
    /// Lowercase fragments marking a disclosure-only program type
    pub disclosure_labels: Vec<String>,

    /// Lowercase fragments marking a bounty program type
    pub bounty_labels: Vec<String>,

    pub check: DisclosureCheck,
}

/// What the overview alone says about a program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverviewDecision {
    /// Type explicitly labelled disclosure-only
    DisclosureLabelled,

    /// Positive maximum reward
    Rewarded,

    /// Null/zero maximum; the page must be checked before deciding
    NeedsConfirmation {
        /// Overview type explicitly says "bounty"
        bounty_labelled: bool,
    },
}

impl ClassificationRule {
    /// Classifies a program from its listing overview
    pub fn decide(&self, overview: &Overview) -> OverviewDecision {
        let program_type = overview
            .program_type
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();

        if self
            .disclosure_labels
            .iter()
            .any(|label| program_type.contains(label.as_str()))
        {
            return OverviewDecision::DisclosureLabelled;
        }

        let has_reward = overview
            .max_bounty
            .map(|max| max.is_positive())
            .unwrap_or(false);
        if has_reward {
            return OverviewDecision::Rewarded;
        }

        OverviewDecision::NeedsConfirmation {
            bounty_labelled: self
                .bounty_labels
                .iter()
                .any(|label| program_type.contains(label.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Amount;

    fn rule() -> ClassificationRule {
        ClassificationRule {
            disclosure_labels: vec!["responsible disclosure".to_string()],
            bounty_labels: vec!["bug bounty".to_string()],
            check: DisclosureCheck {
                selectors: vec!["p.responsible-disclosure".to_string()],
                section: Some(SectionRule {
                    header: "div.detail-header".to_string(),
                    label: "Bounties".to_string(),
                    content_class: "detail-content".to_string(),
                }),
                marker: "responsible disclosure program without bounties".to_string(),
            },
        }
    }

    fn overview(program_type: &str, max: Option<Amount>) -> Overview {
        Overview {
            program_type: Some(program_type.to_string()),
            max_bounty: max,
            ..Overview::default()
        }
    }

    #[test]
    fn test_disclosure_label_is_decisive() {
        let decision = rule().decide(&overview(
            "Responsible Disclosure",
            Some(Amount::Integer(1000)),
        ));
        assert_eq!(decision, OverviewDecision::DisclosureLabelled);
    }

    #[test]
    fn test_positive_maximum_is_rewarded() {
        let decision = rule().decide(&overview("Bug bounty", Some(Amount::Integer(5000))));
        assert_eq!(decision, OverviewDecision::Rewarded);
    }

    #[test]
    fn test_bounty_type_with_zero_maximum_needs_confirmation() {
        let decision = rule().decide(&overview("bug bounty", Some(Amount::zero())));
        assert_eq!(
            decision,
            OverviewDecision::NeedsConfirmation {
                bounty_labelled: true
            }
        );
    }

    #[test]
    fn test_untyped_missing_maximum_needs_confirmation() {
        let decision = rule().decide(&Overview::default());
        assert_eq!(
            decision,
            OverviewDecision::NeedsConfirmation {
                bounty_labelled: false
            }
        );
    }

    #[test]
    fn test_check_matches_notice() {
        let html = r#"<p class="responsible-disclosure">This is a Responsible Disclosure Program without bounties.</p>"#;
        assert!(rule().check.matches(html));
    }

    #[test]
    fn test_check_matches_section_text() {
        let html = r#"<div class="detail-header">Bounties</div>
            <div class="detail-content"><span>Responsible disclosure program</span> <span>without bounties</span></div>"#;
        assert!(rule().check.matches(html));
    }

    #[test]
    fn test_check_ignores_text_elsewhere() {
        let html = r#"<footer>responsible disclosure program without bounties</footer>
            <p class="responsible-disclosure">Rewards up to 5000</p>"#;
        assert!(!rule().check.matches(html));
    }

    #[test]
    fn test_check_skips_siblings_between_header_and_section() {
        let html = r#"<div class="detail-header">Bounties</div>
            <div class="detail-subheader">Rewards</div>
            <p>Read the policy first.</p>
            <div class="detail-content">Responsible disclosure program without bounties</div>"#;
        assert!(rule().check.matches(html));
    }

    #[test]
    fn test_check_ignores_marker_in_other_sections() {
        let html = r#"<div class="detail-header">FAQ</div>
            <div class="detail-content">What is a responsible disclosure program without bounties?</div>
            <div class="detail-header">Bounties</div>
            <div class="detail-content">Up to 5000 EUR</div>"#;
        assert!(!rule().check.matches(html));
    }

    #[test]
    fn test_section_content_after_labelled_header() {
        let section = rule().check.section.unwrap();
        let document = Html::parse_document(
            r#"<div class="detail-header">Scope</div><div class="detail-content">Web</div>
               <div class="detail-header">Bounties</div><span>-</span>
               <div class="detail-content">Tiers</div>"#,
        );

        let content = section.content(&document).unwrap().unwrap();
        assert_eq!(content.text().collect::<String>(), "Tiers");
    }
}
