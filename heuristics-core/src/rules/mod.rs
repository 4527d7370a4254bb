//! The shipped rule library.
//!
//! Rules are grouped by concern. Groups compose by plain concatenation, and the
//! order below is part of the public contract: it is the last tie-break when
//! two results share both confidence and priority.
//!
//! | Order | Group            | Widgets                                  |
//! |-------|------------------|------------------------------------------|
//! | 1     | `Layout`         | `structure:columns`, `structure:grid`    |
//! | 2     | `Section`        | hero, call to action, generic section    |
//! | 3     | `Navigation`     | header navbar, footer                    |
//! | 4     | `Typography`     | generic heading and paragraph            |
//! | 5     | `Media`          | `structure:image`                        |
//! | 6     | `ElementorBasic` | `w:*` free Elementor widgets             |
//! | 7     | `ElementorPro`   | `e:form`, `e:posts`, `e:slides`          |
//! | 8     | `WordPressCore`  | `wp:search`, `wp:recent-posts`, ...      |
//! | 9     | `WooCommerce`    | `woo:*` storefront widgets               |

pub mod layout;
pub mod media;
pub mod navigation;
pub mod sections;
pub mod typography;
pub mod util;
pub mod widgets;

use serde::{Deserialize, Serialize};

use crate::heuristic::{Rule, RuleSet};

pub use layout::LAYOUT_RULES;
pub use media::MEDIA_RULES;
pub use navigation::NAVIGATION_RULES;
pub use sections::SECTION_RULES;
pub use typography::TYPOGRAPHY_RULES;
pub use widgets::{
    ELEMENTOR_BASIC_RULES, ELEMENTOR_PRO_RULES, WOOCOMMERCE_RULES, WORDPRESS_CORE_RULES,
};

/// A named group of library rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleGroup {
    /// Column rows and grids.
    Layout,
    /// Page sections.
    Section,
    /// Headers and footers.
    Navigation,
    /// Generic text roles.
    Typography,
    /// Images.
    Media,
    /// Free Elementor widgets.
    ElementorBasic,
    /// Elementor Pro widgets.
    ElementorPro,
    /// Core WordPress widgets.
    WordPressCore,
    /// WooCommerce widgets.
    WooCommerce,
}

impl RuleGroup {
    /// Every group, in canonical composition order.
    pub const ALL: [Self; 9] = [
        Self::Layout,
        Self::Section,
        Self::Navigation,
        Self::Typography,
        Self::Media,
        Self::ElementorBasic,
        Self::ElementorPro,
        Self::WordPressCore,
        Self::WooCommerce,
    ];

    /// The rules of this group, in declaration order.
    #[must_use]
    pub const fn rules(self) -> &'static [Rule] {
        match self {
            Self::Layout => LAYOUT_RULES,
            Self::Section => SECTION_RULES,
            Self::Navigation => NAVIGATION_RULES,
            Self::Typography => TYPOGRAPHY_RULES,
            Self::Media => MEDIA_RULES,
            Self::ElementorBasic => ELEMENTOR_BASIC_RULES,
            Self::ElementorPro => ELEMENTOR_PRO_RULES,
            Self::WordPressCore => WORDPRESS_CORE_RULES,
            Self::WooCommerce => WOOCOMMERCE_RULES,
        }
    }
}

/// Compose the given groups, always in canonical order regardless of the
/// order they are listed in. Duplicates are kept once.
#[must_use]
pub fn rules_for(groups: &[RuleGroup]) -> RuleSet<'static> {
    RuleGroup::ALL
        .into_iter()
        .filter(|group| groups.contains(group))
        .fold(RuleSet::new(), |set, group| set.with_group(group.rules()))
}

/// Every shipped rule, in canonical group order.
#[must_use]
pub fn default_rules() -> RuleSet<'static> {
    rules_for(&RuleGroup::ALL)
}
