//! Post categories and keyword-based classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Keyword groups checked in priority order; the first group with a hit wins.
const FUND_KEYWORDS: &[&str] = &["fund", "mutual", "trust", "kabu"];
const LIFE_PLAN_KEYWORDS: &[&str] = &["life", "plan", "retire"];

/// One of the four fixed content classifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    NisaStartGuide,
    MutualFund,
    LifePlan,
    Region,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::NisaStartGuide,
        Category::MutualFund,
        Category::LifePlan,
        Category::Region,
    ];

    /// Classify a document by its file name and content.
    ///
    /// Matching is a case-insensitive substring test against either input.
    ///
    /// # Examples
    ///
    /// ```
    /// use autoblog_core::Category;
    ///
    /// assert_eq!(Category::classify("NISA_basics.txt", ""), Category::NisaStartGuide);
    /// assert_eq!(Category::classify("memo.txt", "index fund"), Category::MutualFund);
    /// assert_eq!(Category::classify("memo.txt", "地方の話"), Category::Region);
    /// ```
    pub fn classify(file_name: &str, content: &str) -> Self {
        let file_name = file_name.to_lowercase();
        let content = content.to_lowercase();
        let mentions = |keyword: &str| file_name.contains(keyword) || content.contains(keyword);

        if mentions("nisa") {
            Category::NisaStartGuide
        } else if FUND_KEYWORDS.iter().any(|k| mentions(k)) {
            Category::MutualFund
        } else if LIFE_PLAN_KEYWORDS.iter().any(|k| mentions(k)) {
            Category::LifePlan
        } else {
            Category::Region
        }
    }

    /// Slug prefix, also used as the CLI value
    pub fn slug(&self) -> &'static str {
        match self {
            Category::NisaStartGuide => "nisa-start-guide",
            Category::MutualFund => "mutual-fund",
            Category::LifePlan => "life-plan",
            Category::Region => "region",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::NisaStartGuide => "新NISA",
            Category::MutualFund => "投資信託",
            Category::LifePlan => "ライフプラン",
            Category::Region => "地域別資産運用",
        }
    }

    /// Listing page under the blog directory
    pub fn page_file(&self) -> &'static str {
        match self {
            Category::NisaStartGuide => "category-nisa.html",
            Category::MutualFund => "category-mutual-fund.html",
            Category::LifePlan => "category-life-plan.html",
            Category::Region => "category-region.html",
        }
    }

    /// Section marker in blog/index.html after which new cards go
    pub fn index_marker(&self) -> &'static str {
        match self {
            Category::NisaStartGuide => "<!-- NISA 系（日付降順） -->",
            _ => "<!-- 投資信託 系 -->",
        }
    }

    pub fn from_slug(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slug() == s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nisa_in_file_name_wins_over_content() {
        let content = "投資信託 fund の話と retire 後の生活";
        assert_eq!(Category::classify("2026_NISA.txt", content), Category::NisaStartGuide);
        assert_eq!(Category::classify("new-nisa.txt", content), Category::NisaStartGuide);
        assert_eq!(Category::classify("NiSa.md", ""), Category::NisaStartGuide);
    }

    #[test]
    fn test_nisa_in_content() {
        assert_eq!(
            Category::classify("script.txt", "新NISAの始め方"),
            Category::NisaStartGuide
        );
    }

    #[test]
    fn test_priority_order() {
        // fund beats life-plan keywords
        assert_eq!(
            Category::classify("retire_plan.txt", "Mutual funds"),
            Category::MutualFund
        );
        assert_eq!(Category::classify("kabu.txt", ""), Category::MutualFund);
        assert_eq!(Category::classify("life.txt", ""), Category::LifePlan);
        assert_eq!(Category::classify("memo.txt", "Retirement"), Category::LifePlan);
    }

    #[test]
    fn test_default_region() {
        assert_eq!(Category::classify("北海道.txt", "札幌の話"), Category::Region);
    }

    #[test]
    fn test_slug_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_slug(category.slug()), Some(category));
        }
        assert_eq!(Category::from_slug("nisa"), None);
    }

    #[test]
    fn test_index_marker_fallback() {
        assert_eq!(Category::NisaStartGuide.index_marker(), "<!-- NISA 系（日付降順） -->");
        assert_eq!(Category::LifePlan.index_marker(), "<!-- 投資信託 系 -->");
        assert_eq!(Category::Region.index_marker(), "<!-- 投資信託 系 -->");
    }
}
