//! Record building: one raw HTML block in, one normalized record out.

use chrono::NaiveDate;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::extract::{
    extract_deadline, normalize, tokenize, EducationClassifier, RegionExtractor, SalaryExtractor,
};
use crate::models::{ExtractionConfig, ListingRecord, RawListingBlock};

/// Assembles cache-ready records from raw listing blocks.
pub struct RecordBuilder {
    salary: SalaryExtractor,
    region: RegionExtractor,
    education: EducationClassifier,
    anchor_selector: Selector,
    min_text_len: usize,
}

impl RecordBuilder {
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        let anchor_selector = Selector::parse("a[href]")
            .map_err(|e| AppError::selector("a[href]", format!("{e:?}")))?;

        Ok(Self {
            salary: SalaryExtractor::new(config)?,
            region: RegionExtractor::new(config)?,
            education: EducationClassifier::new(&config.education),
            anchor_selector,
            min_text_len: config.min_text_len,
        })
    }

    /// Build a record from one raw block, or `None` if the block is not a
    /// usable listing.
    ///
    /// Rejected: blocks whose visible text is shorter than the configured
    /// minimum (decorative markup), blocks with no anchor link, and listings
    /// whose deadline already passed; those never enter the cache. A block
    /// where only individual field extraction fails still yields a record
    /// with the corresponding sentinel values.
    pub fn build(&self, block: &RawListingBlock, reference: NaiveDate) -> Option<ListingRecord> {
        let fragment = Html::parse_fragment(&block.html);

        let text = collapse_whitespace(&fragment.root_element().text().collect::<Vec<_>>());
        if text.chars().count() < self.min_text_len {
            return None;
        }

        let link = fragment
            .select(&self.anchor_selector)
            .next()
            .and_then(|a| a.value().attr("href"))?
            .to_string();

        let deadline = extract_deadline(&text, reference);
        if deadline.is_some_and(|d| d < reference) {
            return None;
        }

        let normalized_text = normalize(&text);
        let tokens = tokenize(&normalized_text);
        let education_levels = self.education.classify(&normalized_text);
        let salary = self.salary.extract(&text);
        let region = self.region.extract(&text);

        Some(ListingRecord {
            text,
            normalized_text,
            tokens,
            education_levels,
            link,
            salary,
            deadline,
            region,
        })
    }

    /// Build records for a whole fetch batch.
    ///
    /// Deduplicates by link (the first occurrence wins) and orders the batch
    /// by salary descending, the order every snapshot carries.
    pub fn build_all(
        &self,
        blocks: &[RawListingBlock],
        reference: NaiveDate,
    ) -> Vec<ListingRecord> {
        let mut seen = std::collections::HashSet::new();
        let mut records: Vec<ListingRecord> = blocks
            .iter()
            .filter_map(|block| self.build(block, reference))
            .filter(|record| seen.insert(record.link.clone()))
            .collect();

        records.sort_by(|a, b| {
            b.salary
                .partial_cmp(&a.salary)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        records
    }
}

/// Join text nodes and collapse runs of whitespace into single spaces.
fn collapse_whitespace(parts: &[&str]) -> String {
    parts
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
