// src/services/deep_link.rs

//! Best-effort resolution of a listing page into its "real" target link:
//! the edital document or the exam board's inscription page.

use std::time::Duration;

use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{FetcherConfig, LinksConfig};
use crate::utils::url::resolve;

/// Which deep link the caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// The official announcement document, ideally a PDF
    Edital,
    /// The exam board's inscription/application page
    Inscricao,
}

impl LinkKind {
    /// Parse a user-supplied kind name.
    pub fn parse(s: &str) -> Option<Self> {
        match crate::extract::normalize(s).as_str() {
            "edital" => Some(Self::Edital),
            "inscricao" => Some(Self::Inscricao),
            _ => None,
        }
    }
}

/// Resolves listing source pages into edital/inscription links.
///
/// Never fails: any fetch or parse problem resolves to the input URL, which
/// the caller can still navigate to.
pub struct DeepLinkResolver {
    client: reqwest::Client,
    links: LinksConfig,
    anchor_selector: Selector,
}

impl DeepLinkResolver {
    pub fn new(fetcher: &FetcherConfig, links: &LinksConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&fetcher.user_agent)
            .timeout(Duration::from_secs(fetcher.timeout_secs))
            .build()?;

        let anchor_selector = Selector::parse("a[href]")
            .map_err(|e| AppError::selector("a[href]", format!("{e:?}")))?;

        Ok(Self {
            client,
            links: links.clone(),
            anchor_selector,
        })
    }

    /// Resolve the deep link of `kind` for a listing's source page.
    pub async fn resolve_final_link(&self, source_url: &str, kind: LinkKind) -> String {
        match self.try_resolve(source_url, kind).await {
            Ok(Some(link)) => link,
            Ok(None) => source_url.to_string(),
            Err(e) => {
                log::warn!("Deep-link resolution failed for {source_url}: {e}");
                source_url.to_string()
            }
        }
    }

    async fn try_resolve(&self, source_url: &str, kind: LinkKind) -> Result<Option<String>> {
        let html = self
            .client
            .get(source_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let anchors = collect_anchors(&html, &self.anchor_selector);

        let found = match kind {
            LinkKind::Edital => self.pick_edital(&anchors),
            LinkKind::Inscricao => self.pick_inscricao(&anchors),
        };

        Ok(found.map(|href| resolve(source_url, &href)))
    }

    /// Edital heuristic: a PDF link wins immediately; otherwise the last
    /// anchor whose text mentions an edital term is kept as candidate.
    fn pick_edital(&self, anchors: &[(String, String)]) -> Option<String> {
        let mut candidate = None;

        for (href, text) in anchors {
            if self.is_excluded(href) {
                continue;
            }
            if href.to_lowercase().ends_with(".pdf") {
                return Some(href.clone());
            }
            if self
                .links
                .edital_terms
                .iter()
                .any(|t| text.to_lowercase().contains(t))
            {
                candidate = Some(href.clone());
            }
        }

        candidate
    }

    /// Inscription heuristic: a known exam-board name in the href or anchor
    /// text is the strongest signal; generic inscription terms are the
    /// fallback. PDFs are never inscription pages.
    fn pick_inscricao(&self, anchors: &[(String, String)]) -> Option<String> {
        for (href, text) in anchors {
            let href_l = href.to_lowercase();
            if self.is_excluded(href) || href_l.ends_with(".pdf") {
                continue;
            }
            let text_l = text.to_lowercase();
            if self
                .links
                .bancas
                .iter()
                .any(|b| href_l.contains(b) || text_l.contains(b))
            {
                return Some(href.clone());
            }
        }

        for (href, text) in anchors {
            if self.is_excluded(href) || href.to_lowercase().ends_with(".pdf") {
                continue;
            }
            let text_l = text.to_lowercase();
            if self
                .links
                .inscription_terms
                .iter()
                .any(|t| text_l.contains(&t.to_lowercase()))
            {
                return Some(href.clone());
            }
        }

        None
    }

    fn is_excluded(&self, href: &str) -> bool {
        let href_l = href.to_lowercase();
        self.links
            .excluded_domains
            .iter()
            .any(|d| href_l.contains(d))
    }
}

/// Pull (href, anchor text) pairs out of a page.
fn collect_anchors(html: &str, selector: &Selector) -> Vec<(String, String)> {
    let document = Html::parse_document(html);
    document
        .select(selector)
        .filter_map(|a| {
            let href = a.value().attr("href")?.to_string();
            let text = a.text().collect::<Vec<_>>().join(" ");
            Some((href, text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> DeepLinkResolver {
        DeepLinkResolver::new(&FetcherConfig::default(), &LinksConfig::default()).unwrap()
    }

    fn anchors(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(h, t)| (h.to_string(), t.to_string()))
            .collect()
    }

    #[test]
    fn edital_prefers_pdf() {
        let anchors = anchors(&[
            ("https://orgao.gov.br/docs", "Edital de abertura"),
            ("https://orgao.gov.br/edital_01.PDF", "baixar"),
        ]);
        assert_eq!(
            resolver().pick_edital(&anchors).as_deref(),
            Some("https://orgao.gov.br/edital_01.PDF")
        );
    }

    #[test]
    fn edital_falls_back_to_term_match() {
        let anchors = anchors(&[
            ("https://orgao.gov.br/home", "Página inicial"),
            ("https://orgao.gov.br/doc/3", "Edital de Abertura nº 3"),
        ]);
        assert_eq!(
            resolver().pick_edital(&anchors).as_deref(),
            Some("https://orgao.gov.br/doc/3")
        );
    }

    #[test]
    fn social_links_are_never_picked() {
        let anchors = anchors(&[("https://facebook.com/share?u=edital.pdf", "edital")]);
        assert_eq!(resolver().pick_edital(&anchors), None);
    }

    #[test]
    fn inscricao_prefers_known_banca() {
        let anchors = anchors(&[
            ("https://orgao.gov.br/inscricao", "Faça sua inscrição"),
            ("https://www.vunesp.com.br/PMSP2401", "página do certame"),
        ]);
        assert_eq!(
            resolver().pick_inscricao(&anchors).as_deref(),
            Some("https://www.vunesp.com.br/PMSP2401")
        );
    }

    #[test]
    fn inscricao_falls_back_to_strong_terms() {
        let anchors = anchors(&[
            ("https://orgao.gov.br/concursos", "Inscrições abertas aqui"),
            ("https://orgao.gov.br/edital.pdf", "edital"),
        ]);
        assert_eq!(
            resolver().pick_inscricao(&anchors).as_deref(),
            Some("https://orgao.gov.br/concursos")
        );
    }

    #[test]
    fn inscricao_never_picks_pdf() {
        let anchors = anchors(&[("https://orgao.gov.br/inscricao.pdf", "ficha de inscrição")]);
        assert_eq!(resolver().pick_inscricao(&anchors), None);
    }

    #[test]
    fn kind_parse() {
        assert_eq!(LinkKind::parse("edital"), Some(LinkKind::Edital));
        assert_eq!(LinkKind::parse("Inscrição"), Some(LinkKind::Inscricao));
        assert_eq!(LinkKind::parse("outro"), None);
    }
}
