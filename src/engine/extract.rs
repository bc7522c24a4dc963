// src/engine/extract.rs
use scraper::{ElementRef, Html, Selector};

use super::types::{FieldRule, Pick, Probe, SiteSpec};
use crate::core::sanitize::normalize_ws;
use crate::error::FieldError;
use crate::model::{ListingTotals, RawReview};

/// What one rendered page yielded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageExtract {
    pub reviews: Vec<RawReview>,
    pub totals: ListingTotals,
    /// Fields that came back null across all cards.
    pub field_misses: usize,
}

struct CompiledRule<'a> {
    rule: &'a FieldRule,
    selectors: Vec<(&'static str, Option<Selector>)>,
}

/// Read every review card (and the listing totals) out of a page snapshot.
///
/// Pure: no browser, no I/O. A field that cannot be read becomes `None` on that
/// card only; cards with no readable field at all are dropped.
pub fn extract_page(spec: &SiteSpec, html: &str) -> PageExtract {
    let doc = Html::parse_document(html);
    let mut out = PageExtract::default();

    let Ok(card_sel) = Selector::parse(spec.card) else {
        loge!("{}: invalid card selector `{}`", spec.source, spec.card);
        return out;
    };

    let rules: Vec<CompiledRule> = spec
        .fields
        .iter()
        .map(|rule| CompiledRule {
            rule,
            selectors: rule.selectors.iter().map(|s| (*s, Selector::parse(s).ok())).collect(),
        })
        .collect();

    let mut blank_cards = 0;
    for card in doc.select(&card_sel) {
        let mut review = RawReview::default();
        for compiled in &rules {
            match read_field(card, compiled) {
                Ok(v) => review.set(compiled.rule.field, Some(v)),
                Err(e) => {
                    out.field_misses += 1;
                    logd!("{}: {e}", spec.source);
                }
            }
        }
        if review.is_empty() {
            blank_cards += 1;
        } else {
            out.reviews.push(review);
        }
    }
    if blank_cards > 0 {
        logd!("{}: skipped {blank_cards} card(s) with no readable field", spec.source);
    }

    let root = doc.root_element();
    out.totals = ListingTotals {
        rating: spec.totals.rating.as_ref().and_then(|p| probe(root, p)),
        reviews: spec.totals.reviews.as_ref().and_then(|p| probe(root, p)),
    };
    out
}

fn read_field(card: ElementRef<'_>, compiled: &CompiledRule<'_>) -> Result<String, FieldError> {
    let field = compiled.rule.field;
    let mut parts = Vec::with_capacity(compiled.selectors.len());

    for (src, sel) in &compiled.selectors {
        let sel = sel.as_ref().ok_or(FieldError::Selector { field, selector: *src })?;
        if let Some(raw) = pick(card, sel, compiled.rule.pick) {
            if !raw.is_empty() {
                parts.push(raw);
            }
        }
    }

    if parts.is_empty() {
        let selector = compiled.rule.selectors.first().copied().unwrap_or_default();
        return Err(FieldError::Missing { field, selector });
    }
    let raw = parts.join(" ");
    (compiled.rule.parse)(&raw).ok_or(FieldError::Unparseable { field, raw })
}

fn probe(root: ElementRef<'_>, probe: &Probe) -> Option<String> {
    let sel = Selector::parse(probe.selector).ok()?;
    let raw = pick(root, &sel, probe.pick)?;
    (probe.parse)(&raw)
}

fn pick(scope: ElementRef<'_>, sel: &Selector, how: Pick) -> Option<String> {
    match how {
        Pick::Text => scope.select(sel).next().map(text_of),
        Pick::Attr(name) => scope
            .select(sel)
            .next()
            .and_then(|el| el.value().attr(name))
            .map(normalize_ws),
        Pick::Nth(i) => scope.select(sel).nth(i).map(text_of),
    }
}

fn text_of(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<Vec<_>>().join(" "))
}
