//! Extraction recipes: where each device field lives in a retailer's markup.
//!
//! A [`RecipeSpec`] is the declarative, deserializable form (built-in table
//! or `retailers:` in the config file). [`Recipe::compile`] parses its CSS
//! selectors once so a bad selector fails at startup, not per request.

use pricewatch_common::Device;
use scraper::{Html, Selector};
use serde::Deserialize;

use crate::error::ScrapeError;
use crate::select;

/// How a recipe claims a URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostMatcher {
    /// Hostname equals the value (ASCII case-insensitive).
    Host(String),
    /// Hostname contains the value.
    Contains(String),
}

impl HostMatcher {
    pub fn matches(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        match self {
            HostMatcher::Host(h) => host == h.to_ascii_lowercase(),
            HostMatcher::Contains(s) => host.contains(&s.to_ascii_lowercase()),
        }
    }
}

/// One step of a field path, applied to the current selection.
///
/// In YAML: `{ css: "div.price" }`, `{ contains: "Release Date" }`, `next`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// All descendants matching the selector.
    Css(String),
    /// Keep elements whose text contains the needle.
    Contains(String),
    /// Each element's next sibling element.
    Next,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRule {
    /// Constant value, e.g. a brand implied by the retailer.
    Fixed(String),
    Path(Vec<Step>),
}

impl FieldRule {
    pub fn css(selector: &str) -> Self {
        FieldRule::Path(vec![Step::Css(selector.to_string())])
    }

    pub fn css_within(scope: &str, selector: &str) -> Self {
        FieldRule::Path(vec![
            Step::Css(scope.to_string()),
            Step::Css(selector.to_string()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecipeSpec {
    pub name: String,
    pub matcher: HostMatcher,
    pub brand: FieldRule,
    pub model: FieldRule,
    pub release_date: FieldRule,
    pub price: FieldRule,
}

pub(crate) enum CompiledStep {
    Css(Selector),
    Contains(String),
    Next,
}

enum CompiledField {
    Fixed(String),
    Path(Vec<CompiledStep>),
}

impl CompiledField {
    fn compile(recipe: &str, rule: &FieldRule) -> Result<Self, ScrapeError> {
        let steps = match rule {
            FieldRule::Fixed(v) => return Ok(CompiledField::Fixed(v.clone())),
            FieldRule::Path(steps) => steps,
        };
        steps
            .iter()
            .map(|step| match step {
                Step::Css(css) => Selector::parse(css)
                    .map(CompiledStep::Css)
                    .map_err(|e| ScrapeError::Selector {
                        recipe: recipe.to_string(),
                        selector: css.clone(),
                        reason: e.to_string(),
                    }),
                Step::Contains(needle) => Ok(CompiledStep::Contains(needle.clone())),
                Step::Next => Ok(CompiledStep::Next),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(CompiledField::Path)
    }

    fn text(&self, doc: &Html) -> String {
        match self {
            CompiledField::Fixed(v) => v.clone(),
            CompiledField::Path(steps) => select::evaluate(doc, steps).trim().to_string(),
        }
    }
}

/// A compiled recipe, ready to run against fetched HTML.
pub struct Recipe {
    name: String,
    matcher: HostMatcher,
    brand: CompiledField,
    model: CompiledField,
    release_date: CompiledField,
    price: CompiledField,
}

impl std::fmt::Debug for Recipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recipe")
            .field("name", &self.name)
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

impl Recipe {
    pub fn compile(spec: &RecipeSpec) -> Result<Self, ScrapeError> {
        let name = spec.name.as_str();
        Ok(Self {
            name: spec.name.clone(),
            matcher: spec.matcher.clone(),
            brand: CompiledField::compile(name, &spec.brand)?,
            model: CompiledField::compile(name, &spec.model)?,
            release_date: CompiledField::compile(name, &spec.release_date)?,
            price: CompiledField::compile(name, &spec.price)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches(&self, host: &str) -> bool {
        self.matcher.matches(host)
    }

    /// Run every field rule against `html` and build the record.
    ///
    /// Text fields are whitespace-trimmed. The price must parse as a finite,
    /// non-negative decimal.
    pub fn extract(&self, html: &str) -> Result<Device, ScrapeError> {
        let doc = Html::parse_document(html);

        let price_text = self.price.text(&doc);
        let price = parse_price(&price_text).map_err(|reason| ScrapeError::PriceParse {
            retailer: self.name.clone(),
            text: price_text.clone(),
            reason,
        })?;

        Ok(Device::new(
            self.brand.text(&doc),
            self.model.text(&doc),
            self.release_date.text(&doc),
            price,
        ))
    }
}

fn parse_price(text: &str) -> Result<f64, String> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|e: std::num::ParseFloatError| e.to_string())?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("price must be a finite non-negative number, got {value}"));
    }
    Ok(value)
}

/// Retailers supported out of the box.
pub fn builtin_specs() -> Vec<RecipeSpec> {
    vec![
        RecipeSpec {
            name: "samsung".into(),
            matcher: HostMatcher::Host("www.samsung.com".into()),
            brand: FieldRule::Fixed("Samsung".into()),
            model: FieldRule::css("h1.product-title__main"),
            release_date: FieldRule::css_within(
                "div.product-info__feature-list",
                r#"span[data-testid="pl-as-of-date"]"#,
            ),
            price: FieldRule::css_within(
                "div.product-pricing__price-wrap",
                "span.product-price__current",
            ),
        },
        RecipeSpec {
            name: "haier".into(),
            matcher: HostMatcher::Host("www.haier.com".into()),
            brand: FieldRule::Fixed("Haier".into()),
            model: FieldRule::css("h1.product-name"),
            release_date: FieldRule::Path(vec![
                Step::Css("div.product-describe".into()),
                Step::Css("span".into()),
                Step::Contains("Release Date".into()),
                Step::Next,
            ]),
            price: FieldRule::css("span.product-price-current"),
        },
        RecipeSpec {
            name: "lg".into(),
            matcher: HostMatcher::Host("www.lg.com".into()),
            brand: FieldRule::Fixed("LG".into()),
            model: FieldRule::css("h1.product-title"),
            release_date: FieldRule::css_within(
                r#"div[data-product-spec="releaseDate"]"#,
                "span.item-value",
            ),
            price: FieldRule::css("span.price-value"),
        },
    ]
}
