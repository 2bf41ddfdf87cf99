use url::Url;

use crate::error::ScrapeError;
use crate::recipe::{Recipe, RecipeSpec, builtin_specs};

/// Ordered (matcher, recipe) list. The first recipe whose matcher accepts the
/// host wins.
#[derive(Debug, Default)]
pub struct RecipeTable {
    recipes: Vec<Recipe>,
}

impl RecipeTable {
    /// The built-in retailers only.
    pub fn builtin() -> Self {
        let recipes = builtin_specs()
            .iter()
            .filter_map(|spec| match Recipe::compile(spec) {
                Ok(r) => Some(r),
                Err(e) => {
                    tracing::error!(error = %e, "scrape.builtin_recipe.invalid");
                    None
                }
            })
            .collect();
        Self { recipes }
    }

    /// Configured recipes first, then the built-ins.
    pub fn with_configured(specs: &[RecipeSpec]) -> Result<Self, ScrapeError> {
        let mut recipes = specs
            .iter()
            .map(Recipe::compile)
            .collect::<Result<Vec<_>, _>>()?;
        recipes.extend(Self::builtin().recipes);
        Ok(Self { recipes })
    }

    pub fn lookup(&self, url: &Url) -> Option<&Recipe> {
        let host = url.host_str()?;
        self.recipes.iter().find(|r| r.matches(host))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.recipes.iter().map(Recipe::name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{FieldRule, HostMatcher};

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn spec(name: &str, matcher: HostMatcher) -> RecipeSpec {
        RecipeSpec {
            name: name.into(),
            matcher,
            brand: FieldRule::Fixed(name.into()),
            model: FieldRule::css("h1"),
            release_date: FieldRule::css("time"),
            price: FieldRule::css(".price"),
        }
    }

    #[test]
    fn builtin_hosts_resolve() {
        let table = RecipeTable::builtin();
        assert_eq!(table.names().count(), 3);
        let name = |u: &str| table.lookup(&url(u)).map(|r| r.name().to_string());
        assert_eq!(name("https://www.samsung.com/us/phones/s23"), Some("samsung".into()));
        assert_eq!(name("https://www.haier.com/fridges/hrf-522"), Some("haier".into()));
        assert_eq!(name("https://www.lg.com/us/tvs"), Some("lg".into()));
    }

    #[test]
    fn unknown_host_has_no_recipe() {
        let table = RecipeTable::builtin();
        assert!(table.lookup(&url("https://www.example.com")).is_none());
        assert!(table.lookup(&url("https://samsung.com/")).is_none());
    }

    #[test]
    fn url_without_host_has_no_recipe() {
        let table = RecipeTable::builtin();
        assert!(table.lookup(&url("data:text/html,<h1>x</h1>")).is_none());
    }

    #[test]
    fn configured_recipes_take_precedence() {
        let table = RecipeTable::with_configured(&[
            spec("lg-override", HostMatcher::Host("www.lg.com".into())),
            spec("acme", HostMatcher::Contains("acme".into())),
        ])
        .unwrap();
        assert_eq!(
            table.lookup(&url("https://www.lg.com/")).map(Recipe::name),
            Some("lg-override")
        );
        assert_eq!(
            table.lookup(&url("https://shop.acme.test/p/1")).map(Recipe::name),
            Some("acme")
        );
        assert_eq!(
            table.names().collect::<Vec<_>>(),
            vec!["lg-override", "acme", "samsung", "haier", "lg"]
        );
    }

    #[test]
    fn invalid_configured_selector_fails_table_build() {
        let mut bad = spec("bad", HostMatcher::Host("bad.test".into()));
        bad.price = FieldRule::css(":::");
        assert!(matches!(
            RecipeTable::with_configured(&[bad]),
            Err(ScrapeError::Selector { .. })
        ));
    }
}
