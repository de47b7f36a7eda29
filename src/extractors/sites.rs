//! Strategies tuned to one hostname family each. Every entry pairs the
//! shared JSON-LD pass with hand-picked selectors for that family's markup.

use super::json_ld::extract_with_fallback;
use super::selectors::SelectorSet;
use super::{Extraction, Extractor, ParsingContext};
use crate::error::ExtractError;
use crate::model::ExtractionMethod;

pub struct SiteExtractor {
    pub name: &'static str,
    /// Host suffixes this entry handles.
    pub hosts: &'static [&'static str],
    pub selectors: SelectorSet,
}

impl Extractor for SiteExtractor {
    fn name(&self) -> &'static str {
        self.name
    }

    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::SiteSpecific
    }

    fn can_handle(&self, hostname: &str) -> bool {
        self.hosts.iter().any(|host| {
            hostname == *host
                || hostname
                    .strip_suffix(host)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    fn try_extract(&self, context: &ParsingContext) -> Result<Extraction, ExtractError> {
        Ok(extract_with_fallback(
            context,
            &self.selectors,
            ExtractionMethod::SiteSpecific,
        ))
    }
}

const EMPTY: &[&str] = &[];

/// Dotdash Meredith properties share one page template.
const DOTDASH: SiteExtractor = SiteExtractor {
    name: "dotdash_meredith",
    hosts: &[
        "allrecipes.com",
        "seriouseats.com",
        "simplyrecipes.com",
        "eatingwell.com",
        "foodandwine.com",
        "thespruceeats.com",
    ],
    selectors: SelectorSet {
        title: &["h1.article-heading", "h1.heading__title", "h1.headline"],
        description: &[".article-subheading", ".heading__subtitle"],
        image: &[
            ".primary-image__image",
            "img.universal-image__image",
            ".figure-media img",
        ],
        ingredients: &[
            ".mntl-structured-ingredients__list-item",
            ".structured-ingredients__list-item",
            ".ingredients-item-name",
        ],
        instructions: &[
            ".mntl-sc-block-group--OL > li p",
            "#structured-project__steps_1-0 li p",
            ".instructions-section-item .section-body",
        ],
        prep_time: &[
            ".mntl-recipe-details__item:nth-child(1) .mntl-recipe-details__value",
            ".prep-time .meta-text__data",
        ],
        cook_time: &[
            ".mntl-recipe-details__item:nth-child(2) .mntl-recipe-details__value",
            ".cook-time .meta-text__data",
        ],
        total_time: &[
            ".mntl-recipe-details__item:nth-child(3) .mntl-recipe-details__value",
            ".total-time .meta-text__data",
        ],
        servings: &[".mntl-recipe-details__item:nth-child(4) .mntl-recipe-details__value", ".recipe-serving .meta-text__data"],
        difficulty: EMPTY,
        tags: &[".mntl-breadcrumbs__item:last-child"],
    },
};

const FOOD_NETWORK: SiteExtractor = SiteExtractor {
    name: "food_network",
    hosts: &["foodnetwork.com", "cookingchanneltv.com"],
    selectors: SelectorSet {
        title: &["h1.o-AssetTitle__a-Headline span", "h1.o-AssetTitle__a-Headline"],
        description: &[".o-AssetDescription__a-Description"],
        image: &[".m-MediaBlock__a-Image", ".o-RecipeLead img"],
        ingredients: &[
            ".o-Ingredients__a-Ingredient--CheckboxLabel",
            ".o-Ingredients__a-Ingredient",
        ],
        instructions: &[".o-Method__m-Step", ".o-Method__m-Body li"],
        prep_time: &[".o-RecipeInfo__m-Time .o-RecipeInfo__a-Description:nth-of-type(2)"],
        cook_time: &[".o-RecipeInfo__a-Description--Cook"],
        total_time: &[".o-RecipeInfo__a-Description.m-RecipeInfo__a-Description--Total"],
        servings: &[".o-RecipeInfo__m-Yield .o-RecipeInfo__a-Description"],
        difficulty: &[".o-RecipeInfo__m-Level .o-RecipeInfo__a-Description"],
        tags: &[".o-Capsule__a-Tag"],
    },
};

const BBC_GOOD_FOOD: SiteExtractor = SiteExtractor {
    name: "bbc_good_food",
    hosts: &["bbcgoodfood.com", "bbc.co.uk"],
    selectors: SelectorSet {
        title: &["h1.heading-1", ".post-header__title h1", "h1"],
        description: &[".post-header__description", ".editor-content p"],
        image: &[".post-header__image-container img", ".image__img"],
        ingredients: &[
            ".recipe__ingredients li",
            ".ingredients-list__item",
            "[data-component=\"IngredientsList\"] li",
        ],
        instructions: &[
            ".recipe__method-steps li .editor-content",
            ".method-steps__list-item p",
            ".recipe__method-steps li",
        ],
        prep_time: &[".recipe-cook-and-prep-details__item:nth-child(1) time", ".cook-and-prep-time li:nth-child(1) time"],
        cook_time: &[".recipe-cook-and-prep-details__item:nth-child(2) time", ".cook-and-prep-time li:nth-child(2) time"],
        total_time: EMPTY,
        servings: &[".post-header__servings", ".recipe-cook-and-prep-details__item--servings"],
        difficulty: &[".post-header__skill-level", ".recipe-cook-and-prep-details__item--skill"],
        tags: &[".post-header__term-list .link", ".terms-icons-list__text"],
    },
};

const NYT_COOKING: SiteExtractor = SiteExtractor {
    name: "nyt_cooking",
    hosts: &["cooking.nytimes.com"],
    selectors: SelectorSet {
        title: &["h1.pantry--title-display", "h1[class*=\"title\"]", ".recipe-title"],
        description: &[".topnote_topnoteParagraphs__A3OtF p", ".topnote p"],
        image: &["[class*=\"recipeheaderimage\"] img", ".media-container img"],
        ingredients: &[
            "[class*=\"ingredient_ingredient\"]",
            ".recipe-ingredients li",
        ],
        instructions: &[
            "[class*=\"preparation_step\"] p",
            ".recipe-steps li",
        ],
        prep_time: EMPTY,
        cook_time: EMPTY,
        total_time: &["[class*=\"stats_statsTable\"] dd:nth-of-type(1)", ".recipe-time-yield .recipe-yield-value:nth-of-type(2)"],
        servings: &["[class*=\"ingredients_recipeYield\"] span:nth-of-type(2)", ".recipe-yield-value"],
        difficulty: EMPTY,
        tags: &["[class*=\"tags_tag\"]", ".tags-nutrition-container a"],
    },
};

const CONDE_NAST: SiteExtractor = SiteExtractor {
    name: "conde_nast",
    hosts: &["bonappetit.com", "epicurious.com"],
    selectors: SelectorSet {
        title: &["h1[data-testid=\"ContentHeaderHed\"]", "h1.split-screen-content-header__hed"],
        description: &["[data-testid=\"ContentHeaderAccreditation\"] + div", ".container--body-inner p"],
        image: &["[data-testid=\"ContentHeaderLeadAsset\"] img", ".lead-asset img"],
        ingredients: &[
            "[data-testid=\"IngredientList\"] [class*=\"Description\"]",
            ".ingredients li",
        ],
        instructions: &[
            "[data-testid=\"InstructionsWrapper\"] li p",
            ".preparation-step",
        ],
        prep_time: EMPTY,
        cook_time: &["[data-testid=\"InfoSliceList\"] li:nth-child(2) [class*=\"InfoSliceValue\"]"],
        total_time: &["[data-testid=\"InfoSliceList\"] li:nth-child(1) [class*=\"InfoSliceValue\"]"],
        servings: &["[data-testid=\"IngredientList\"] [class*=\"Yield\"]", ".yield"],
        difficulty: EMPTY,
        tags: &["[data-testid=\"TagCloudWrapper\"] a"],
    },
};

const HEARST: SiteExtractor = SiteExtractor {
    name: "hearst",
    hosts: &["delish.com", "goodhousekeeping.com", "countryliving.com"],
    selectors: SelectorSet {
        title: &["h1.content-hed", "h1[data-testid=\"ContentHeaderTitle\"]", "h1.recipe-hed"],
        description: &[".content-dek p", "[data-testid=\"ContentHeaderDek\"]"],
        image: &[".content-lede-image-wrap img", "[data-testid=\"lede-image\"] img"],
        ingredients: &[".ingredient-lists li", ".ingredient-item", "[data-testid=\"ingredient-item\"]"],
        instructions: &[".direction-lists li", ".directions ol li", "[data-testid=\"direction-item\"]"],
        prep_time: &[".prep-time-amount"],
        cook_time: EMPTY,
        total_time: &[".total-time-amount", "[data-testid=\"total-time\"] span"],
        servings: &[".yields-amount", "[data-testid=\"yields\"] span"],
        difficulty: EMPTY,
        tags: EMPTY,
    },
};

const TASTY: SiteExtractor = SiteExtractor {
    name: "tasty",
    hosts: &["tasty.co"],
    selectors: SelectorSet {
        title: &["h1.recipe-name", "h1"],
        description: &[".description"],
        image: &[".video-wrapper img", ".recipe-image img", "[data-testid=\"recipe-image\"] img"],
        ingredients: &[".ingredients__section li", ".ingredient"],
        instructions: &[".prep-steps li", ".preparation li"],
        prep_time: EMPTY,
        cook_time: EMPTY,
        total_time: &[".recipe-time-container .total-time"],
        servings: &[".servings-display"],
        difficulty: EMPTY,
        tags: &[".breadcrumb_item"],
    },
};

const FOOD_COM: SiteExtractor = SiteExtractor {
    name: "food_com",
    hosts: &["food.com"],
    selectors: SelectorSet {
        title: &["h1.svelte-1muv3s8", ".recipe-title h1", "h1"],
        description: &[".recipe-description", ".recipe-layout__description"],
        image: &[".primary-image img", ".recipe-hero img"],
        ingredients: &[".ingredient-list li", ".recipe-ingredients__item"],
        instructions: &[".direction-list li", ".recipe-directions__step"],
        prep_time: EMPTY,
        cook_time: EMPTY,
        total_time: &[".facts__item:nth-child(1) .facts__value", ".recipe-facts__time"],
        servings: &[".facts__item:nth-child(3) .facts__value", ".recipe-facts__servings"],
        difficulty: EMPTY,
        tags: &[".recipe-tags li"],
    },
};

/// All site strategies, most specific first.
pub fn site_extractors() -> Vec<SiteExtractor> {
    vec![
        NYT_COOKING,
        DOTDASH,
        FOOD_NETWORK,
        BBC_GOOD_FOOD,
        CONDE_NAST,
        HEARST,
        TASTY,
        FOOD_COM,
    ]
}
