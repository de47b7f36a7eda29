use recipe_extract::extractors::{GenericCssExtractor, JsonLdExtractor, MicroDataExtractor};
use recipe_extract::{extract, EngineConfig, Extractor, ParsingContext, RecipeExtractor};

const BANANA_BREAD: &str = r#"
    <html><head>
    <meta property="og:image" content="https://cdn.example/banana.jpg">
    <script type="application/ld+json">
    {
        "@type": "Recipe",
        "name": "Banana Bread",
        "recipeIngredient": ["3 bananas", "1 cup sugar", "1 egg", "2 cups flour", "1 tsp soda"],
        "recipeInstructions": [
            {"@type": "HowToStep", "text": "Preheat the oven."},
            {"@type": "HowToStep", "text": "Mash the bananas."},
            {"@type": "HowToStep", "text": "Mix everything together."},
            {"@type": "HowToStep", "text": "Bake for an hour."}
        ]
    }
    </script>
    </head><body></body></html>
"#;

/// JSON-LD knows a little, microdata knows more.
const SPLIT_SOURCES: &str = r#"
    <html><head>
    <script type="application/ld+json">
    {
        "@type": "Recipe",
        "name": "Garden Salad",
        "recipeIngredient": ["1 head lettuce", "2 tomatoes"],
        "recipeInstructions": ["Wash the lettuce well.", "Slice the tomatoes thinly."]
    }
    </script>
    </head>
    <body>
        <div itemscope itemtype="http://schema.org/Recipe">
            <span itemprop="name">Garden Salad</span>
            <ul>
                <li itemprop="recipeIngredient">1 head lettuce</li>
                <li itemprop="recipeIngredient">2 tomatoes</li>
                <li itemprop="recipeIngredient">1 cucumber</li>
                <li itemprop="recipeIngredient">3 tbsp olive oil</li>
                <li itemprop="recipeIngredient">1 lemon</li>
            </ul>
            <p itemprop="recipeInstructions">Wash the lettuce well.</p>
            <p itemprop="recipeInstructions">Slice the tomatoes thinly.</p>
            <p itemprop="recipeInstructions">Peel and dice the cucumber.</p>
            <p itemprop="recipeInstructions">Dress with oil and lemon.</p>
        </div>
    </body></html>
"#;

#[test]
fn test_confidence_bounds_and_source_url() {
    let pages = [
        BANANA_BREAD,
        SPLIT_SOURCES,
        "",
        "<html><body><h1>Just a heading</h1></body></html>",
        "<script type=\"application/ld+json\">[[[[[[[[[[]]]]]]]]]]</script>",
        "<ul><li>2 cups rice</li></ul><ol><li>Rinse the rice until clear.</li></ol>",
    ];

    for (i, page) in pages.iter().enumerate() {
        let url = format!("https://page{i}.example/recipe");
        let result = extract(&url, page);
        assert!(
            (0.0..=1.0).contains(&result.confidence),
            "page {i}: confidence {}",
            result.confidence
        );
        match &result.recipe {
            Some(recipe) => assert_eq!(recipe.source_url, url, "page {i}"),
            None => {
                assert_eq!(result.confidence, 0.0, "page {i}");
                assert!(!result.issues.is_empty(), "page {i}");
            }
        }
    }
}

#[test]
fn test_nothing_matches() {
    let html = r#"
        <html><body>
            <div class="content"><p>Nothing to see here.</p></div>
        </body></html>
    "#;
    let result = extract("https://nothing.example/", html);
    assert!(result.recipe.is_none());
    assert_eq!(result.confidence, 0.0);
    assert!(!result.issues.is_empty());
}

#[test]
fn test_merge_is_at_least_as_complete_as_every_source() {
    let url = "https://salad.example/garden";
    let context = ParsingContext::new(url, SPLIT_SOURCES);
    let individual = [
        JsonLdExtractor.extract(&context),
        MicroDataExtractor.extract(&context),
        GenericCssExtractor.extract(&context),
    ];
    let max_ingredients = individual
        .iter()
        .filter_map(|r| r.recipe.as_ref())
        .map(|r| r.ingredients.len())
        .max()
        .unwrap();
    let max_instructions = individual
        .iter()
        .filter_map(|r| r.recipe.as_ref())
        .map(|r| r.instructions.len())
        .max()
        .unwrap();

    let result = extract(url, SPLIT_SOURCES);
    let recipe = result.recipe.unwrap();

    assert_eq!(result.method.to_string(), "merged-json-ld");
    assert!(recipe.ingredients.len() >= max_ingredients);
    assert!(recipe.instructions.len() >= max_instructions);
    assert_eq!(recipe.ingredients.len(), 5);
    assert_eq!(recipe.instructions.len(), 4);
    assert!(individual.iter().all(|r| result.confidence >= r.confidence));
}

#[test]
fn test_confident_result_skips_enhancement() {
    let result = extract("https://bakery.example/banana", BANANA_BREAD);
    let recipe = result.recipe.unwrap();
    assert!(recipe.image.is_none());
    assert!(!result.issues.iter().any(|i| i.contains("social meta tags")));
}

#[test]
fn test_threshold_from_config() {
    let engine = RecipeExtractor::new(EngineConfig {
        enhancement_threshold: 1.0,
        ..EngineConfig::default()
    });
    let baseline = extract("https://bakery.example/banana", BANANA_BREAD);
    let result = engine.extract("https://bakery.example/banana", BANANA_BREAD);
    let recipe = result.recipe.unwrap();

    assert_eq!(recipe.image.as_deref(), Some("https://cdn.example/banana.jpg"));
    assert!(result.confidence > baseline.confidence);
    assert!(result.issues.iter().any(|i| i.contains("social meta tags")));
}

#[test]
fn test_result_serializes_to_json() {
    let result = extract("https://bakery.example/banana", BANANA_BREAD);
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["method"], "json-ld");
    assert_eq!(json["recipe"]["title"], "Banana Bread");
    assert_eq!(json["recipe"]["sourceUrl"], "https://bakery.example/banana");
    assert_eq!(json["recipe"]["ingredients"].as_array().unwrap().len(), 5);
    assert!(json["confidence"].as_f64().unwrap() >= 0.7);

    let failed = serde_json::to_value(extract("https://x.example/", "")).unwrap();
    assert!(failed.get("recipe").is_none());
    assert_eq!(failed["confidence"], 0.0);
}
