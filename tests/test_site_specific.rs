use recipe_extract::extract;

#[test]
fn test_food_network_markup_without_structured_data() {
    let html = r#"
        <!DOCTYPE html>
        <html>
        <body>
            <div class="o-AssetTitle">
                <h1 class="o-AssetTitle__a-Headline"><span>Baked Ziti</span></h1>
            </div>
            <div class="o-Ingredients">
                <span class="o-Ingredients__a-Ingredient--CheckboxLabel">1 pound ziti</span>
                <span class="o-Ingredients__a-Ingredient--CheckboxLabel">2 cups marinara</span>
            </div>
            <ol class="o-Method">
                <li class="o-Method__m-Step">Boil the pasta until al dente.</li>
                <li class="o-Method__m-Step">Toss with sauce and bake until bubbling.</li>
            </ol>
        </body>
        </html>
    "#;

    let result = extract("https://www.foodnetwork.com/recipes/baked-ziti", html);
    let recipe = result.recipe.expect("site strategy should find the recipe");

    assert_eq!(result.method.to_string(), "site-specific");
    assert_eq!(recipe.title.as_deref(), Some("Baked Ziti"));
    assert_eq!(recipe.ingredients, vec!["1 pound ziti", "2 cups marinara"]);
    assert_eq!(recipe.instructions.len(), 2);
}

#[test]
fn test_bbc_good_food_metadata() {
    let html = r#"
        <html>
        <body>
            <div class="post-header">
                <h1 class="heading-1">Victoria Sponge</h1>
                <div class="post-header__servings">Serves 8</div>
                <div class="post-header__skill-level">Easy</div>
            </div>
            <section class="recipe__ingredients">
                <ul>
                    <li>200g caster sugar</li>
                    <li>200g softened butter</li>
                </ul>
            </section>
            <section>
                <ul class="recipe__method-steps">
                    <li><div class="editor-content">Heat oven to 190C.</div></li>
                    <li><div class="editor-content">Beat everything together until smooth.</div></li>
                </ul>
            </section>
        </body>
        </html>
    "#;

    let result = extract("https://www.bbcgoodfood.com/recipes/classic-victoria-sandwich", html);
    let recipe = result.recipe.unwrap();

    assert_eq!(result.method.to_string(), "site-specific");
    assert_eq!(recipe.title.as_deref(), Some("Victoria Sponge"));
    assert_eq!(recipe.servings, Some(8.0));
    assert_eq!(recipe.difficulty.as_deref(), Some("Easy"));
    assert_eq!(
        recipe.instructions,
        vec!["Heat oven to 190C.", "Beat everything together until smooth."]
    );
}

#[test]
fn test_structured_data_wins_on_supported_site() {
    let html = r#"
        <html>
        <head>
            <script type="application/ld+json">
            {
                "@type": "Recipe",
                "name": "World's Best Lasagna",
                "recipeIngredient": ["1 pound sweet Italian sausage", "12 lasagna noodles"]
            }
            </script>
        </head>
        <body>
            <h1 class="article-heading">World's Best Lasagna</h1>
            <ol class="mntl-sc-block-group--OL">
                <li><p>Cook the sausage over medium heat.</p></li>
                <li><p>Layer noodles, sauce and cheese.</p></li>
            </ol>
        </body>
        </html>
    "#;

    let result = extract("https://www.allrecipes.com/recipe/23600/worlds-best-lasagna/", html);
    let recipe = result.recipe.unwrap();

    assert_eq!(result.method.to_string(), "json-ld");
    assert_eq!(recipe.ingredients.len(), 2);
    assert_eq!(
        recipe.instructions,
        vec!["Cook the sausage over medium heat.", "Layer noodles, sauce and cheese."]
    );
    assert!(result
        .issues
        .iter()
        .any(|issue| issue.contains("instructions taken from page markup")));
}
