//! One-shot draft generation command.

use anyhow::{Context, Result};
use console::style;

use autonomax_core::draft::generator::DraftGenerator;
use autonomax_types::product::ProductBrief;

use super::DraftArgs;

/// Build the brief from a JSON file or the inline flags.
pub async fn read_brief(args: DraftArgs) -> Result<ProductBrief> {
    if let Some(path) = args.brief {
        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read brief {}", path.display()))?;
        let brief = serde_json::from_str(&content)
            .with_context(|| format!("invalid brief JSON in {}", path.display()))?;
        return Ok(brief);
    }

    Ok(ProductBrief {
        category: args.category.unwrap_or_default(),
        audience: args.audience.unwrap_or_default(),
        keywords: args.keyword,
        refs: Vec::new(),
    })
}

/// Generate a draft and print it.
pub async fn generate(generator: &DraftGenerator, brief: ProductBrief, json: bool) -> Result<()> {
    let resolved = generator.generate_resolved(&brief).await?;
    let draft = &resolved.draft;

    if json {
        println!("{}", serde_json::to_string_pretty(draft)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style("✦").cyan().bold(),
        style(&draft.title).bold()
    );
    println!("  {}", style(&draft.id).dim());
    if resolved.fallback {
        println!(
            "  {}",
            style("provider returned unstructured text; draft synthesized").yellow()
        );
    }
    println!();
    println!("  {}", draft.description);
    println!();
    println!("  Tags:   {}", draft.tags.join(", "));
    println!("  Price:  {:.2}", draft.price);
    println!("  Score:  {:.1}", draft.score);
    if !draft.assets.is_empty() {
        println!("  Assets: {}", draft.assets.join(", "));
    }
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inline(category: &str) -> DraftArgs {
        DraftArgs {
            brief: None,
            category: Some(category.to_string()),
            audience: Some("home decor buyers".to_string()),
            keyword: vec!["minimal".to_string()],
        }
    }

    #[tokio::test]
    async fn read_brief_from_flags() {
        let brief = read_brief(inline("Zen Print")).await.unwrap();
        assert_eq!(brief.category, "Zen Print");
        assert_eq!(brief.keywords, vec!["minimal"]);
        assert!(brief.refs.is_empty());
    }

    #[tokio::test]
    async fn read_brief_from_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("brief.json");
        tokio::fs::write(
            &path,
            r#"{"category":"Zen Print","audience":"home decor buyers","keywords":["serene"]}"#,
        )
        .await
        .unwrap();

        let brief = read_brief(DraftArgs {
            brief: Some(path),
            category: None,
            audience: None,
            keyword: vec![],
        })
        .await
        .unwrap();
        assert_eq!(brief.keywords, vec!["serene"]);
    }

    #[tokio::test]
    async fn read_brief_rejects_bad_json() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("brief.json");
        tokio::fs::write(&path, "{ nope").await.unwrap();

        let err = read_brief(DraftArgs {
            brief: Some(path),
            category: None,
            audience: None,
            keyword: vec![],
        })
        .await
        .unwrap_err();
        assert!(err.to_string().contains("invalid brief JSON"));
    }
}
