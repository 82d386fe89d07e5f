//! Plain-text rendering of API payloads

use foreigneye_client::types::{
    Article, ArticleDetail, ArticleSearchResults, ArticlesPage, ConceptDetail, ConceptNode,
    ConceptSearchResults, KnowledgeMap, Pagination, User, UserCollection, parse_timestamp,
};

const MAX_PREVIEW_BADGES: usize = 5;
const MAX_EXAMPLE_BADGES: usize = 3;

fn badge(text: &str) -> String {
    format!("[{text}]")
}

fn format_date(value: &str) -> String {
    parse_timestamp(value).map_or_else(
        || value.to_string(),
        |date| date.format("%Y-%m-%d").to_string(),
    )
}

/// Preview concepts as badges, with `+N more` when the article has more than fit
pub fn preview_badges(article: &Article) -> Option<String> {
    let previews = article.preview_concepts.as_deref().unwrap_or_default();
    if previews.is_empty() {
        return None;
    }

    let mut badges: Vec<String> = previews
        .iter()
        .take(MAX_PREVIEW_BADGES)
        .map(|concept| badge(&concept.name))
        .collect();

    let total = article
        .concept_count
        .map_or(previews.len(), |count| count as usize);
    if total > MAX_PREVIEW_BADGES {
        badges.push(badge(&format!("+{} more", total - MAX_PREVIEW_BADGES)));
    }

    Some(badges.join(" "))
}

/// `< prev  page 2 / 3  next >`, with unavailable directions shown as `-`
pub fn pagination_line(pagination: &Pagination) -> String {
    let prev = if pagination.has_prev { "< prev" } else { "- prev" };
    let next = if pagination.has_next { "next >" } else { "next -" };
    format!(
        "{prev}  page {} / {}  {next}",
        pagination.current_page, pagination.total_pages
    )
}

pub fn article_list(page: &ArticlesPage) -> String {
    if page.items.is_empty() {
        return "No articles yet.".to_string();
    }

    let mut lines = Vec::new();
    for article in &page.items {
        lines.push(format!(
            "#{}  {}  ({})",
            article.article_id,
            article.display_title(),
            format_date(&article.created_at)
        ));
        if !article.summary_ko.is_empty() {
            lines.push(format!("    {}", first_line(&article.summary_ko)));
        }
        if let Some(badges) = preview_badges(article) {
            lines.push(format!("    {badges}"));
        }
    }
    lines.push(String::new());
    lines.push(pagination_line(&page.pagination));
    lines.join("\n")
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

fn concept_node(node: &ConceptNode) -> String {
    let mut header = vec![badge(if node.is_primary { "Primary" } else { "Related" })];
    if node.is_collected {
        header.push(badge("collected"));
    }
    header.push(format!("{} (#{})", node.label, node.id));

    let mut lines = vec![format!("  {}", header.join(" "))];
    if let Some(description) = node.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("      {description}"));
    }
    if !node.real_world_examples.is_empty() {
        let examples: Vec<String> = node
            .real_world_examples
            .iter()
            .take(MAX_EXAMPLE_BADGES)
            .map(|example| badge(example))
            .collect();
        lines.push(format!("      {}", examples.join(" ")));
    }
    lines.join("\n")
}

pub fn article_detail(detail: &ArticleDetail) -> String {
    let article = &detail.article;
    let mut lines = vec![
        article.display_title().to_string(),
        format!(
            "{}  {}",
            format_date(&article.created_at),
            article.original_url
        ),
        String::new(),
        article.summary_ko.clone(),
        String::new(),
        "Concepts:".to_string(),
    ];

    if detail.graph.nodes.is_empty() {
        lines.push("  No concepts for this article.".to_string());
    } else {
        lines.extend(detail.graph.nodes.iter().map(concept_node));
    }
    lines.join("\n")
}

pub fn user(user: &User) -> String {
    let mut lines = vec![format!("{} <{}> (#{})", user.username, user.email, user.id)];
    if let Some(stats) = &user.stats {
        lines.push(format!(
            "{} concepts collected, {} articles",
            stats.total_concepts, stats.total_articles
        ));
    }
    lines.join("\n")
}

pub fn collection(collection: &UserCollection) -> String {
    if collection.concepts.is_empty() {
        return "Your collection is empty.".to_string();
    }

    let mut lines = vec![format!("{} concepts", collection.total_concepts)];
    for concept in &collection.concepts {
        let collected = concept
            .collected_at
            .as_deref()
            .map(format_date)
            .unwrap_or_default();
        lines.push(format!(
            "#{}  {}  {collected}",
            concept.concept_id, concept.name
        ));
    }
    lines.join("\n")
}

pub fn concept_detail(detail: &ConceptDetail) -> String {
    let concept = &detail.concept;
    let mut title = format!("{} (#{})", concept.name, concept.concept_id);
    if concept.is_collected == Some(true) {
        title.push(' ');
        title.push_str(&badge("collected"));
    }

    let mut lines = vec![title];
    if let Some(description) = &concept.description_ko {
        lines.push(description.clone());
    }
    if !concept.real_world_examples_ko.is_empty() {
        let examples: Vec<String> = concept
            .real_world_examples_ko
            .iter()
            .map(|example| badge(example))
            .collect();
        lines.push(examples.join(" "));
    }
    if !detail.related_concepts.is_empty() {
        lines.push("Related concepts:".to_string());
        for related in &detail.related_concepts {
            let strength = related
                .strength
                .map(|s| format!(" ({s:.2})"))
                .unwrap_or_default();
            lines.push(format!("  #{} {}{strength}", related.concept_id, related.name));
        }
    }
    if !detail.related_articles.is_empty() {
        lines.push("Articles:".to_string());
        for article in &detail.related_articles {
            lines.push(format!(
                "  #{} {}",
                article.article_id,
                article.title_ko.as_deref().unwrap_or_default()
            ));
        }
    }
    lines.join("\n")
}

pub fn concept_search(results: &ConceptSearchResults) -> String {
    if results.results.is_empty() {
        return format!("No concepts match \"{}\".", results.query);
    }

    let mut lines = vec![format!("{} results", results.total_results)];
    lines.extend(
        results
            .results
            .iter()
            .map(|concept| format!("#{}  {}", concept.concept_id, concept.name)),
    );
    lines.join("\n")
}

pub fn article_search(results: &ArticleSearchResults) -> String {
    if results.articles.is_empty() {
        return "No matching articles.".to_string();
    }

    let mut lines = vec![format!("{} articles", results.total_results)];
    lines.extend(results.articles.iter().map(|article| {
        format!(
            "#{}  {}  ({})",
            article.article_id,
            article.display_title(),
            format_date(&article.created_at)
        )
    }));
    lines.join("\n")
}

pub fn knowledge_map(map: &KnowledgeMap) -> String {
    let stats = &map.stats;
    let mut lines = vec![format!(
        "{} concepts, {} connections ({} strong)",
        stats.total_concepts, stats.total_connections, stats.strong_connections
    )];
    if let Some(most) = &stats.most_connected {
        lines.push(format!(
            "Most connected: {} ({} connections)",
            most.name, most.connection_count
        ));
    }

    for edge in &map.graph.edges {
        let label = |id: i64| {
            map.graph
                .nodes
                .iter()
                .find(|node| node.id == id)
                .map_or_else(|| format!("#{id}"), |node| node.label.clone())
        };
        lines.push(format!(
            "  {} -- {} ({:.2})",
            label(edge.from),
            label(edge.to),
            edge.strength
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use foreigneye_client::types::PreviewConcept;

    fn article(previews: usize, concept_count: Option<u32>) -> Article {
        Article {
            article_id: 1,
            title: "Attention Is All You Need".into(),
            title_ko: None,
            original_url: "https://example.com".into(),
            summary_ko: "First line\nSecond line".into(),
            created_at: "2025-11-11T12:34:56Z".into(),
            concept_count,
            preview_concepts: Some(
                (0..previews)
                    .map(|i| PreviewConcept {
                        concept_id: i64::try_from(i).unwrap(),
                        name: format!("C{i}"),
                    })
                    .collect(),
            ),
        }
    }

    fn pagination(current_page: u32, total_pages: u32) -> Pagination {
        Pagination {
            current_page,
            total_pages,
            total_items: u64::from(total_pages) * 10,
            items_per_page: 10,
            has_next: current_page < total_pages,
            has_prev: current_page > 1,
        }
    }

    #[test]
    fn test_preview_badges_capped_with_more_marker() {
        let badges = preview_badges(&article(5, Some(8))).unwrap();
        assert_eq!(badges, "[C0] [C1] [C2] [C3] [C4] [+3 more]");

        let badges = preview_badges(&article(2, Some(2))).unwrap();
        assert_eq!(badges, "[C0] [C1]");

        assert!(preview_badges(&article(0, Some(0))).is_none());
    }

    #[test]
    fn test_pagination_line_disables_edges() {
        assert_eq!(pagination_line(&pagination(1, 3)), "- prev  page 1 / 3  next >");
        assert_eq!(pagination_line(&pagination(2, 3)), "< prev  page 2 / 3  next >");
        assert_eq!(pagination_line(&pagination(3, 3)), "< prev  page 3 / 3  next -");
    }

    #[test]
    fn test_article_list_rendering() {
        let page = ArticlesPage {
            items: vec![article(1, Some(1))],
            pagination: pagination(1, 1),
        };

        let rendered = article_list(&page);
        assert!(rendered.starts_with("#1  Attention Is All You Need  (2025-11-11)"));
        assert!(rendered.contains("    First line\n"));
        assert!(!rendered.contains("Second line"));
        assert!(rendered.ends_with("- prev  page 1 / 1  next -"));
    }

    #[test]
    fn test_concept_node_rendering() {
        let node = ConceptNode {
            id: 3,
            label: "Transformer".into(),
            description: Some("Sequence model".into()),
            real_world_examples: vec!["GPT".into(), "BERT".into(), "T5".into(), "PaLM".into()],
            is_collected: true,
            is_primary: true,
        };

        assert_eq!(
            concept_node(&node),
            "  [Primary] [collected] Transformer (#3)\n      Sequence model\n      [GPT] [BERT] [T5]"
        );
    }

    #[test]
    fn test_unparseable_date_is_shown_verbatim() {
        assert_eq!(format_date("yesterday"), "yesterday");
    }
}
