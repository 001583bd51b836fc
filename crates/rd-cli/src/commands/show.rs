use std::path::Path;

use comfy_table::{ContentArrangement, Table};

pub fn run(path: &Path) -> Result<(), String> {
    let graph = super::load_graph(path)?;

    if graph.is_empty() {
        println!("  No nodes found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Name", "Kind", "Targets", "Keywords", "Budget"]);

    for node in graph.nodes() {
        let id = if node.id == graph.start() {
            format!("{} (start)", node.id)
        } else {
            node.id.to_string()
        };
        let name = if node.name.is_empty() {
            "—".to_string()
        } else {
            node.name.clone()
        };
        let targets = node
            .kind
            .targets()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let (keywords, budget) = match node.content() {
            Some(content) => (content.keywords.len().to_string(), content.budget.to_string()),
            None => ("—".to_string(), "—".to_string()),
        };

        table.add_row(vec![
            id,
            name,
            node.kind.tag().to_string(),
            if targets.is_empty() { "—".to_string() } else { targets },
            keywords,
            budget,
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} nodes", graph.len());

    Ok(())
}
