use std::path::Path;

pub fn run(content: &Path, node_id: &str, max_hops: usize) -> Result<(), String> {
    let graph = super::load_graph(content)?;
    let resolution = graph.redirects().resolve(node_id, max_hops);

    println!("  {resolution}");
    println!("  hops: {}", resolution.hops);
    match graph.graphs().find(|g| g.contains(&resolution.resolved_node_id)) {
        Some(owner) => println!("  owner: {}", owner.character_id()),
        None => println!("  owner: none (node does not exist)"),
    }
    Ok(())
}
