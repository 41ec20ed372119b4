//! Query the navigation index from the command line

use anyhow::Result;

use crate::search::{SearchIndex, ROUTES};
use crate::Folio;

/// Build the index from current content and print grouped matches
pub fn run(folio: &Folio, query: &str) -> Result<()> {
    let posts = folio.loader().list_posts()?;
    let projects = folio.projects()?;
    let index = SearchIndex::build(ROUTES, projects.iter(), &posts);

    let results = index.query(query);
    if results.is_empty() {
        println!("No results for {:?}", query);
        return Ok(());
    }

    for group in &results.groups {
        println!("{}:", group.heading);
        for entry in &group.entries {
            println!("  {:<40} {}", entry.label, entry.href);
        }
    }

    Ok(())
}
